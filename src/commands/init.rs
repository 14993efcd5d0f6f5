use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default config into `dir`, returning the written path
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, default_config_toml())?;
    Ok(config_path)
}
