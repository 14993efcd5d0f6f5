pub mod output;

pub use output::{create_writer, OutputFormat, OutputWriter, RenderOptions};

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

/// Report sink: the named file, or stdout
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Ok(Box::new(std::io::BufWriter::new(fs::File::create(path)?)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
