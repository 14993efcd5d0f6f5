//! CLI command implementations.
//!
//! - **evaluate**: score benchmark instances with one strategy
//! - **confusion**: aggregate label confusion across instances
//! - **init**: write a default `.clustereval.toml`

pub mod confusion;
pub mod evaluate;
pub mod init;

pub use confusion::{handle_confusion, ConfusionConfig};
pub use evaluate::{handle_evaluate, EvaluateConfig};
pub use init::init_config;
