//! Subcommand handlers.

pub mod config;
pub mod process;

use photomap_core::{Config, ConfigError};
use std::path::Path;

/// Load the config from an explicit file, or from `./photomap.toml` when it exists.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
