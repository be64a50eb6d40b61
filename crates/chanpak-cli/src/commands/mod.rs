//! CLI command implementations.

pub mod pack;
pub mod validate;

use std::path::Path;

use anyhow::{bail, Context};
use chanpak_config::PackConfig;

/// Default config filename looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "chanpak.json";

/// Load the run configuration: an explicit path, else `chanpak.json` in the
/// current directory, else built-in defaults.
pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<PackConfig> {
    match path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.is_file() {
                bail!("config file not found: {path_str}");
            }
            PackConfig::load(path).with_context(|| format!("failed to load config '{path_str}'"))
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILENAME);
            if default.is_file() {
                PackConfig::load(default)
                    .with_context(|| format!("failed to load '{DEFAULT_CONFIG_FILENAME}'"))
            } else {
                Ok(PackConfig::default())
            }
        }
    }
}
