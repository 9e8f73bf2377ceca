pub mod schema;

use std::path::Path;

use crate::error::{LoaderError, Result};

pub use schema::{FrontMatterConfig, GlobConfig, LoaderConfig};

pub const CONFIG_FILE: &str = "template-loader.toml";

/// Load and validate a LoaderConfig from a template-loader.toml file.
///
/// `path` may be the file itself or the directory containing it.
pub fn load_config(path: &Path) -> Result<LoaderConfig> {
    let config_path = if path.ends_with(CONFIG_FILE) {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    };

    if !config_path.exists() {
        return Err(LoaderError::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| LoaderError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let config: LoaderConfig =
        toml::from_str(&content).map_err(|e| LoaderError::ConfigParse { source: e })?;

    config.validate()?;

    Ok(config)
}
