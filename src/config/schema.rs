use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};
use crate::record::RESERVED_FIELDS;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Directory that relative paths and globs are resolved against.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Inline property names copied onto the record verbatim instead of into `locals`.
    #[serde(default)]
    pub passthrough: Vec<String>,

    #[serde(default)]
    pub glob: GlobConfig,

    #[serde(default)]
    pub front_matter: FrontMatterConfig,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            passthrough: Vec::new(),
            glob: GlobConfig::default(),
            front_matter: FrontMatterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GlobConfig {
    #[serde(default)]
    pub case_insensitive: bool,

    #[serde(default)]
    pub follow_links: bool,

    /// If false, wildcards skip names starting with `.`.
    #[serde(default)]
    pub dotfiles: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrontMatterConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        for name in &self.passthrough {
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(LoaderError::ConfigInvalid {
                    field: "passthrough".into(),
                    reason: format!("'{name}' is a reserved record field"),
                });
            }
        }

        if self.base_dir.as_os_str().is_empty() {
            return Err(LoaderError::ConfigInvalid {
                field: "base_dir".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(())
    }

    pub fn is_passthrough(&self, name: &str) -> bool {
        self.passthrough.iter().any(|p| p == name)
    }
}
