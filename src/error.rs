#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::kind::Kind;

#[derive(Debug, Error, Diagnostic)]
pub enum LoaderError {
    #[error("Invalid template pattern: expected a string, object, or array but got {kind}")]
    #[diagnostic(help(
        "Pass a file path, a glob, an object of templates, or an array of those"
    ))]
    InvalidPattern { kind: Kind },

    #[error("Failed to read template {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front matter in {path}: {message}")]
    #[diagnostic(help("Front matter must be a YAML (---) or TOML (+++) mapping"))]
    FrontMatter { path: String, message: String },

    #[error("Loader config not found at {path}")]
    #[diagnostic(help("Create a template-loader.toml file or use the default config"))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse template-loader.toml")]
    #[diagnostic(help("Check the TOML syntax in your template-loader.toml file"))]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid loader config field '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
