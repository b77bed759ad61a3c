use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("failed to parse JSON at '{path}'")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field '{field}' in '{path}'")]
    MissingField { path: PathBuf, field: String },

    #[error("invalid version string '{version}' in '{path}'")]
    InvalidVersion {
        path: PathBuf,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("unsupported manifest '{path}': expected Cargo.toml or a .json file")]
    UnsupportedManifest { path: PathBuf },
}

/// Failure to extract a version from a fetched JSON document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("document has no field at '{pointer}'")]
    MissingField { pointer: String },

    #[error("field at '{pointer}' is not a string")]
    NotAString { pointer: String },

    #[error("invalid version string '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },
}
