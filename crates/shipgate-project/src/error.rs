use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no Cargo.toml found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to read manifest at '{path}'")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid title policy in '{path}'")]
    InvalidPolicy {
        path: PathBuf,
        #[source]
        source: shipgate_title::PolicyConfigError,
    },

    #[error("'{field}' in '{path}' must name a command")]
    EmptyCommand { path: PathBuf, field: &'static str },
}
