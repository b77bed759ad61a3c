mod config;
mod error;
mod manifest;
mod project;

pub const DEFAULT_VERSION_FILE: &str = "Cargo.toml";

pub use config::{
    CommandSpec, LabelConfig, ReleaseConfig, RemoteLocation, ShipgateConfig, load_config,
};
pub use error::ProjectError;
pub use project::{Project, ProjectKind, discover_project};

pub type Result<T> = std::result::Result<T, ProjectError>;
