mod document;
mod error;
mod reader;

pub use document::{DEFAULT_VERSION_POINTER, version_from_json};
pub use error::{DocumentError, ManifestError};
pub use reader::{ManifestKind, read_cargo_version, read_local_version, read_package_json_version};
