use shipgate_core::VersionRecord;

use crate::Result;
use crate::error::FetchError;

/// Reads the version the project currently declares.
pub trait LocalVersionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the declared version cannot be read or is not valid semver.
    fn read_local(&self) -> Result<VersionRecord>;
}

/// Reads the last published version from an authoritative source.
pub trait VersionFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns `FetchError` if the source is unreachable or the document is malformed.
    fn fetch(&self) -> std::result::Result<VersionRecord, FetchError>;

    /// Human-readable location used in logs.
    fn location(&self) -> String;
}
