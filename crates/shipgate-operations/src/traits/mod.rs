mod label_sink;
mod publisher;
mod version_source;

pub use label_sink::LabelSink;
pub use publisher::{PublishReport, Publisher};
pub use version_source::{LocalVersionSource, VersionFetcher};
