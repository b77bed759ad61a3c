mod command;
mod manifest;
mod remote;

pub use command::{CommandLabelSink, CommandPublisher};
pub use manifest::FileSystemVersionSource;
pub use remote::{FileVersionFetcher, HttpVersionFetcher, RemoteVersionFetcher};
