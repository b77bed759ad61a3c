mod check;
mod classify;
mod label;
mod release;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use shipgate_operations::OperationError;
use shipgate_operations::providers::{FileSystemVersionSource, RemoteVersionFetcher};
use shipgate_project::{
    CommandSpec, ProjectError, ReleaseConfig, RemoteLocation, ShipgateConfig, discover_project,
};
use tracing::debug;

use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compare the declared version against the published one
    Check(CheckArgs),
    /// Publish when the declared version is newer than the published one
    Release(ReleaseArgs),
    /// Parse a change-request title and print its category label
    Classify(TitleArgs),
    /// Classify a change-request title and apply its category label
    Label(LabelArgs),
}

#[derive(Args)]
pub(crate) struct VersionArgs {
    /// Manifest declaring the local version (Cargo.toml or package.json)
    #[arg(long)]
    pub version_file: Option<PathBuf>,

    /// Published version document: an http(s) URL, a file:// URL, or a path
    #[arg(long)]
    pub remote: Option<String>,

    /// JSON pointer to the version field in the remote document
    #[arg(long)]
    pub version_pointer: Option<String>,
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub version: VersionArgs,
}

#[derive(Args)]
pub(crate) struct ReleaseArgs {
    #[command(flatten)]
    pub version: VersionArgs,

    /// Publish command; `{version}` is replaced with the new version
    #[arg(long)]
    pub publish_command: Option<String>,

    /// Decide without publishing
    #[arg(long)]
    pub dry_run: bool,

    /// Run-group key (default: derived from the CI environment)
    ///
    /// Supersession only applies to runs inside this process. Separate
    /// invocations are not cancelled by each other; use a CI concurrency
    /// group with the same key to serialize them.
    #[arg(long)]
    pub concurrency_key: Option<String>,
}

#[derive(Args)]
pub(crate) struct TitleArgs {
    /// Change-request title, e.g. "fix(parser): handle empty input"
    #[arg(long, env = "SHIPGATE_TITLE")]
    pub title: String,
}

#[derive(Args)]
pub(crate) struct LabelArgs {
    #[command(flatten)]
    pub title: TitleArgs,

    /// Label command; `{label}` is replaced with the prefixed label name
    #[arg(long)]
    pub label_command: Option<String>,

    /// Prefix prepended to label names, e.g. "C-"
    #[arg(long)]
    pub label_prefix: Option<String>,
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Check(args) => check::run(args, start_path),
            Self::Release(args) => release::run(args, start_path),
            Self::Classify(args) => classify::run(args, start_path),
            Self::Label(args) => label::run(args, start_path),
        }
    }
}

/// Project root and configuration; built-in defaults apply outside a Cargo
/// project.
fn load_config(start_path: &Path) -> Result<(PathBuf, ShipgateConfig)> {
    match discover_project(start_path) {
        Ok(project) => {
            let config = shipgate_project::load_config(&project)?;
            Ok((project.root, config))
        }
        Err(ProjectError::NotFound { .. }) => {
            debug!(path = %start_path.display(), "no Cargo project found, using defaults");
            Ok((
                start_path.to_path_buf(),
                ShipgateConfig::defaults(start_path),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_command(line: &str, flag: &'static str) -> Result<CommandSpec> {
    CommandSpec::parse_line(line).ok_or(CliError::EmptyCommand { flag })
}

impl VersionArgs {
    fn apply(self, mut release: ReleaseConfig, base: &Path) -> ReleaseConfig {
        if let Some(path) = self.version_file {
            release = release.with_version_file(base.join(path));
        }
        if let Some(remote) = self.remote {
            release = release.with_remote(RemoteLocation::parse(&remote, base));
        }
        if let Some(pointer) = self.version_pointer {
            release = release.with_version_pointer(pointer);
        }
        release
    }
}

fn version_providers(
    release: &ReleaseConfig,
) -> Result<(FileSystemVersionSource, RemoteVersionFetcher)> {
    let remote = release.remote().ok_or(OperationError::MissingRemote)?;
    let fetcher = RemoteVersionFetcher::from_location(remote, release.version_pointer())
        .map_err(OperationError::from)?;
    Ok((FileSystemVersionSource::new(release.version_file()), fetcher))
}
