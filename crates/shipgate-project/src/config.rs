use std::fmt;
use std::path::{Path, PathBuf};

use shipgate_title::TitlePolicy;

use crate::error::ProjectError;
use crate::manifest::{
    CommandValue, LabelMetadata, ReleaseMetadata, ShipgateMetadata, TitleMetadata, read_manifest,
};
use crate::project::Project;

/// Where the last published version is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocation {
    Http(String),
    File(PathBuf),
}

impl RemoteLocation {
    /// `http(s)://` locations are fetched over the network; `file://` and
    /// plain paths are read from disk, relative paths resolved against `base`.
    #[must_use]
    pub fn parse(location: &str, base: &Path) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Http(location.to_string());
        }
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        if path.is_absolute() {
            Self::File(path.to_path_buf())
        } else {
            Self::File(base.join(path))
        }
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// An external command as program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    #[must_use]
    pub fn from_args(args: Vec<String>) -> Option<Self> {
        let mut iter = args.into_iter();
        let program = iter.next().filter(|p| !p.trim().is_empty())?;
        Some(Self {
            program,
            args: iter.collect(),
        })
    }

    /// Splits a command line on whitespace; no shell quoting is applied.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        Self::from_args(line.split_whitespace().map(ToString::to_string).collect())
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with every `{placeholder}` replaced by `value`.
    #[must_use]
    pub fn render_args(&self, placeholder: &str, value: &str) -> Vec<String> {
        let token = format!("{{{placeholder}}}");
        self.args
            .iter()
            .map(|arg| arg.replace(&token, value))
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    version_file: PathBuf,
    remote: Option<RemoteLocation>,
    version_pointer: Option<String>,
    publish_command: Option<CommandSpec>,
}

impl ReleaseConfig {
    #[must_use]
    pub fn new(version_file: PathBuf) -> Self {
        Self {
            version_file,
            remote: None,
            version_pointer: None,
            publish_command: None,
        }
    }

    #[must_use]
    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    #[must_use]
    pub fn remote(&self) -> Option<&RemoteLocation> {
        self.remote.as_ref()
    }

    #[must_use]
    pub fn version_pointer(&self) -> Option<&str> {
        self.version_pointer.as_deref()
    }

    #[must_use]
    pub fn publish_command(&self) -> Option<&CommandSpec> {
        self.publish_command.as_ref()
    }

    #[must_use]
    pub fn with_version_file(mut self, path: PathBuf) -> Self {
        self.version_file = path;
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: RemoteLocation) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn with_version_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.version_pointer = Some(pointer.into());
        self
    }

    #[must_use]
    pub fn with_publish_command(mut self, command: CommandSpec) -> Self {
        self.publish_command = Some(command);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelConfig {
    command: Option<CommandSpec>,
    label_prefix: String,
}

impl LabelConfig {
    #[must_use]
    pub fn command(&self) -> Option<&CommandSpec> {
        self.command.as_ref()
    }

    #[must_use]
    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    #[must_use]
    pub fn with_command(mut self, command: CommandSpec) -> Self {
        self.command = Some(command);
        self
    }

    #[must_use]
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ShipgateConfig {
    release: ReleaseConfig,
    title: TitlePolicy,
    label: LabelConfig,
}

impl ShipgateConfig {
    /// Configuration used when no manifest metadata exists under `root`.
    #[must_use]
    pub fn defaults(root: &Path) -> Self {
        Self {
            release: ReleaseConfig::new(root.join(crate::DEFAULT_VERSION_FILE)),
            title: TitlePolicy::default(),
            label: LabelConfig::default(),
        }
    }

    #[must_use]
    pub fn release(&self) -> &ReleaseConfig {
        &self.release
    }

    #[must_use]
    pub fn title_policy(&self) -> &TitlePolicy {
        &self.title
    }

    #[must_use]
    pub fn label(&self) -> &LabelConfig {
        &self.label
    }

    #[must_use]
    pub fn into_parts(self) -> (ReleaseConfig, TitlePolicy, LabelConfig) {
        (self.release, self.title, self.label)
    }
}

fn build_command(
    value: Option<CommandValue>,
    manifest_path: &Path,
    field: &'static str,
) -> Result<Option<CommandSpec>, ProjectError> {
    value
        .map(|value| {
            CommandSpec::from_args(value.into_args()).ok_or_else(|| ProjectError::EmptyCommand {
                path: manifest_path.to_path_buf(),
                field,
            })
        })
        .transpose()
}

fn build_release_config(
    metadata: ReleaseMetadata,
    root: &Path,
    manifest_path: &Path,
) -> Result<ReleaseConfig, ProjectError> {
    let version_file = metadata
        .version_file
        .map_or_else(|| root.join(crate::DEFAULT_VERSION_FILE), |file| root.join(file));

    Ok(ReleaseConfig {
        version_file,
        remote: metadata
            .remote
            .map(|location| RemoteLocation::parse(&location, root)),
        version_pointer: metadata.version_pointer,
        publish_command: build_command(metadata.publish_command, manifest_path, "publish-command")?,
    })
}

fn build_title_policy(
    metadata: TitleMetadata,
    manifest_path: &Path,
) -> Result<TitlePolicy, ProjectError> {
    let mut builder = TitlePolicy::builder()
        .require_scope(metadata.require_scope)
        .disallow_scope(metadata.disallow_scope)
        .labels(metadata.labels);

    if let Some(types) = metadata.allowed_types {
        builder = builder.allowed_types(types);
    }
    if let Some(pattern) = metadata.subject_pattern {
        builder = builder.subject_pattern(pattern);
    }

    builder
        .build()
        .map_err(|source| ProjectError::InvalidPolicy {
            path: manifest_path.to_path_buf(),
            source,
        })
}

fn build_label_config(
    metadata: LabelMetadata,
    manifest_path: &Path,
) -> Result<LabelConfig, ProjectError> {
    Ok(LabelConfig {
        command: build_command(metadata.command, manifest_path, "label.command")?,
        label_prefix: metadata.label_prefix.unwrap_or_default(),
    })
}

fn build_config(
    metadata: ShipgateMetadata,
    root: &Path,
    manifest_path: &Path,
) -> Result<ShipgateConfig, ProjectError> {
    Ok(ShipgateConfig {
        release: build_release_config(metadata.release, root, manifest_path)?,
        title: build_title_policy(metadata.title, manifest_path)?,
        label: build_label_config(metadata.label, manifest_path)?,
    })
}

/// Loads `[workspace.metadata.shipgate]`, falling back to
/// `[package.metadata.shipgate]`, from the project's root manifest.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, a command is
/// empty, or the title policy is inconsistent.
pub fn load_config(project: &Project) -> Result<ShipgateConfig, ProjectError> {
    let manifest_path = project.manifest_path();
    let manifest = read_manifest(&manifest_path)?;

    match manifest.shipgate_metadata() {
        Some(metadata) => build_config(metadata, &project.root, &manifest_path),
        None => Ok(ShipgateConfig::defaults(&project.root)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectKind;
    use shipgate_core::CategoryLabel;
    use std::fs;
    use tempfile::TempDir;

    fn setup_with_config(toml_content: &str) -> anyhow::Result<(TempDir, Project)> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("Cargo.toml"), toml_content)?;
        let project = Project {
            root: dir.path().to_path_buf(),
            kind: ProjectKind::VirtualWorkspace,
            name: None,
        };
        Ok((dir, project))
    }

    #[test]
    fn missing_metadata_yields_defaults() -> anyhow::Result<()> {
        let (dir, project) = setup_with_config(
            r#"
[workspace]
members = ["crates/*"]
"#,
        )?;

        let config = load_config(&project)?;

        assert_eq!(config.release().version_file(), dir.path().join("Cargo.toml"));
        assert!(config.release().remote().is_none());
        assert!(config.title_policy().is_allowed("feat"));
        assert_eq!(config.label().label_prefix(), "");

        Ok(())
    }

    #[test]
    fn reads_release_section() -> anyhow::Result<()> {
        let (dir, project) = setup_with_config(
            r#"
[workspace]
members = ["crates/*"]

[workspace.metadata.shipgate.release]
version-file = "npm/oxc-parser/package.json"
remote = "https://registry.npmjs.org/oxc-parser/latest"
publish-command = ["npm", "publish", "--tag", "latest"]
"#,
        )?;

        let config = load_config(&project)?;
        let release = config.release();

        assert_eq!(
            release.version_file(),
            dir.path().join("npm/oxc-parser/package.json")
        );
        assert_eq!(
            release.remote(),
            Some(&RemoteLocation::Http(
                "https://registry.npmjs.org/oxc-parser/latest".to_string()
            ))
        );
        let command = release.publish_command().expect("publish command");
        assert_eq!(command.program(), "npm");
        assert_eq!(command.args(), ["publish", "--tag", "latest"]);

        Ok(())
    }

    #[test]
    fn command_may_be_a_single_line() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[package]
name = "single"
version = "1.0.0"

[package.metadata.shipgate.release]
publish-command = "cargo publish --locked"
"#,
        )?;

        let config = load_config(&project)?;
        let command = config.release().publish_command().expect("publish command");

        assert_eq!(command.to_string(), "cargo publish --locked");

        Ok(())
    }

    #[test]
    fn empty_command_is_rejected() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[workspace]

[workspace.metadata.shipgate.label]
command = []
"#,
        )?;

        let err = load_config(&project).expect_err("empty command");

        assert!(matches!(err, ProjectError::EmptyCommand { field: "label.command", .. }));

        Ok(())
    }

    #[test]
    fn reads_title_policy() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[workspace]

[workspace.metadata.shipgate.title]
allowed-types = ["feat", "fix", "chore", "build"]
disallow-scope = ["chore", "build"]

[workspace.metadata.shipgate.title.labels]
build = "cleanup"
"#,
        )?;

        let config = load_config(&project)?;
        let policy = config.title_policy();

        assert!(policy.disallows_scope("build"));
        assert!(!policy.is_allowed("docs"));
        assert_eq!(policy.label_for_type("build"), CategoryLabel::Cleanup);
        assert_eq!(policy.label_for_type("feat"), CategoryLabel::Enhancement);

        Ok(())
    }

    #[test]
    fn inconsistent_policy_is_rejected() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[workspace]

[workspace.metadata.shipgate.title]
require-scope = ["note"]
"#,
        )?;

        let err = load_config(&project).expect_err("unknown type");

        assert!(matches!(err, ProjectError::InvalidPolicy { .. }));

        Ok(())
    }

    #[test]
    fn unknown_label_name_is_a_parse_error() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[workspace]

[workspace.metadata.shipgate.title.labels]
feat = "feature"
"#,
        )?;

        let err = load_config(&project).expect_err("unknown label");

        assert!(matches!(err, ProjectError::ManifestParse { .. }));

        Ok(())
    }

    #[test]
    fn workspace_metadata_wins_over_package_metadata() -> anyhow::Result<()> {
        let (_dir, project) = setup_with_config(
            r#"
[workspace]

[workspace.metadata.shipgate.label]
label-prefix = "C-"

[package]
name = "root"
version = "0.1.0"

[package.metadata.shipgate.label]
label-prefix = "pkg-"
"#,
        )?;

        let config = load_config(&project)?;

        assert_eq!(config.label().label_prefix(), "C-");

        Ok(())
    }

    #[test]
    fn remote_paths_resolve_against_root() {
        let root = Path::new("/repo");

        assert_eq!(
            RemoteLocation::parse("published.json", root),
            RemoteLocation::File(PathBuf::from("/repo/published.json"))
        );
        assert_eq!(
            RemoteLocation::parse("file:///tmp/v.json", root),
            RemoteLocation::File(PathBuf::from("/tmp/v.json"))
        );
        assert!(matches!(
            RemoteLocation::parse("https://crates.io/api/v1/crates/oxc", root),
            RemoteLocation::Http(_)
        ));
    }

    #[test]
    fn render_args_substitutes_placeholder() {
        let command = CommandSpec::parse_line("gh pr edit 12 --add-label {label}")
            .expect("valid command");

        assert_eq!(
            command.render_args("label", "C-bug"),
            ["pr", "edit", "12", "--add-label", "C-bug"]
        );
    }

    #[test]
    fn blank_command_line_is_none() {
        assert!(CommandSpec::parse_line("   ").is_none());
    }
}
