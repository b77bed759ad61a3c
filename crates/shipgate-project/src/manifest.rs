use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use shipgate_core::CategoryLabel;

use crate::error::ProjectError;

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<Package>,
    pub(crate) workspace: Option<WorkspaceSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Package {
    pub(crate) name: String,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceSection {
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Metadata {
    pub(crate) shipgate: Option<ShipgateMetadata>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ShipgateMetadata {
    #[serde(default)]
    pub(crate) release: ReleaseMetadata,
    #[serde(default)]
    pub(crate) title: TitleMetadata,
    #[serde(default)]
    pub(crate) label: LabelMetadata,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct ReleaseMetadata {
    pub(crate) version_file: Option<String>,
    pub(crate) remote: Option<String>,
    pub(crate) version_pointer: Option<String>,
    pub(crate) publish_command: Option<CommandValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct TitleMetadata {
    pub(crate) allowed_types: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) require_scope: Vec<String>,
    #[serde(default)]
    pub(crate) disallow_scope: Vec<String>,
    pub(crate) subject_pattern: Option<String>,
    #[serde(default)]
    pub(crate) labels: BTreeMap<String, CategoryLabel>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct LabelMetadata {
    pub(crate) command: Option<CommandValue>,
    pub(crate) label_prefix: Option<String>,
}

/// A command given either as one string or as an argv list.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub(crate) enum CommandValue {
    Line(String),
    Args(Vec<String>),
}

impl CommandValue {
    pub(crate) fn into_args(self) -> Vec<String> {
        match self {
            Self::Line(line) => line.split_whitespace().map(ToString::to_string).collect(),
            Self::Args(args) => args,
        }
    }
}

pub(crate) fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

impl CargoManifest {
    /// Workspace metadata wins over package metadata when both exist.
    pub(crate) fn shipgate_metadata(self) -> Option<ShipgateMetadata> {
        let from_workspace = self
            .workspace
            .and_then(|ws| ws.metadata)
            .and_then(|meta| meta.shipgate);

        from_workspace.or_else(|| {
            self.package
                .and_then(|pkg| pkg.metadata)
                .and_then(|meta| meta.shipgate)
        })
    }
}
