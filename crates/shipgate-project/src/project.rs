use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::manifest::{CargoManifest, read_manifest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    VirtualWorkspace,
    WorkspaceWithRoot,
    SinglePackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Root package name, absent for virtual workspaces.
    pub name: Option<String>,
}

impl Project {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }
}

/// Walks upward from `start_dir` to the nearest workspace root, or the
/// nearest package if no workspace encloses it.
///
/// # Errors
///
/// Returns `ProjectError` if `start_dir` does not exist, no `Cargo.toml` is
/// found, or a manifest on the way cannot be parsed.
pub fn discover_project(start_dir: &Path) -> Result<Project, ProjectError> {
    let canonical = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let mut nearest_package: Option<(&Path, CargoManifest)> = None;

    for dir in canonical.ancestors() {
        let manifest_path = dir.join("Cargo.toml");
        if !manifest_path.is_file() {
            continue;
        }

        let manifest = read_manifest(&manifest_path)?;
        if manifest.workspace.is_some() {
            return Ok(Project::from_manifest(dir, manifest));
        }
        if nearest_package.is_none() && manifest.package.is_some() {
            nearest_package = Some((dir, manifest));
        }
    }

    nearest_package
        .map(|(dir, manifest)| Project::from_manifest(dir, manifest))
        .ok_or_else(|| ProjectError::NotFound {
            start_dir: canonical.clone(),
        })
}

impl Project {
    fn from_manifest(root: &Path, manifest: CargoManifest) -> Self {
        let kind = match (manifest.workspace.is_some(), manifest.package.is_some()) {
            (true, true) => ProjectKind::WorkspaceWithRoot,
            (false, true) => ProjectKind::SinglePackage,
            (_, false) => ProjectKind::VirtualWorkspace,
        };
        Self {
            root: root.to_path_buf(),
            kind,
            name: manifest.package.map(|package| package.name),
        }
    }
}
