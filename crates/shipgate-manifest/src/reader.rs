use std::path::{Path, PathBuf};

use semver::Version;
use shipgate_core::VersionRecord;
use toml_edit::{DocumentMut, Item};

use crate::error::ManifestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Cargo,
    PackageJson,
}

impl ManifestKind {
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        if path.file_name().is_some_and(|name| name == "Cargo.toml") {
            return Some(Self::Cargo);
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::PackageJson),
            Some("toml") => Some(Self::Cargo),
            _ => None,
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(path: &Path) -> Result<DocumentMut, ManifestError> {
    read_to_string(path)?
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_version(path: &Path, version_str: &str) -> Result<Version, ManifestError> {
    Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        version: version_str.to_string(),
        source,
    })
}

fn is_inherited(version: &Item) -> bool {
    if let Some(table) = version.as_inline_table() {
        return table
            .get("workspace")
            .and_then(toml_edit::Value::as_bool)
            .unwrap_or(false);
    }
    if let Some(table) = version.as_table() {
        return table
            .get("workspace")
            .and_then(Item::as_bool)
            .unwrap_or(false);
    }
    false
}

fn workspace_version<'a>(doc: &'a DocumentMut, path: &Path) -> Result<&'a str, ManifestError> {
    doc.get("workspace")
        .and_then(|ws| ws.get("package"))
        .and_then(|pkg| pkg.get("version"))
        .and_then(Item::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "workspace.package.version".to_string(),
        })
}

/// Nearest ancestor `Cargo.toml` above `path` that declares `[workspace]`.
fn enclosing_workspace(path: &Path) -> Result<Option<PathBuf>, ManifestError> {
    let Some(dir) = path.parent() else {
        return Ok(None);
    };
    for ancestor in dir.ancestors().skip(1) {
        let candidate = ancestor.join("Cargo.toml");
        if candidate.is_file() && read_document(&candidate)?.get("workspace").is_some() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn inherited_version(doc: &DocumentMut, path: &Path) -> Result<Version, ManifestError> {
    if doc.get("workspace").is_some() {
        return parse_version(path, workspace_version(doc, path)?);
    }
    let Some(root) = enclosing_workspace(path)? else {
        return Err(ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "workspace.package.version".to_string(),
        });
    };
    let root_doc = read_document(&root)?;
    parse_version(&root, workspace_version(&root_doc, &root)?)
}

fn fallback_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .unwrap_or("workspace")
        .to_string()
}

/// Reads the declared version of a `Cargo.toml`.
///
/// Uses `package.version`. `version.workspace = true` resolves against the
/// file's own `[workspace.package]`, or against the nearest enclosing
/// workspace manifest when the file is a member. A virtual manifest falls back to
/// `workspace.package.version` and is named after its directory.
///
/// # Errors
///
/// Returns `ManifestError::MissingField` if no version is declared, or
/// `ManifestError::InvalidVersion` if the version string is not valid semver.
pub fn read_cargo_version(path: &Path) -> Result<VersionRecord, ManifestError> {
    let doc = read_document(path)?;

    let Some(package) = doc.get("package") else {
        let version = parse_version(path, workspace_version(&doc, path)?)?;
        return Ok(VersionRecord::new(fallback_name(path), version));
    };

    let name = package
        .get("name")
        .and_then(Item::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package.name".to_string(),
        })?
        .to_string();

    let version_item = package
        .get("version")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package.version".to_string(),
        })?;

    let version = if is_inherited(version_item) {
        inherited_version(&doc, path)?
    } else {
        let version_str = version_item
            .as_str()
            .ok_or_else(|| ManifestError::MissingField {
                path: path.to_path_buf(),
                field: "package.version (as string)".to_string(),
            })?;
        parse_version(path, version_str)?
    };

    Ok(VersionRecord::new(name, version))
}

/// Reads `name` and `version` from a `package.json`.
///
/// # Errors
///
/// Returns an error if the file is not JSON or lacks a valid `version`.
pub fn read_package_json_version(path: &Path) -> Result<VersionRecord, ManifestError> {
    let content = read_to_string(path)?;
    let doc: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| ManifestError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;

    let version_str = doc
        .get("version")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "version".to_string(),
        })?;

    let name = doc
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| fallback_name(path), ToString::to_string);

    Ok(VersionRecord::new(name, parse_version(path, version_str)?))
}

/// Reads the declared version from a manifest, choosing the format by file name.
///
/// # Errors
///
/// Returns `ManifestError::UnsupportedManifest` for unknown file types, or
/// any error from the format-specific reader.
pub fn read_local_version(path: &Path) -> Result<VersionRecord, ManifestError> {
    match ManifestKind::detect(path) {
        Some(ManifestKind::Cargo) => read_cargo_version(path),
        Some(ManifestKind::PackageJson) => read_package_json_version(path),
        None => Err(ManifestError::UnsupportedManifest {
            path: path.to_path_buf(),
        }),
    }
}
