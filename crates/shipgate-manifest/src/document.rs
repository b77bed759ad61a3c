use semver::Version;
use serde_json::Value;

use crate::error::DocumentError;

pub const DEFAULT_VERSION_POINTER: &str = "/version";

fn normalize_pointer(pointer: &str) -> String {
    if pointer.is_empty() || pointer.starts_with('/') {
        pointer.to_string()
    } else {
        format!("/{pointer}")
    }
}

/// Extracts a semver string from a JSON document.
///
/// `pointer` is a JSON pointer such as `/version` or `/crate/max_version`;
/// a bare key like `version` is treated as `/version`. Returns the top-level
/// `name` field alongside the version when the document has one.
///
/// # Errors
///
/// Returns `DocumentError` if the content is not JSON, the pointer does not
/// resolve to a string, or the string is not a valid semantic version.
pub fn version_from_json(
    content: &str,
    pointer: &str,
) -> Result<(Option<String>, Version), DocumentError> {
    let doc: Value = serde_json::from_str(content)?;
    let pointer = normalize_pointer(pointer);

    let field = doc
        .pointer(&pointer)
        .ok_or_else(|| DocumentError::MissingField {
            pointer: pointer.clone(),
        })?;

    let version_str = field
        .as_str()
        .ok_or(DocumentError::NotAString { pointer })?;

    let version =
        Version::parse(version_str.trim()).map_err(|source| DocumentError::InvalidVersion {
            version: version_str.to_string(),
            source,
        })?;

    let name = doc.get("name").and_then(Value::as_str).map(ToString::to_string);

    Ok((name, version))
}
