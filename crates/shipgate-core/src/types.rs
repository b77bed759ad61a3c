use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::Deserialize;

use crate::error::CoreError;

/// A named version read from one side of a version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub name: String,
    pub semver: Version,
}

impl VersionRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, semver: Version) -> Self {
        Self {
            name: name.into(),
            semver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChangeKind {
    #[default]
    None,
    Prerelease,
    Patch,
    Minor,
    Major,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Prerelease => "prerelease",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Outcome of comparing a local version against the last published one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionVerdict {
    pub changed: bool,
    pub new_version: Version,
    pub previous: Version,
    pub change_kind: ChangeKind,
}

impl VersionVerdict {
    #[must_use]
    pub fn unchanged(current: Version) -> Self {
        Self {
            changed: false,
            previous: current.clone(),
            new_version: current,
            change_kind: ChangeKind::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    Enhancement,
    Bug,
    Test,
    Cleanup,
    Docs,
    Performance,
    /// No category applies; nothing gets labeled.
    None,
}

impl CategoryLabel {
    pub const ALL: [Self; 6] = [
        Self::Enhancement,
        Self::Bug,
        Self::Test,
        Self::Cleanup,
        Self::Docs,
        Self::Performance,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enhancement => "enhancement",
            Self::Bug => "bug",
            Self::Test => "test",
            Self::Cleanup => "cleanup",
            Self::Docs => "docs",
            Self::Performance => "performance",
            Self::None => "none",
        }
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| CoreError::UnknownLabel(s.to_string()))
    }
}


/// Identifies a run group; a newer run with the same key supersedes an older one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConcurrencyKey {
    scope: String,
}

impl ConcurrencyKey {
    /// # Errors
    ///
    /// Returns `CoreError::EmptyConcurrencyKey` if the scope is blank.
    pub fn new(scope: impl Into<String>) -> Result<Self, CoreError> {
        let scope = scope.into();
        if scope.trim().is_empty() {
            return Err(CoreError::EmptyConcurrencyKey);
        }
        Ok(Self { scope })
    }

    /// Joins the non-empty event parts with `-`, e.g. `release-main-1a2b3c`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyConcurrencyKey` if every part is blank.
    pub fn for_event<'a>(parts: impl IntoIterator<Item = &'a str>) -> Result<Self, CoreError> {
        let scope = parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self::new(scope)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.scope
    }
}

impl fmt::Display for ConcurrencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scope)
    }
}
