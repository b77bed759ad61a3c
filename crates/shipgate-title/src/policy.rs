use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use shipgate_core::CategoryLabel;

use crate::error::{PolicyConfigError, PolicyViolation};
use crate::parse::ChangeRequestTitle;

pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

const DEFAULT_LABELS: &[(&str, CategoryLabel)] = &[
    ("feat", CategoryLabel::Enhancement),
    ("fix", CategoryLabel::Bug),
    ("test", CategoryLabel::Test),
    ("refactor", CategoryLabel::Cleanup),
    ("style", CategoryLabel::Cleanup),
    ("chore", CategoryLabel::Cleanup),
    ("docs", CategoryLabel::Docs),
    ("perf", CategoryLabel::Performance),
];

pub(crate) fn is_type_token(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Allowed change types, scope rules, and the type to label table.
#[derive(Debug, Clone)]
pub struct TitlePolicy {
    allowed_types: IndexSet<String>,
    require_scope: IndexSet<String>,
    disallow_scope: IndexSet<String>,
    subject_pattern: Option<Regex>,
    labels: IndexMap<String, CategoryLabel>,
}

impl Default for TitlePolicy {
    fn default() -> Self {
        Self {
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(ToString::to_string).collect(),
            require_scope: IndexSet::new(),
            disallow_scope: IndexSet::new(),
            subject_pattern: None,
            labels: DEFAULT_LABELS
                .iter()
                .map(|(name, label)| ((*name).to_string(), *label))
                .collect(),
        }
    }
}

impl TitlePolicy {
    #[must_use]
    pub fn builder() -> TitlePolicyBuilder {
        TitlePolicyBuilder::default()
    }

    pub fn allowed_types(&self) -> impl Iterator<Item = &str> {
        self.allowed_types.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_allowed(&self, change_type: &str) -> bool {
        self.allowed_types.contains(change_type)
    }

    #[must_use]
    pub fn requires_scope(&self, change_type: &str) -> bool {
        self.require_scope.contains(change_type)
    }

    #[must_use]
    pub fn disallows_scope(&self, change_type: &str) -> bool {
        self.disallow_scope.contains(change_type)
    }

    #[must_use]
    pub fn subject_pattern(&self) -> Option<&Regex> {
        self.subject_pattern.as_ref()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, CategoryLabel)> {
        self.labels.iter().map(|(name, label)| (name.as_str(), *label))
    }

    /// Total lookup: types without an entry map to `CategoryLabel::None`.
    #[must_use]
    pub fn label_for_type(&self, change_type: &str) -> CategoryLabel {
        self.labels
            .get(change_type)
            .copied()
            .unwrap_or(CategoryLabel::None)
    }

    /// # Errors
    ///
    /// Returns the first scope or subject rule the title breaks.
    pub fn check(&self, title: &ChangeRequestTitle) -> Result<(), PolicyViolation> {
        match &title.scope {
            None if self.requires_scope(&title.raw_type) => {
                return Err(PolicyViolation::RequireScope {
                    change_type: title.raw_type.clone(),
                });
            }
            Some(scope) if self.disallows_scope(&title.raw_type) => {
                return Err(PolicyViolation::DisallowScope {
                    change_type: title.raw_type.clone(),
                    scope: scope.clone(),
                });
            }
            _ => {}
        }

        if let Some(pattern) = &self.subject_pattern {
            if !pattern.is_match(&title.subject) {
                return Err(PolicyViolation::SubjectPattern {
                    subject: title.subject.clone(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builds a validated [`TitlePolicy`].
///
/// Label entries are layered over the default table; mapping a type to
/// `none` removes its label.
#[derive(Debug, Clone, Default)]
pub struct TitlePolicyBuilder {
    allowed_types: Option<Vec<String>>,
    require_scope: Vec<String>,
    disallow_scope: Vec<String>,
    subject_pattern: Option<String>,
    labels: IndexMap<String, CategoryLabel>,
}

impl TitlePolicyBuilder {
    #[must_use]
    pub fn allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn require_scope<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_scope.extend(types.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn disallow_scope<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallow_scope.extend(types.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn subject_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.subject_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn label(mut self, change_type: impl Into<String>, label: CategoryLabel) -> Self {
        self.labels.insert(change_type.into(), label);
        self
    }

    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (S, CategoryLabel)>,
        S: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|(name, label)| (name.into(), label)));
        self
    }

    /// # Errors
    ///
    /// Returns `PolicyConfigError` if a rule references a type outside
    /// `allowed-types`, a type is both scope-required and scope-disallowed, or
    /// the subject pattern is not a valid regex.
    pub fn build(self) -> Result<TitlePolicy, PolicyConfigError> {
        let allowed_types: IndexSet<String> = match self.allowed_types {
            Some(types) => types.into_iter().collect(),
            None => DEFAULT_ALLOWED_TYPES.iter().map(ToString::to_string).collect(),
        };

        if allowed_types.is_empty() {
            return Err(PolicyConfigError::EmptyAllowedTypes);
        }
        if let Some(name) = allowed_types.iter().find(|name| !is_type_token(name)) {
            return Err(PolicyConfigError::InvalidTypeName { name: name.clone() });
        }

        let require_scope = collect_known(self.require_scope, &allowed_types, "require-scope")?;
        let disallow_scope = collect_known(self.disallow_scope, &allowed_types, "disallow-scope")?;

        if let Some(name) = require_scope.intersection(&disallow_scope).next() {
            return Err(PolicyConfigError::ConflictingScopeRule { name: name.clone() });
        }

        let mut labels: IndexMap<String, CategoryLabel> = DEFAULT_LABELS
            .iter()
            .filter(|(name, _)| allowed_types.contains(*name))
            .map(|(name, label)| ((*name).to_string(), *label))
            .collect();

        for (name, label) in self.labels {
            if !allowed_types.contains(&name) {
                return Err(PolicyConfigError::UnknownType {
                    field: "labels",
                    name,
                });
            }
            if label.is_none() {
                labels.shift_remove(&name);
            } else {
                labels.insert(name, label);
            }
        }

        let subject_pattern = self
            .subject_pattern
            .map(|pattern| {
                Regex::new(&pattern)
                    .map_err(|source| PolicyConfigError::InvalidSubjectPattern { pattern, source })
            })
            .transpose()?;

        Ok(TitlePolicy {
            allowed_types,
            require_scope,
            disallow_scope,
            subject_pattern,
            labels,
        })
    }
}

fn collect_known(
    names: Vec<String>,
    allowed: &IndexSet<String>,
    field: &'static str,
) -> Result<IndexSet<String>, PolicyConfigError> {
    names
        .into_iter()
        .map(|name| {
            if allowed.contains(&name) {
                Ok(name)
            } else {
                Err(PolicyConfigError::UnknownType { field, name })
            }
        })
        .collect()
}
