use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("title is empty")]
    Empty,

    #[error("missing ':' separator after the change type")]
    MissingSeparator,

    #[error("expected whitespace after ':'")]
    MissingSpaceAfterSeparator,

    #[error("invalid change type '{found}': expected a lowercase token")]
    InvalidType { found: String },

    #[error("unknown change type '{found}' (allowed: {allowed})")]
    UnknownType { found: String, allowed: String },

    #[error("scope is missing its closing ')'")]
    UnclosedScope,

    #[error("scope cannot be empty")]
    EmptyScope,

    #[error("invalid scope '{found}'")]
    InvalidScope { found: String },

    #[error("subject cannot be empty")]
    EmptySubject,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("change type '{change_type}' requires a scope (require-scope)")]
    RequireScope { change_type: String },

    #[error("change type '{change_type}' must not have a scope, found '{scope}' (disallow-scope)")]
    DisallowScope { change_type: String, scope: String },

    #[error("subject '{subject}' does not match pattern '{pattern}' (subject-pattern)")]
    SubjectPattern { subject: String, pattern: String },
}

impl PolicyViolation {
    /// Name of the configuration rule that was violated.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::RequireScope { .. } => "require-scope",
            Self::DisallowScope { .. } => "disallow-scope",
            Self::SubjectPattern { .. } => "subject-pattern",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("malformed title")]
    Parse(#[from] ParseError),

    #[error("title violates policy")]
    Policy(#[from] PolicyViolation),
}

#[derive(Debug, Error)]
pub enum PolicyConfigError {
    #[error("allowed-types cannot be empty")]
    EmptyAllowedTypes,

    #[error("invalid change type '{name}' in allowed-types: expected a lowercase token")]
    InvalidTypeName { name: String },

    #[error("'{name}' in {field} is not listed in allowed-types")]
    UnknownType { field: &'static str, name: String },

    #[error("'{name}' is listed in both require-scope and disallow-scope")]
    ConflictingScopeRule { name: String },

    #[error("invalid subject-pattern '{pattern}'")]
    InvalidSubjectPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
