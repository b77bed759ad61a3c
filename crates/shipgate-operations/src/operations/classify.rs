use shipgate_core::CategoryLabel;
use shipgate_title::{ChangeRequestTitle, TitleError, TitlePolicy};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub title: ChangeRequestTitle,
    pub label: CategoryLabel,
}

/// Parses change-request titles against a policy and derives their label.
#[derive(Debug, Clone, Default)]
pub struct TitleClassifier {
    policy: TitlePolicy,
}

impl TitleClassifier {
    #[must_use]
    pub fn new(policy: TitlePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &TitlePolicy {
        &self.policy
    }

    /// # Errors
    ///
    /// Returns `TitleError::Parse` if the title is malformed or uses a type
    /// outside the vocabulary, and `TitleError::Policy` if it breaks a scope
    /// or subject rule.
    pub fn classify(&self, title: &str) -> Result<Classification, TitleError> {
        let title = shipgate_title::classify(title, &self.policy)?;
        let label = shipgate_title::label_for(&title, &self.policy);
        debug!(
            change_type = %title.raw_type,
            scope = title.scope.as_deref().unwrap_or(""),
            %label,
            "classified title"
        );
        Ok(Classification { title, label })
    }
}

#[cfg(test)]
mod tests {
    use shipgate_title::{ParseError, PolicyViolation};

    use super::*;

    #[test]
    fn default_policy_labels_features() {
        let classifier = TitleClassifier::default();

        let result = classifier
            .classify("feat(parser): add x")
            .expect("valid title");

        assert_eq!(result.title.raw_type, "feat");
        assert_eq!(result.title.scope.as_deref(), Some("parser"));
        assert_eq!(result.label, CategoryLabel::Enhancement);
    }

    #[test]
    fn scope_disallowed_type_without_scope_is_accepted() {
        let policy = TitlePolicy::builder()
            .disallow_scope(["chore", "build"])
            .build()
            .expect("valid policy");
        let classifier = TitleClassifier::new(policy);

        let result = classifier.classify("chore: bump deps").expect("valid title");

        assert!(result.title.scope.is_none());
        assert_eq!(result.label, CategoryLabel::Cleanup);

        let err = classifier.classify("build(ci): x").expect_err("should fail");
        assert!(matches!(
            err,
            TitleError::Policy(PolicyViolation::DisallowScope { .. })
        ));
    }

    #[test]
    fn unknown_type_is_parse_error() {
        let err = TitleClassifier::default()
            .classify("note: something")
            .expect_err("should fail");

        assert!(matches!(
            err,
            TitleError::Parse(ParseError::UnknownType { .. })
        ));
    }

    #[test]
    fn unmapped_type_has_no_label() {
        let result = TitleClassifier::default()
            .classify("ci: cache cargo registry")
            .expect("valid title");

        assert!(result.label.is_none());
    }
}
