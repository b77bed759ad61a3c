use shipgate_core::{ConcurrencyKey, CoreError};

const CI_ENV_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "BUILDKITE",
    "TF_BUILD",
    "JENKINS_URL",
    "CI",
];

/// Name of the first CI marker variable present, if any.
pub(crate) fn detect_ci() -> Option<&'static str> {
    detect_ci_with(|name| std::env::var(name).ok())
}

fn detect_ci_with(lookup: impl Fn(&str) -> Option<String>) -> Option<&'static str> {
    CI_ENV_VARS.iter().copied().find(|var| lookup(var).is_some())
}

/// Run-group key for the current invocation.
///
/// An explicit key wins. Otherwise the key is `<workflow>-<ref>` from the
/// GitHub Actions environment, so pushes to the same branch share a group;
/// outside CI it falls back to `shipgate-<command>`.
pub(crate) fn concurrency_key(
    explicit: Option<&str>,
    command: &str,
) -> Result<ConcurrencyKey, CoreError> {
    concurrency_key_with(explicit, command, |name| std::env::var(name).ok())
}

fn concurrency_key_with(
    explicit: Option<&str>,
    command: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConcurrencyKey, CoreError> {
    if let Some(key) = explicit {
        return ConcurrencyKey::new(key);
    }

    let workflow = lookup("GITHUB_WORKFLOW");
    let ref_name = lookup("GITHUB_REF_NAME");

    match workflow {
        Some(workflow) if !workflow.trim().is_empty() => {
            ConcurrencyKey::for_event([workflow.as_str(), ref_name.as_deref().unwrap_or("")])
        }
        _ => ConcurrencyKey::for_event(["shipgate", command]),
    }
}
