use std::cmp::Ordering;

use semver::Version;
use shipgate_core::{ChangeKind, VersionVerdict};

/// Highest-order component that differs between two versions.
///
/// Build metadata never counts as a difference.
#[must_use]
pub fn change_kind(from: &Version, to: &Version) -> ChangeKind {
    if from.major != to.major {
        ChangeKind::Major
    } else if from.minor != to.minor {
        ChangeKind::Minor
    } else if from.patch != to.patch {
        ChangeKind::Patch
    } else if from.pre != to.pre {
        ChangeKind::Prerelease
    } else {
        ChangeKind::None
    }
}

/// Decides whether `local` is a new version relative to the published `remote`.
///
/// Only a strictly greater local version counts as changed; an older local
/// version yields an unchanged verdict.
#[must_use]
pub fn compare(local: &Version, remote: &Version) -> VersionVerdict {
    match local.cmp_precedence(remote) {
        Ordering::Greater => VersionVerdict {
            changed: true,
            new_version: local.clone(),
            previous: remote.clone(),
            change_kind: change_kind(remote, local),
        },
        Ordering::Equal | Ordering::Less => VersionVerdict {
            changed: false,
            new_version: local.clone(),
            previous: remote.clone(),
            change_kind: ChangeKind::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn equal_versions_are_unchanged() {
        let verdict = compare(&v("1.2.3"), &v("1.2.3"));

        assert!(!verdict.changed);
        assert_eq!(verdict.change_kind, ChangeKind::None);
    }

    #[test]
    fn major_bump_over_higher_minor_is_major() {
        let verdict = compare(&v("2.0.0"), &v("1.9.9"));

        assert!(verdict.changed);
        assert_eq!(verdict.change_kind, ChangeKind::Major);
        assert_eq!(verdict.new_version, v("2.0.0"));
        assert_eq!(verdict.previous, v("1.9.9"));
    }

    #[test]
    fn minor_bump() {
        let verdict = compare(&v("1.3.0"), &v("1.2.7"));
        assert_eq!(verdict.change_kind, ChangeKind::Minor);
    }

    #[test]
    fn patch_bump() {
        let verdict = compare(&v("1.2.4"), &v("1.2.3"));
        assert_eq!(verdict.change_kind, ChangeKind::Patch);
    }

    #[test]
    fn older_local_version_is_not_a_change() {
        let verdict = compare(&v("1.2.2"), &v("1.2.3"));

        assert!(!verdict.changed);
        assert_eq!(verdict.change_kind, ChangeKind::None);
    }

    #[test]
    fn stable_release_after_prerelease_is_changed() {
        let verdict = compare(&v("1.0.0"), &v("1.0.0-beta.2"));

        assert!(verdict.changed);
        assert_eq!(verdict.change_kind, ChangeKind::Prerelease);
    }

    #[test]
    fn prerelease_identifiers_follow_precedence() {
        assert!(compare(&v("1.0.0-beta.11"), &v("1.0.0-beta.2")).changed);
        assert!(compare(&v("1.0.0-rc.1"), &v("1.0.0-beta.11")).changed);
        assert!(!compare(&v("1.0.0-alpha"), &v("1.0.0-alpha.1")).changed);
    }

    #[test]
    fn prerelease_of_next_minor_counts_as_minor() {
        let verdict = compare(&v("1.3.0-alpha.1"), &v("1.2.9"));

        assert!(verdict.changed);
        assert_eq!(verdict.change_kind, ChangeKind::Minor);
    }

    #[test]
    fn build_metadata_is_ignored() {
        let verdict = compare(&v("1.2.3+build.5"), &v("1.2.3+build.4"));

        assert!(!verdict.changed);
        assert_eq!(change_kind(&v("1.2.3+a"), &v("1.2.3+b")), ChangeKind::None);
    }
}
