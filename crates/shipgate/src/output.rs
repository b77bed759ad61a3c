//! `key=value` lines on stdout, suitable for appending to `$GITHUB_OUTPUT`.

use shipgate_core::{VersionRecord, VersionVerdict};
use shipgate_title::ChangeRequestTitle;

pub(crate) fn print_field(key: &str, value: impl std::fmt::Display) {
    println!("{key}={value}");
}

pub(crate) fn print_verdict(local: Option<&VersionRecord>, verdict: &VersionVerdict) {
    if let Some(local) = local {
        print_field("name", &local.name);
    }
    print_field("changed", verdict.changed);
    print_field("version", &verdict.new_version);
    print_field("previous", &verdict.previous);
    print_field("kind", verdict.change_kind);
}

pub(crate) fn print_title(title: &ChangeRequestTitle) {
    print_field("type", &title.raw_type);
    print_field("scope", title.scope.as_deref().unwrap_or(""));
    print_field("breaking", title.breaking);
}
