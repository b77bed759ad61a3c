use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let git_hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_owned());

    let tagged = git_hash != "unknown"
        && git(&["tag", "--points-at", "HEAD"]).is_some_and(|tags| {
            let expected = format!("shipgate@v{version}");
            tags.lines().any(|line| line.trim() == expected)
        });

    let version_string = if tagged {
        version.to_owned()
    } else {
        let build_date = Utc::now().format("%Y%m%d").to_string();
        format!("{version}+{git_hash}.{build_date}")
    };

    println!("cargo:rustc-env=SHIPGATE_VERSION={version_string}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8(output.stdout).ok()?.trim().to_owned())
    } else {
        None
    }
}
