//! Build metadata for the startup banner and the `x-service-version` header.
//!
//! Each value can be pinned from the environment (container builds have no
//! `.git`), otherwise it is read from git, otherwise it is `unknown`.

use std::path::PathBuf;
use std::process::Command;

fn main() {
    let date = pinned("BUILD_DATE").unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
    let commit = pinned("BUILD_COMMIT")
        .or_else(|| git(&["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_owned());
    let branch = pinned("BUILD_BRANCH")
        .or_else(|| git(&["rev-parse", "--abbrev-ref", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_owned());

    println!("cargo:rustc-env=BUILD_DATE={date}");
    println!("cargo:rustc-env=BUILD_COMMIT={commit}");
    println!("cargo:rustc-env=BUILD_BRANCH={branch}");

    // Wherever the repository root is relative to this crate.
    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]) {
        let head = PathBuf::from(git_dir).join("HEAD");
        println!("cargo:rerun-if-changed={}", head.display());
    }
}

fn pinned(name: &str) -> Option<String> {
    println!("cargo:rerun-if-env-changed={name}");
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_owned())
}
