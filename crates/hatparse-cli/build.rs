use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=HATPARSE_BUILD_COMMIT");

    let commit = env::var("HATPARSE_BUILD_COMMIT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| git(&["rev-parse", "--short=7", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());
    let tree_changes = git(&["status", "--porcelain", "--untracked-files=no"]);
    let dirty = commit != "unknown" && tree_changes.is_some();
    let date = git(&["log", "-1", "--format=%cs"]);
    let date = date.as_deref().unwrap_or("unknown");

    let suffix = if dirty { "-dirty" } else { "" };
    println!("cargo:rustc-env=HATPARSE_BUILD_COMMIT={commit}{suffix}");
    println!("cargo:rustc-env=HATPARSE_BUILD_DATE={date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
