//! Rewrites `tests/golden/*/expected_report.json` from each `input.eep`.
//!
//! Run from the workspace root. With `--check`, nothing is written and the
//! exit code reports whether any expected report is stale.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hatparse_core::{Report, report_file};

fn main() -> ExitCode {
    let check = std::env::args().skip(1).any(|arg| arg == "--check");
    match run(check) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(stale) => {
            eprintln!("{stale} golden report(s) out of date");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(check: bool) -> Result<usize, String> {
    let mut stale = 0;
    for case in golden_cases(&PathBuf::from("tests").join("golden"))? {
        let input = case.join("input.eep");
        let output = case.join("expected_report.json");
        let json = render_report(&input)?;

        let current = fs::read_to_string(&output).ok();
        if current.as_deref() == Some(json.as_str()) {
            continue;
        }
        if check {
            eprintln!("stale: {}", output.display());
            stale += 1;
        } else {
            fs::write(&output, json)
                .map_err(|err| format!("failed to write {}: {err}", output.display()))?;
            eprintln!("updated: {}", output.display());
        }
    }
    Ok(stale)
}

fn golden_cases(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|err| format!("failed to read {}: {err}", root.display()))?;
    let mut cases = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("failed to read entry: {err}"))?
            .path();
        if path.join("input.eep").is_file() {
            cases.push(path);
        }
    }
    cases.sort();
    Ok(cases)
}

fn render_report(input: &Path) -> Result<String, String> {
    let mut report: Report = report_file(input)
        .map_err(|err| format!("decoding failed for {}: {err}", input.display()))?;
    // Keep paths relative so reports do not depend on the checkout location.
    report.input.path = input.display().to_string().replace('\\', "/");
    serde_json::to_string(&report).map_err(|err| format!("JSON serialization failed: {err}"))
}
