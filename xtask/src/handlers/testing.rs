use crate::services::utils::normalize_project_name;
use anyhow::{Context, Result, bail};
use std::process::Command;

/// Runs unit and integration tests for the workspace, or for one crate.
///
/// `cargo nextest` is used when installed.
///
/// # Errors
/// Returns an error if the test runner cannot be started or any test fails.
pub fn run_tests(project: Option<&str>) -> Result<()> {
    let nextest = Command::new("cargo-nextest").arg("--version").output().is_ok();

    let mut args: Vec<String> =
        if nextest { vec!["nextest".into(), "run".into()] } else { vec!["test".into()] };
    args.extend(target_args(project));

    if nextest {
        args.extend(
            ["--failure-output", "immediate-final", "--success-output", "never"].map(String::from),
        );
    } else {
        args.extend(["--tests", "--lib", "--bins", "--", "-q"].map(String::from));
    }

    println!("🧪 Running {} tests via '{}'...", label(project), if nextest { "nextest" } else { "cargo test" });
    cargo(&args, "Tests failed!")
}

/// Runs doc tests for the workspace, or for one crate.
///
/// # Errors
/// Returns an error if `cargo test --doc` cannot be started or a doc test fails.
pub fn run_doctests(project: Option<&str>) -> Result<()> {
    let mut args: Vec<String> = vec!["test".into(), "--doc".into()];
    args.extend(target_args(project));

    println!("📚 Running {} doc tests...", label(project));
    cargo(&args, "Doc tests failed!")
}

fn is_workspace(project: Option<&str>) -> bool {
    project.is_none_or(|value| value == "all")
}

fn label(project: Option<&str>) -> &'static str {
    if is_workspace(project) { "workspace" } else { "crate" }
}

fn target_args(project: Option<&str>) -> Vec<String> {
    match project {
        Some(project) if !is_workspace(Some(project)) => {
            vec!["-p".into(), normalize_project_name(project)]
        },
        _ => vec!["--workspace".into()],
    }
}

fn cargo(args: &[String], failure: &str) -> Result<()> {
    let status = Command::new("cargo").args(args).status().context("Failed to execute cargo")?;
    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_or_nothing_targets_the_workspace() {
        assert_eq!(target_args(None), ["--workspace"]);
        assert_eq!(target_args(Some("all")), ["--workspace"]);
        assert_eq!(target_args(Some("vault")), ["-p", "crwa-vault"]);
    }
}
