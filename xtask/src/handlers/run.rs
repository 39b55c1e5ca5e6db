use crate::services::utils::normalize_project_name;
use anyhow::{Context, bail};

/// Environment selected for `cargo xtask run` when `CRWA_ENV` is not set.
const DEFAULT_ENV: &str = "development";

/// Runs a project with `cargo run`.
///
/// `CRWA_ENV` defaults to `development` when unset.
///
/// # Errors
/// Returns an error if the project fails to build or exits with a non-zero status.
pub fn run_project(project: &str) -> anyhow::Result<()> {
    let project = normalize_project_name(project);
    let environment = std::env::var("CRWA_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_owned());

    println!("🚀 Starting {project} ({environment})...");

    let status = std::process::Command::new("cargo")
        .args(["run", "-p", &project])
        .env("CRWA_ENV", &environment)
        .status()
        .context("Failed to execute cargo run")?;

    if !status.success() {
        bail!("Project exited with non-zero status: {}", status.code().unwrap_or(-1));
    }

    Ok(())
}
