use crate::services::utils::{get_workspace_crates, render_crate_table};
use anyhow::Result;

/// Lists all crates in the `crates/features` directory.
///
/// # Errors
/// Returns an error if the directory cannot be read or crate metadata cannot be parsed.
pub fn list_blueprints() -> Result<()> {
    let blueprints = get_workspace_crates("crates/features")?;

    if blueprints.is_empty() {
        println!("ℹ️ No blueprints found in 'crates/features/' directory.");
        return Ok(());
    }

    render_crate_table("Blueprints", &blueprints);

    Ok(())
}
