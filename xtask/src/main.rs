#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::disallowed_methods,
    clippy::disallowed_types
)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{blueprints, run, testing, vault};
use crate::models::args::{AppCommands, BlueprintAction, Cli, VaultAction};

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        AppCommands::Blueprints { action } => match action {
            BlueprintAction::List {} => blueprints::list_blueprints()?,
        },
        AppCommands::Vault { action } => match action {
            VaultAction::Seal { input, output, password, chacha, compress } => {
                vault::seal(&input, &output, &password, chacha, compress)?;
            },
            VaultAction::Inspect { path, password } => vault::inspect(&path, &password)?,
        },
        AppCommands::Test { project } => testing::run_tests(project.as_deref())?,
        AppCommands::Doctest { project } => testing::run_doctests(project.as_deref())?,
        AppCommands::Run { project } => run::run_project(&project)?,
    }

    Ok(())
}
