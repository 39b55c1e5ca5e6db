//! # CLI Argument Definitions
//!
//! This module defines the command-line interface (CLI) structure using the `clap` crate.
//! It specifies the available subcommands, arguments, and flags for the application.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer toolkit for the CRWA flagging workspace")]
pub struct Cli {
    /// The main subcommand to execute.
    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available application subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Inspect workspace Blueprints
    Blueprints {
        #[command(subcommand)]
        action: BlueprintAction,
    },
    /// Create and inspect vault files
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
    /// Run tests (workspace by default)
    Test {
        /// Run tests for a specific crate (auto-prefixes with 'crwa-' if missing)
        project: Option<String>,
    },
    /// Run doc tests (workspace by default)
    Doctest {
        /// Run doc tests for a specific crate (auto-prefixes with 'crwa-' if missing)
        project: Option<String>,
    },
    /// Run a project
    Run {
        /// Run a specific crate (auto-prefixes with 'crwa-' if missing)
        #[arg(default_value = "server")]
        project: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum BlueprintAction {
    /// List all blueprints in the crates/features directory with their descriptions
    List {},
}

#[derive(Debug, Subcommand)]
pub enum VaultAction {
    /// Seal a JSON keys file (`{"group": {"field": "value"}}`) into a vault file
    Seal {
        /// Plaintext JSON keys file
        input: PathBuf,

        /// Vault file to write
        #[arg(short, long, default_value = "vault.bin")]
        output: PathBuf,

        #[arg(short, long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Use ChaCha20-Poly1305 instead of AES-256-GCM
        #[arg(long)]
        chacha: bool,

        /// LZ4-compress the keys before encryption
        #[arg(long)]
        compress: bool,
    },
    /// List the groups and fields of a vault file without their values
    Inspect {
        #[arg(default_value = "vault.bin")]
        path: PathBuf,

        #[arg(short, long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}
