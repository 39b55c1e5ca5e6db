use anyhow::Context;
use clap::Parser;
use crwa::domain::config::{AppConfig, LoggingConfig};
use crwa::kernel::config::{ambient_environment, load_config};
use crwa_logger::{ConsoleTarget, Logger, LoggerError, parse_level, parse_rotation};
use crwa_server::App;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "crwa-server", version, about = "CRWA Public Flagging service")]
struct Cli {
    /// Configuration file, instead of `config/<environment>.toml`.
    #[arg(short, long, env = "CRWA_CONFIG")]
    config: Option<PathBuf>,

    /// Build the application, print a summary as JSON and exit without serving.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = ambient_environment().context("Critical: CRWA_ENV is invalid")?;
    let cfg = load_config(environment, cli.config.as_deref())
        .context("Critical: Configuration is malformed")?;

    // Keep stdout clean for the summary in check mode.
    let target = if cli.check { ConsoleTarget::Stderr } else { ConsoleTarget::Stdout };
    let _log = init_logger(&cfg.logging, target)?;

    let app = App::builder().config(cfg).build().context("Critical: Application startup failed")?;

    if cli.check {
        print_summary(app.config(), app.blueprints(), app.is_degraded())?;
        return Ok(());
    }

    app.serve().await
}

fn init_logger(cfg: &LoggingConfig, target: ConsoleTarget) -> Result<Logger, LoggerError> {
    let builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&cfg.level)?)
        .console(cfg.console)
        .json(cfg.json)
        .target(target);

    let builder = match &cfg.env_filter {
        Some(filter) => builder.env_filter(filter.clone()),
        None => builder,
    };

    match &cfg.directory {
        Some(directory) => builder
            .path(directory)
            .rotation(parse_rotation(&cfg.rotation)?)
            .max_files(cfg.max_files)
            .init(),
        None => builder.init(),
    }
}

#[allow(clippy::print_stdout)]
fn print_summary(cfg: &AppConfig, blueprints: &[String], degraded: bool) -> anyhow::Result<()> {
    let summary = serde_json::json!({
        "environment": cfg.environment.as_str(),
        "blueprints": blueprints,
        "degraded": degraded,
        "docs": cfg.docs.enabled.then_some(&cfg.docs.ui_path),
    });
    println!("{}", serde_json::to_string(&summary).context("Encoding summary")?);
    Ok(())
}
