use anyhow::Result;
use carteira::cli::{runner, Cli};
use carteira::{config, dispatcher};
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so table/JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = config::load_config(cli.config.as_deref())?;
    let command = runner::to_internal_command(&cli.command, &config)?;
    dispatcher::dispatch_command(command, cli.json)
}
