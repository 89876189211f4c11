use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wg_cli::commands::{clusters, show, watch};
use wg_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr, rendered output to stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match &cli.command {
        Some(Commands::Show(args)) => show::run(&mut writer, args, &config)?,
        Some(Commands::Watch(args)) => watch::run(&mut writer, args, &config)?,
        Some(Commands::Clusters(args)) => clusters::run(&mut writer, args, &config)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }
    writer.flush()?;

    Ok(())
}
