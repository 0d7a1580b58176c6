// ABOUTME: Entry point for the redeploy CLI application.
// ABOUTME: Parses arguments, sets up logging and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use redeploy::config::Config;
use redeploy::error::Result;
use redeploy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // -v wins over RUST_LOG
    let filter = if cli.global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.global.json {
        OutputMode::Json
    } else if cli.global.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, Output::new(mode)).await {
        tracing::debug!(kind = ?e.kind(), "command failed");
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = Config::resolve(cli.global.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Config {
            host,
            port,
            username,
            password,
        } => {
            let args = commands::HostArgs {
                host,
                port,
                username,
                password,
            };
            commands::configure(args, &config, output).await
        }
        Commands::Build { url, services, tag } => {
            commands::build(&url, services, tag.as_deref(), &config, output).await
        }
        Commands::Deploy {
            url,
            services,
            tag,
            skip_equal,
        } => {
            let args = commands::DeployArgs {
                url,
                services,
                tag,
                skip_equal,
            };
            commands::deploy(args, &config, output).await
        }
        Commands::Status { url } => commands::status(&url, &config, output).await,
    }
}
