use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use git_semver::cli::{self, Cli, Command, Workflow};
use git_semver::config;
use git_semver::git::Git2Repository;
use git_semver::ui;

/// Console logging on stderr, controlled by RUST_LOG (default: warn, debug with --verbose)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

fn run(args: Cli) -> Result<()> {
    // the built-in defaults must print even when the config file is broken
    if let Command::Config(cli::ConfigCommand::Default) = args.command {
        ui::display_output(&cli::config_default()?);
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    if let Command::Config(cli::ConfigCommand::Show) = args.command {
        ui::display_output(&cli::config_show(&config)?);
        return Ok(());
    }

    let repo = Git2Repository::open(".").context("Git repository error")?;
    let workflow = Workflow::new(config, repo).context("Invalid configuration")?;
    if let Some(output) = workflow.execute(&args.command)? {
        ui::display_output(&output);
    }
    Ok(())
}

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
