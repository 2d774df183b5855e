use anyhow::{Context, Result};
use clap::Parser;
use portcheck::cli::Cli;
use portcheck::config::{AppSettings, Paths};
use portcheck::output;
use portcheck::scanner::Dispatcher;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let options = cli.resolve(&settings).context("invalid settings")?;

    debug!(?options, "resolved scan options");

    options
        .execute(&Dispatcher::default())
        .await
        .context("scan failed")?;

    Ok(())
}

/// Log to stderr so stdout carries only scan output. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "portcheck=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(cli: &Cli) -> Result<AppSettings> {
    if let Some(path) = &cli.config {
        return AppSettings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }

    match Paths::discover() {
        Ok(paths) => AppSettings::load(&paths).context("failed to load settings"),
        Err(e) => {
            output::print_warning(&format!("{}; using built-in defaults", e));
            Ok(AppSettings::default())
        }
    }
}
