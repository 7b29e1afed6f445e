mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use ragcut_core::Config;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    ragcut_core::config::load_dotenv();

    // Logs go to stderr so exports on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(args.command, &config, &mut out)
}
