// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build the real HTTP client and
//   command runner, and hand them to `paste::run`.
// - Returns `anyhow::Result` so any failure ends up on stderr with a
//   non-zero exit status.

use anyhow::Context;
use clap::Parser;
use spaste::{cli::Cli, paste, ReqwestClient, SystemRunner};
use std::io;

fn main() -> anyhow::Result<()> {
    // Warnings and errors only unless RUST_LOG asks for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let config = Cli::parse().into_config();
    log::debug!("creating pastes at {}", config.endpoint);

    let client = ReqwestClient::new(config.timeout).context("setting up HTTP client")?;
    let stdout = io::stdout();
    paste::run(&config, &SystemRunner, &client, &mut io::stdin().lock(), &mut stdout.lock())?;
    Ok(())
}
