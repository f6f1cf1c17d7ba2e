use std::{io::Write, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{RestTripService, TripService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod terminal;

use crate::{
    app::App,
    commands::{parse_command, CommandError, HostCommand},
};

#[derive(Parser, Debug)]
#[command(name = "itinerary", about = "Plan a trip from the terminal")]
struct Args {
    /// Base URL of the trip service.
    #[arg(long)]
    server_url: Option<String>,
    /// Value sent in the Authorization header.
    #[arg(long)]
    authorization: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config);
    settings.apply_args(args.server_url, args.authorization);
    info!(server_url = %settings.server_url, "starting itinerary");

    let service: Rc<dyn TripService> = Rc::new(
        RestTripService::with_timeout(
            &settings.server_url,
            settings.authorization.clone(),
            settings.request_timeout(),
        )
        .context("invalid trip service settings")?,
    );
    let app = App::start(service, &settings).await;

    let mut stdout = std::io::stdout();
    app.surface.draw(&mut stdout)?;
    writeln!(stdout, "type `help` for commands")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(HostCommand::Quit) => break,
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };
        if let Some(message) = app.handle(command).await {
            writeln!(stdout, "{message}")?;
        }
        app.surface.draw(&mut stdout)?;
        stdout.flush()?;
    }

    info!(points = app.points.len(), "bye");
    Ok(())
}
