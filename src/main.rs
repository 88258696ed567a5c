mod config;
mod demo;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use livelog_reader::{SessionTiming, TailReader, run_session};
use livelog_term::{StopListener, TerminalSink};

use crate::config::{Args, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Diagnostics go to stderr so they never mix with rendered frames
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::resolve(&args)?;

    if args.demo {
        let stop = StopListener::spawn();
        return demo::run(&settings, stop.token()).await;
    }

    // Configuration errors surface here, before anything is watched
    let config = settings.reader_config()?;
    let mut reader = TailReader::new(config, TerminalSink::stdout())?;

    let stop = StopListener::spawn();
    run_session(&mut reader, SessionTiming::default(), stop.token()).await?;
    Ok(())
}
