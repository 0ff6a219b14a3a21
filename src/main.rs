use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use public_voting::cli::Cli;
use public_voting::config::StoreLocation;
use public_voting::{
    BlobStore, FileBlobStore, MemoryBlobStore, ServiceResult, VotingApp, commands,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ServiceResult<()> {
    let location = StoreLocation::resolve(&cli.global)?;
    tracing::debug!(?location, "opening voting store");
    match location {
        StoreLocation::Memory => session(VotingApp::load(MemoryBlobStore::new()), cli),
        StoreLocation::Directory(dir) => session(VotingApp::load(FileBlobStore::new(dir)), cli),
    }
}

fn session<B: BlobStore>(mut app: VotingApp<B>, cli: Cli) -> ServiceResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&mut app, cli.global.user.as_deref(), cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}
