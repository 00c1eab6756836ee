mod commands;
mod config;
mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{CliError, Edit};
use crate::config::HostConfig;
use crate::services::fileio::{self, Settings};

#[derive(Parser, Debug)]
#[command(name = "quickboard", about = "Create, edit, and play storyboard timelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new storyboard document.
    New {
        /// Defaults to `untitled.json` in the last-used directory.
        path: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        boards: usize,
        #[arg(long, default_value_t = timeline::consts::DEFAULT_DURATION_SECS)]
        duration: f64,
    },
    /// List boards with their start times and durations.
    Info { path: PathBuf },
    /// Play the storyboard in real time; Ctrl-C pauses and exits.
    Play {
        path: PathBuf,
        #[arg(long = "loop")]
        looped: bool,
        /// Start position in seconds.
        #[arg(long)]
        from: Option<f64>,
    },
    /// Append a board after the last one.
    Add { path: PathBuf },
    /// Delete a board by id or 0-based index.
    Delete { path: PathBuf, board: String },
    /// Move the board at one index to another.
    Reorder { path: PathBuf, from: usize, to: usize },
    /// Set a board's duration in seconds.
    Duration { path: PathBuf, board: String, seconds: f64 },
    /// Set a board's background color.
    Color { path: PathBuf, board: String, color: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = HostConfig::from_env()?;
    let mut settings = Settings::load(&config.settings_path).await;

    let result = run(cli.command, &config, &mut settings).await;
    settings.store(&config.settings_path).await;
    result
}

async fn run(command: Command, config: &HostConfig, settings: &mut Settings) -> Result<(), CliError> {
    match command {
        Command::New { path, boards, duration } => {
            let path = path.unwrap_or_else(|| fileio::default_save_path(settings, &config.documents_dir));
            commands::create(config, settings, &path, boards, duration).await?;
            println!("{}", path.display());
        }
        Command::Info { path } => {
            println!("{}", commands::describe(config, settings, &path).await?);
        }
        Command::Play { path, looped, from } => {
            let report = commands::play(config, settings, &path, looped, from).await?;
            let state = if report.finished { "finished" } else { "paused" };
            println!("{state} at {:.2}s after {} board(s)", report.position, report.shown.len());
        }
        Command::Add { path } => commands::apply_edit(config, settings, &path, Edit::Add).await?,
        Command::Delete { path, board } => commands::apply_edit(config, settings, &path, Edit::Delete { board }).await?,
        Command::Reorder { path, from, to } => {
            commands::apply_edit(config, settings, &path, Edit::Reorder { from, to }).await?;
        }
        Command::Duration { path, board, seconds } => {
            commands::apply_edit(config, settings, &path, Edit::Duration { board, seconds }).await?;
        }
        Command::Color { path, board, color } => {
            commands::apply_edit(config, settings, &path, Edit::Color { board, color }).await?;
        }
    }
    Ok(())
}
