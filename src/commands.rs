//! CLI command bodies. Each one loads a document, drives the engine through
//! its public commands, and saves or reports the result.
//!
//! Edits go through the same `EngineCore` board commands an interactive
//! host would call, so refusals (deleting the last board, a non-positive
//! duration) surface here as [`CliError::Refused`].

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::path::Path;

use timeline::doc::BoardId;
use timeline::layout::format_time;
use timeline::store::BoardStore;
use timeline::transport::TransportError;
use tracing::info;

use crate::config::{ConfigError, HostConfig};
use crate::services::fileio::{self, FileIoError, Settings};
use crate::services::player::{self, HostEngine, PlaybackReport};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    File(#[from] FileIoError),
    #[error("playback failed: {0}")]
    Transport(#[from] TransportError),
    #[error("no board matches `{0}` (use an id or a 0-based index)")]
    UnknownBoard(String),
    #[error("refused: {0}")]
    Refused(&'static str),
}

/// A single edit applied by the `add`/`delete`/`reorder`/`duration`/`color`
/// subcommands.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Add,
    Delete { board: String },
    Reorder { from: usize, to: usize },
    Duration { board: String, seconds: f64 },
    Color { board: String, color: String },
}

/// Create a document with `boards` boards of `duration` seconds each.
///
/// # Errors
///
/// Returns [`CliError`] for a refused duration or a failed save.
pub async fn create(
    config: &HostConfig,
    settings: &mut Settings,
    path: &Path,
    boards: usize,
    duration: f64,
) -> Result<(), CliError> {
    let mut engine = player::new_engine(config);
    let first = engine.store.current_board_id().clone();
    if !engine.set_duration(&first, duration) {
        return Err(CliError::Refused("board duration must be a positive number"));
    }
    for _ in 1..boards.max(1) {
        engine.add_board();
    }
    engine.select_board(&first);
    fileio::request_save(path, &engine.store, settings).await?;
    Ok(())
}

/// One line per board, then the running time.
///
/// # Errors
///
/// Returns [`CliError::File`] if the document cannot be loaded.
pub async fn describe(config: &HostConfig, settings: &mut Settings, path: &Path) -> Result<String, CliError> {
    let engine = open(config, settings, path).await?;
    Ok(summarize(&engine.store))
}

/// Play the document in real time until it ends or Ctrl-C.
///
/// # Errors
///
/// Returns [`CliError`] if the document cannot be loaded or the clock
/// refuses to start.
pub async fn play(
    config: &HostConfig,
    settings: &mut Settings,
    path: &Path,
    looped: bool,
    from: Option<f64>,
) -> Result<PlaybackReport, CliError> {
    let mut engine = open(config, settings, path).await?;
    engine.set_loop(looped);
    if let Some(from) = from {
        engine.seek(from);
    }
    let report = player::run_playback(&mut engine, config.frame_interval(), player::ctrl_c()).await?;
    engine.shutdown();
    Ok(report)
}

/// Apply `edit` and save the document back to `path`.
///
/// # Errors
///
/// Returns [`CliError`] for an unknown board, a refused edit, or a failed
/// load or save. The file is not rewritten when the edit is refused.
pub async fn apply_edit(config: &HostConfig, settings: &mut Settings, path: &Path, edit: Edit) -> Result<(), CliError> {
    let mut engine = open(config, settings, path).await?;
    match &edit {
        Edit::Add => {
            let id = engine.add_board();
            info!(board_id = %id, "board added");
        }
        Edit::Delete { board } => {
            let id = resolve_board(&engine.store, board)?;
            if !engine.delete_board(&id) {
                return Err(CliError::Refused("a storyboard keeps at least one board"));
            }
        }
        Edit::Reorder { from, to } => {
            if !engine.reorder_board(*from, *to) {
                return Err(CliError::Refused("board index out of range"));
            }
        }
        Edit::Duration { board, seconds } => {
            let id = resolve_board(&engine.store, board)?;
            if !engine.set_duration(&id, *seconds) {
                return Err(CliError::Refused("board duration must be a positive number"));
            }
        }
        Edit::Color { board, color } => {
            let id = resolve_board(&engine.store, board)?;
            engine.set_background_color(&id, color);
        }
    }
    fileio::request_save(path, &engine.store, settings).await?;
    Ok(())
}

async fn open(config: &HostConfig, settings: &mut Settings, path: &Path) -> Result<HostEngine, CliError> {
    let mut engine = player::new_engine(config);
    fileio::request_load(path, &mut engine, settings).await?;
    Ok(engine)
}

/// Find a board by exact id, falling back to a 0-based index.
fn resolve_board(store: &BoardStore, key: &str) -> Result<BoardId, CliError> {
    let by_id = BoardId::from(key);
    if store.board(&by_id).is_some() {
        return Ok(by_id);
    }
    key.parse::<usize>()
        .ok()
        .and_then(|index| store.boards().get(index))
        .map(|board| board.id.clone())
        .ok_or_else(|| CliError::UnknownBoard(key.to_owned()))
}

fn summarize(store: &BoardStore) -> String {
    let mut lines = Vec::with_capacity(store.len() + 1);
    let mut start = 0.0;
    for (index, board) in store.boards().iter().enumerate() {
        let marker = if board.id == *store.current_board_id() { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {index:>3}  {}  {:>7.2}s  {}  {}",
            format_time(start, true),
            board.duration,
            board.background_color,
            board.id
        ));
        start += board.duration;
    }
    lines.push(format!("{} boards, {}", store.len(), format_time(store.total_duration(), true)));
    lines.join("\n")
}
