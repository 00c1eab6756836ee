//! Document model: boards, their persisted fields, and the JSON document format.
//!
//! This module defines the data that makes up a storyboard (`Board`,
//! `BoardId`) and the on-disk shape of a saved file (`Document`). Drawing
//! snapshots and note data are opaque JSON blobs owned by the external canvas
//! and editor; this layer only round-trips them.
//!
//! Parsing is all-or-nothing: `Document::parse` either returns a fully
//! normalized document or an error, and never touches live state. The
//! runtime owner of boards is [`crate::store::BoardStore`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_DURATION_SECS};

/// Opaque unique identifier for a board.
///
/// New boards get a v4 UUID; ids read from files are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for BoardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One frame of the storyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique identifier for this board.
    pub id: BoardId,
    /// Drawing snapshot owned by the canvas. `Null` means blank.
    #[serde(default)]
    pub canvas_data: serde_json::Value,
    /// Note blocks owned by the text editor. `Null` means empty.
    #[serde(default)]
    pub script_data: serde_json::Value,
    /// Derived thumbnail (data URL). May lag behind `canvas_data`.
    #[serde(default)]
    pub preview_url: Option<String>,
    /// CSS color string painted behind the drawing.
    #[serde(default = "default_background")]
    pub background_color: String,
    /// How long the board stays on screen during playback, in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

fn default_duration() -> f64 {
    DEFAULT_DURATION_SECS
}

impl Board {
    /// A blank board with a fresh id and default presentation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_presentation(DEFAULT_BACKGROUND, DEFAULT_DURATION_SECS)
    }

    /// A blank board with a fresh id, the given background, and duration.
    #[must_use]
    pub fn with_presentation(background_color: &str, duration: f64) -> Self {
        Self {
            id: BoardId::generate(),
            canvas_data: serde_json::Value::Null,
            script_data: serde_json::Value::Null,
            preview_url: None,
            background_color: background_color.to_owned(),
            duration,
        }
    }

    /// Bring a board read from outside into range: unusable durations fall
    /// back to the default, the rest are floored at `min_duration`.
    pub(crate) fn normalize(&mut self, min_duration: f64) {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            self.duration = DEFAULT_DURATION_SECS;
        }
        self.duration = self.duration.max(min_duration);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("document has no `boards` field")]
    MissingBoards,
    #[error("document `boards` field is not an array")]
    BoardsNotArray,
    #[error("board #{index} is malformed: {source}")]
    InvalidBoard {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("board id `{0}` appears more than once")]
    DuplicateId(BoardId),
    #[error("document could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The persisted document: `{ boards: Board[], currentBoardId: string }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub boards: Vec<Board>,
    pub current_board_id: Option<BoardId>,
}

impl Document {
    /// Parse and normalize a saved document.
    ///
    /// `boards` must be present and an array. A missing or dangling
    /// `currentBoardId` falls back to the first board. An empty board list
    /// is seeded with one default board so the result is always usable.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] for malformed JSON, a missing or
    /// non-array `boards` field, a board that fails to deserialize, or a
    /// repeated board id.
    pub fn parse(raw: &str, min_duration: f64) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(DocumentError::Json)?;
        let items = value
            .get("boards")
            .ok_or(DocumentError::MissingBoards)?
            .as_array()
            .ok_or(DocumentError::BoardsNotArray)?;

        let mut boards = Vec::with_capacity(items.len().max(1));
        let mut seen = HashSet::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut board: Board =
                serde_json::from_value(item.clone()).map_err(|source| DocumentError::InvalidBoard { index, source })?;
            if !seen.insert(board.id.clone()) {
                return Err(DocumentError::DuplicateId(board.id));
            }
            board.normalize(min_duration);
            boards.push(board);
        }
        if boards.is_empty() {
            boards.push(Board::new());
        }

        let current_board_id = value
            .get("currentBoardId")
            .and_then(serde_json::Value::as_str)
            .map(BoardId::from)
            .filter(|id| boards.iter().any(|b| &b.id == id))
            .or_else(|| boards.first().map(|b| b.id.clone()));

        Ok(Self { boards, current_board_id })
    }

    /// Serialize to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] if a board's opaque data cannot
    /// be encoded.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)
    }
}
