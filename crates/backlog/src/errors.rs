//! Top-level error type for a sync run.
//!
//! [`SyncError`] covers conditions that abort the whole run: a broken
//! configuration file or an issue listing that cannot be read. Failures of a
//! single create/update/close/link call are *not* represented here; they are
//! [`crate::TrackerError`] values that the orchestration layer logs and skips.

use std::path::PathBuf;

use thiserror::Error;

use crate::{ItemKind, TrackerError};

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configuration file does not exist.
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not a valid backlog document.
    #[error("Failed to parse config: {message}")]
    ConfigParse {
        /// Parser diagnostic, including location where available.
        message: String,
    },

    /// A required field is absent or blank.
    ///
    /// `context` names the nearest identifier, or the position in the document
    /// when the identifier itself is missing.
    #[error("Missing required field '{field}' on {kind} {context}")]
    MissingField {
        kind: ItemKind,
        field: &'static str,
        context: String,
    },

    /// An identifier does not match the pattern for its level.
    #[error("Invalid {kind} identifier '{id}': expected {expected}")]
    InvalidIdentifier {
        kind: ItemKind,
        id: String,
        /// Human-readable description of the expected pattern.
        expected: String,
    },

    /// A child identifier does not extend its parent's identifier.
    #[error("{kind} '{id}' is declared under '{parent}' but its identifier does not extend it")]
    ParentMismatch {
        kind: ItemKind,
        id: String,
        parent: String,
    },

    /// Two items share an identifier.
    #[error("Duplicate identifier '{id}' in config")]
    DuplicateIdentifier { id: String },

    /// A node carries a children key that belongs to another level.
    #[error("{kind} '{id}' may not contain '{key}'")]
    UnexpectedChildren {
        kind: ItemKind,
        id: String,
        key: &'static str,
    },

    /// A run setting (prefix, priority labels, page size) is unusable.
    #[error("Invalid setting: {message}")]
    InvalidSetting { message: String },

    /// The remote issue listing could not be read; reconciliation without it
    /// would create duplicates.
    #[error("Failed to list issues: {0}")]
    Listing(#[source] TrackerError),
}
