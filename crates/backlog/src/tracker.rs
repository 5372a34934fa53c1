//! The `IssueTracker` port.
//!
//! Reconciliation, pruning and linking depend only on this trait. The `github`
//! crate supplies the production implementation over the REST API; tests supply
//! an in-memory one. Implementations perform exactly one remote call per method
//! and never retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{IssueId, IssueNumber, RemoteIssue};

/// Failure of a single tracker call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The tracker answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response text, kept for the failure log line.
        body: String,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl TrackerError {
    /// HTTP status code, when the tracker responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The full set of mutable fields written on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub number: IssueNumber,
    pub html_url: Option<String>,
}

/// Result of a sub-issue link call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new relationship was created.
    Linked,
    /// The tracker reported that the relationship already exists.
    AlreadyLinked,
}

/// Narrow capability over the remote issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns one page of issues in every state. An empty page marks the end.
    ///
    /// Pages are numbered from 1.
    async fn list_issues(&self, page: u32, per_page: u32) -> Result<Vec<RemoteIssue>, TrackerError>;

    /// Creates an issue.
    async fn create_issue(&self, draft: &IssueDraft) -> Result<CreatedIssue, TrackerError>;

    /// Overwrites title, body and labels of an existing issue.
    async fn update_issue(&self, number: IssueNumber, draft: &IssueDraft) -> Result<(), TrackerError>;

    /// Transitions an issue to the closed state.
    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError>;

    /// Attaches `child` as a sub-issue of the issue numbered `parent`.
    async fn add_sub_issue(&self, parent: IssueNumber, child: IssueId) -> Result<LinkOutcome, TrackerError>;
}
