//! Core domain for backlog-sync.
//!
//! This crate contains the work-item model, the rules that decide what a
//! managed GitHub issue should look like, and the [`IssueTracker`] port through
//! which the remote tracker is read and written. Infrastructure crates
//! implement the port; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** Apart from reading the configuration
//! file this crate has no I/O. It defines *what* is needed; infrastructure
//! crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ItemId`, `IssueNumber`, `IssueId`) |
//! | [`types`] | `ItemKind`, `WorkItem`, `RemoteIssue` |
//! | [`grammar`] | Kind-specific identifier patterns and segment extraction |
//! | [`hierarchy`] | Configuration document and the flattener |
//! | [`labels`] | Label policy |
//! | [`render`] | Title/body rendering and update detection |
//! | [`directory`] | Existing issues keyed by identifier |
//! | [`tracker`] | The `IssueTracker` port and its error type |
//! | [`settings`] | Run settings |
//! | [`errors`] | Run-aborting error type |

pub mod directory;
pub mod errors;
pub mod grammar;
pub mod hierarchy;
pub mod identifiers;
pub mod labels;
pub mod render;
pub mod settings;
pub mod tracker;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use directory::{extract_identifier, DirectoryScope, DuplicateIssue, IssueDirectory};
pub use errors::SyncError;
pub use grammar::IdentifierGrammar;
pub use hierarchy::{load_items, BacklogDocument, ItemNode};
pub use identifiers::{IssueId, IssueNumber, ItemId};
pub use labels::{labels_equal, LabelPolicy};
pub use render::{desired_body, desired_title, diff, IssueChanges, DESCRIPTION_PLACEHOLDER};
pub use settings::{
    SyncSettings, DEFAULT_CONFIG_PATH, DEFAULT_ID_PREFIX, DEFAULT_PAGE_SIZE, DEFAULT_PRIORITY_LABELS,
};
pub use tracker::{CreatedIssue, IssueDraft, IssueTracker, LinkOutcome, TrackerError};
pub use types::{IssueState, ItemKind, RemoteIssue, WorkItem};
