//! Shared value types for the backlog domain.
//!
//! [`WorkItem`] is the only domain entity; it lives for a single run and is
//! rebuilt from configuration every time. [`RemoteIssue`] is the snapshot of a
//! GitHub issue as returned by the [`crate::IssueTracker`] port. It is owned by
//! the remote service and only ever changed through that port.

use serde::{Deserialize, Serialize};

use crate::{IssueId, IssueNumber, ItemId};

// ---------------------------------------------------------------------------
// Hierarchy levels
// ---------------------------------------------------------------------------

/// One of the four fixed hierarchy levels, strictly nested in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Top level; has no parent.
    Epic,
    /// Child of an epic.
    Story,
    /// Child of a story.
    Task,
    /// Child of a task; has no children.
    Subtask,
}

impl ItemKind {
    /// All kinds, parents first. This is also the order a full sync processes them.
    pub const ALL: [ItemKind; 4] = [Self::Epic, Self::Story, Self::Task, Self::Subtask];

    /// The base label every issue of this kind carries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Epic => "Epics",
            Self::Story => "Stories",
            Self::Task => "Tasks",
            Self::Subtask => "Sub-tasks",
        }
    }

    /// Human-readable kind name used in rendered issue bodies.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Epic => "Epic",
            Self::Story => "Story",
            Self::Task => "Task",
            Self::Subtask => "Sub-task",
        }
    }

    /// Lower-case name, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Task => "task",
            Self::Subtask => "subtask",
        }
    }

    /// The kind directly above this one, if any.
    pub fn parent(self) -> Option<ItemKind> {
        match self {
            Self::Epic => None,
            Self::Story => Some(Self::Epic),
            Self::Task => Some(Self::Story),
            Self::Subtask => Some(Self::Task),
        }
    }

    /// The kind directly below this one, if any.
    pub fn child(self) -> Option<ItemKind> {
        match self {
            Self::Epic => Some(Self::Story),
            Self::Story => Some(Self::Task),
            Self::Task => Some(Self::Subtask),
            Self::Subtask => None,
        }
    }

    /// The configuration key that holds this kind's children.
    pub fn children_key(self) -> Option<&'static str> {
        self.child().map(|child| match child {
            Self::Story => "stories",
            Self::Task => "tasks",
            _ => "subtasks",
        })
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Work items
// ---------------------------------------------------------------------------

/// A flattened, fully resolved work item.
///
/// `phase` and `priority` already carry inherited values. Which of the parent
/// fields are populated is fixed by `kind`: an epic has none, a story has
/// `epic_id`, a task adds `story_id`, a subtask adds `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Configured identifier.
    pub id: ItemId,
    /// Hierarchy level.
    pub kind: ItemKind,
    /// Effective phase (own or inherited).
    pub phase: String,
    /// Effective priority (own or inherited).
    pub priority: String,
    /// Short title, without the identifier prefix.
    pub title: String,
    /// Goal/description text; empty when not configured.
    pub description: String,
    /// Owning epic, for stories and below.
    pub epic_id: Option<ItemId>,
    /// Owning story, for tasks and below.
    pub story_id: Option<ItemId>,
    /// Owning task, for subtasks.
    pub task_id: Option<ItemId>,
}

impl WorkItem {
    /// The identifier of the item this one should be linked under as a sub-issue.
    pub fn parent_id(&self) -> Option<&ItemId> {
        match self.kind {
            ItemKind::Epic => None,
            ItemKind::Story => self.epic_id.as_ref(),
            ItemKind::Task => self.story_id.as_ref(),
            ItemKind::Subtask => self.task_id.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote issues
// ---------------------------------------------------------------------------

/// Open/closed state of a remote issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

/// A snapshot of one entry of the remote issue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIssue {
    /// Global numeric id (needed by the sub-issue API).
    pub id: IssueId,
    /// Repository-scoped number.
    pub number: IssueNumber,
    pub title: String,
    /// Issue body; an absent body is represented as an empty string.
    pub body: String,
    pub state: IssueState,
    /// Label names in the order the tracker returned them.
    pub labels: Vec<String>,
    /// GitHub lists pull requests through the issues endpoint; these are skipped.
    pub is_pull_request: bool,
    /// Browser URL, when the tracker reports one.
    pub html_url: Option<String>,
}
