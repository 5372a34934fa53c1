//! Issue content rendering and update detection.
//!
//! Rendering is a pure function of the work item, so comparing rendered text
//! with the remote issue by string equality is enough to decide whether an
//! update is needed.

use std::path::Path;

use crate::{labels_equal, IssueDraft, RemoteIssue, WorkItem};

/// Placeholder used when an item has no description.
pub const DESCRIPTION_PLACEHOLDER: &str = "TODO: add a clear goal / description for this item.";

/// `[PALI-E1] Ingestion`
pub fn desired_title(item: &WorkItem) -> String {
    format!("[{}] {}", item.id, item.title)
}

/// Renders the managed issue body.
///
/// Parent lines are emitted only for the parents the item actually has. Lines
/// in the metadata block end in two spaces so Markdown renders them as hard
/// line breaks.
pub fn desired_body(item: &WorkItem, source: &Path) -> String {
    let description = if item.description.is_empty() {
        DESCRIPTION_PLACEHOLDER
    } else {
        item.description.as_str()
    };

    let mut lines = vec![
        format!("# {} – {}", item.id, item.title),
        String::new(),
        format!("**ID:** {}  ", item.id),
        format!("**Kind:** {}  ", item.kind.display_name()),
        format!("**Phase:** {}  ", item.phase),
        format!("**Priority:** {}  ", item.priority),
    ];

    let parents = [
        ("Epic", &item.epic_id),
        ("Story", &item.story_id),
        ("Task", &item.task_id),
    ];
    for (name, id) in parents {
        if let Some(id) = id {
            lines.push(format!("**{name}:** {id}  "));
        }
    }

    lines.extend([
        String::new(),
        "**Goal / Description**  ".to_string(),
        description.to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
        format!("This issue is fully managed by `{}`.", source.display()),
        "Edit YAML, then rerun the sync script.".to_string(),
    ]);

    lines.join("\n")
}

/// Which managed fields of a remote issue differ from the desired content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueChanges {
    pub title: bool,
    pub body: bool,
    pub labels: bool,
}

impl IssueChanges {
    /// `true` when nothing needs to be written.
    pub fn is_empty(self) -> bool {
        !(self.title || self.body || self.labels)
    }
}

/// Compares a remote issue with the desired content. Labels compare as sets.
pub fn diff(current: &RemoteIssue, desired: &IssueDraft) -> IssueChanges {
    IssueChanges {
        title: current.title != desired.title,
        body: current.body != desired.body,
        labels: !labels_equal(&current.labels, &desired.labels),
    }
}
