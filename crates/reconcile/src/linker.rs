//! Wires stories, tasks and subtasks under their parent issues.

use backlog::{DirectoryScope, IssueDirectory, IssueTracker, LinkOutcome, SyncError, SyncSettings, WorkItem};
use tracing::{debug, error, info, warn};

use crate::SyncReport;

/// Attaches every non-epic item's issue as a sub-issue of its parent's issue.
///
/// Re-lists all issues first, because the reconcile pass may just have created
/// some of them. Missing child or parent issues are skipped with a warning.
pub async fn link_sub_issues(
    tracker: &dyn IssueTracker,
    settings: &SyncSettings,
    items: &[WorkItem],
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let directory = IssueDirectory::fetch(
        tracker,
        DirectoryScope::AllKinds,
        settings.grammar(),
        settings.page_size(),
    )
    .await?;

    for item in items {
        let Some(parent_id) = item.parent_id() else {
            continue;
        };
        let Some(child) = directory.get(item.id.as_str()) else {
            warn!(id = %item.id, "No issue found for item; not linking");
            report.link_skipped += 1;
            continue;
        };
        let Some(parent) = directory.get(parent_id.as_str()) else {
            warn!(id = %item.id, parent = %parent_id, "No parent issue found; not linking");
            report.link_skipped += 1;
            continue;
        };

        match tracker.add_sub_issue(parent.number, child.id).await {
            Ok(LinkOutcome::Linked) => {
                info!(id = %item.id, parent = %parent_id, parent_number = %parent.number, child_id = %child.id, "Linked sub-issue");
                report.linked += 1;
            }
            Ok(LinkOutcome::AlreadyLinked) => {
                debug!(id = %item.id, parent_number = %parent.number, "Relationship already exists");
                report.already_linked += 1;
            }
            Err(e) => {
                error!(
                    id = %item.id,
                    parent_number = %parent.number,
                    child_id = %child.id,
                    status = ?e.status(),
                    error = %e,
                    "Link failed"
                );
                report.failed += 1;
            }
        }
    }
    Ok(())
}
