//! Closes issues whose identifier has been removed from the configuration.

use std::collections::HashSet;

use backlog::{IssueDirectory, IssueTracker, ItemKind, WorkItem};
use tracing::{error, info};

use crate::SyncReport;

/// Closes every issue in `directory` whose identifier is not a configured item
/// of `kind`.
///
/// `directory` must have been built for `kind`; issues of other kinds are not
/// considered. Failures are logged per issue and do not stop the pass.
pub async fn prune_kind(
    tracker: &dyn IssueTracker,
    kind: ItemKind,
    items: &[WorkItem],
    directory: &IssueDirectory,
    report: &mut SyncReport,
) {
    let valid: HashSet<&str> = items
        .iter()
        .filter(|i| i.kind == kind)
        .map(|i| i.id.as_str())
        .collect();

    for (id, issue) in directory.iter().filter(|(id, _)| !valid.contains(id)) {
        info!(%kind, id, number = %issue.number, "Closing orphan issue");
        match tracker.close_issue(issue.number).await {
            Ok(()) => report.closed += 1,
            Err(e) => {
                error!(id, number = %issue.number, status = ?e.status(), error = %e, "Close failed");
                report.failed += 1;
            }
        }
    }
}
