//! Run driver: sequences reconcile, prune and link for the selected scope.

use backlog::{DirectoryScope, IssueDirectory, IssueTracker, ItemKind, SyncError, SyncSettings, WorkItem};
use tracing::{info, info_span, Instrument};

use crate::{link_sub_issues, prune_kind, Reconciler, SyncReport};

/// Which part of the hierarchy a run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    /// A single kind. Sub-issue links are left alone.
    Kind(ItemKind),
    /// Every kind, parents first, followed by sub-issue linking.
    All,
}

impl SyncScope {
    /// The kinds this scope reconciles, in processing order.
    pub fn kinds(self) -> Vec<ItemKind> {
        match self {
            Self::Kind(kind) => vec![kind],
            Self::All => ItemKind::ALL.to_vec(),
        }
    }
}

impl std::fmt::Display for SyncScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Executes one sync run against a tracker.
pub struct SyncRunner<'a> {
    tracker: &'a dyn IssueTracker,
    settings: &'a SyncSettings,
}

impl<'a> SyncRunner<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, settings: &'a SyncSettings) -> Self {
        Self { tracker, settings }
    }

    /// Reconciles `items` for `scope`, closing orphans when `prune` is set.
    ///
    /// Only a failed issue listing aborts the run; every other remote failure is
    /// counted in the returned report.
    pub async fn run(&self, items: &[WorkItem], scope: SyncScope, prune: bool) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let reconciler = Reconciler::new(self.tracker, self.settings);

        for kind in scope.kinds() {
            let span = info_span!("sync_kind", %kind, prune);
            async {
                let directory = IssueDirectory::fetch(
                    self.tracker,
                    DirectoryScope::Kind(kind),
                    self.settings.grammar(),
                    self.settings.page_size(),
                )
                .await?;

                let existing: Vec<&str> = directory.ids().collect();
                info!(count = existing.len(), ids = %existing.join(", "), "Existing {kind} issues");

                reconciler.reconcile_kind(kind, items, &directory, &mut report).await;
                if prune {
                    prune_kind(self.tracker, kind, items, &directory, &mut report).await;
                }
                Ok::<(), SyncError>(())
            }
            .instrument(span)
            .await?;
        }

        if scope == SyncScope::All {
            link_sub_issues(self.tracker, self.settings, items, &mut report)
                .instrument(info_span!("link_sub_issues"))
                .await?;
        }

        report.log_summary();
        Ok(report)
    }
}
