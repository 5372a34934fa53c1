//! Per-run outcome counters.

use tracing::{info, warn};

/// What a run did, by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub closed: usize,
    pub linked: usize,
    pub already_linked: usize,
    /// Links not attempted because the child or parent issue was missing.
    pub link_skipped: usize,
    /// Remote calls that failed; each was logged when it happened.
    pub failed: usize,
}

impl SyncReport {
    /// `true` if every remote call succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Emits the summary line; at warn level when anything failed.
    pub fn log_summary(&self) {
        if self.is_clean() {
            info!(
                created = self.created,
                updated = self.updated,
                unchanged = self.unchanged,
                closed = self.closed,
                linked = self.linked,
                already_linked = self.already_linked,
                link_skipped = self.link_skipped,
                "Sync finished"
            );
        } else {
            warn!(
                created = self.created,
                updated = self.updated,
                unchanged = self.unchanged,
                closed = self.closed,
                linked = self.linked,
                already_linked = self.already_linked,
                link_skipped = self.link_skipped,
                failed = self.failed,
                "Sync finished with failures; rerun to converge"
            );
        }
    }
}
