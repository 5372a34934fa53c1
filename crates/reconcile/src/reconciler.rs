//! Creates or updates the issue of every configured item of one kind.

use backlog::{
    desired_body, desired_title, diff, IssueDirectory, IssueDraft, IssueTracker, ItemKind, LabelPolicy,
    SyncSettings, WorkItem,
};
use tracing::{debug, error, info};

use crate::SyncReport;

/// Drives create/update calls for one kind at a time.
pub struct Reconciler<'a> {
    tracker: &'a dyn IssueTracker,
    settings: &'a SyncSettings,
}

impl<'a> Reconciler<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, settings: &'a SyncSettings) -> Self {
        Self { tracker, settings }
    }

    /// Desired title, body and labels for `item`, given the labels it carries now.
    pub fn desired(&self, item: &WorkItem, current_labels: &[String]) -> IssueDraft {
        let policy = LabelPolicy::new(self.settings.grammar(), self.settings.priority_labels());
        IssueDraft {
            title: desired_title(item),
            body: desired_body(item, self.settings.config_path()),
            labels: policy.compute(current_labels, item.kind.label(), &item.priority, item.id.as_str()),
        }
    }

    /// Reconciles every item of `kind` against `directory`.
    ///
    /// Per-item failures are logged and counted; they never stop the batch.
    pub async fn reconcile_kind(
        &self,
        kind: ItemKind,
        items: &[WorkItem],
        directory: &IssueDirectory,
        report: &mut SyncReport,
    ) {
        for item in items.iter().filter(|i| i.kind == kind) {
            match directory.get(item.id.as_str()) {
                None => self.create(item, report).await,
                Some(issue) => {
                    let draft = self.desired(item, &issue.labels);
                    let changes = diff(issue, &draft);
                    if changes.is_empty() {
                        debug!(id = %item.id, number = %issue.number, "No changes");
                        report.unchanged += 1;
                        continue;
                    }
                    match self.tracker.update_issue(issue.number, &draft).await {
                        Ok(()) => {
                            info!(
                                id = %item.id,
                                number = %issue.number,
                                title = changes.title,
                                body = changes.body,
                                labels = changes.labels,
                                "Updated issue"
                            );
                            report.updated += 1;
                        }
                        Err(e) => {
                            error!(id = %item.id, number = %issue.number, status = ?e.status(), error = %e, "Update failed");
                            report.failed += 1;
                        }
                    }
                }
            }
        }
    }

    async fn create(&self, item: &WorkItem, report: &mut SyncReport) {
        let draft = self.desired(item, &[]);
        match self.tracker.create_issue(&draft).await {
            Ok(created) => {
                info!(
                    id = %item.id,
                    number = %created.number,
                    url = created.html_url.as_deref().unwrap_or(""),
                    "Created issue"
                );
                report.created += 1;
            }
            Err(e) => {
                error!(id = %item.id, status = ?e.status(), error = %e, "Create failed");
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use backlog::{DirectoryScope, IdentifierGrammar, IssueNumber, ItemId};

    use super::*;
    use crate::testing::{Call, InMemoryTracker};

    fn settings() -> SyncSettings {
        SyncSettings::new("config/pali_items.yaml", "PALI", ["P0", "P1", "P2"]).unwrap()
    }

    fn epic() -> WorkItem {
        WorkItem {
            id: ItemId::new("PALI-E1").unwrap(),
            kind: ItemKind::Epic,
            phase: "P1".into(),
            priority: "P0".into(),
            title: "Ingestion".into(),
            description: String::new(),
            epic_id: None,
            story_id: None,
            task_id: None,
        }
    }

    fn story() -> WorkItem {
        WorkItem {
            id: ItemId::new("PALI-E1-S2").unwrap(),
            kind: ItemKind::Story,
            phase: "P1".into(),
            priority: "P0".into(),
            title: "Store".into(),
            description: "Persist it.".into(),
            epic_id: ItemId::new("PALI-E1"),
            story_id: None,
            task_id: None,
        }
    }

    fn directory(tracker: &InMemoryTracker, kind: ItemKind) -> IssueDirectory {
        IssueDirectory::from_issues(tracker.snapshot(), DirectoryScope::Kind(kind), &IdentifierGrammar::new("PALI").unwrap())
    }

    #[tokio::test]
    async fn missing_epic_is_created_with_title_and_labels() {
        let tracker = InMemoryTracker::new();
        let settings = settings();
        let mut report = SyncReport::default();
        Reconciler::new(&tracker, &settings)
            .reconcile_kind(ItemKind::Epic, &[epic()], &IssueDirectory::default(), &mut report)
            .await;

        let writes = tracker.writes();
        assert_eq!(writes.len(), 1);
        let Call::Create(draft) = &writes[0] else {
            panic!("expected a create, got {writes:?}");
        };
        assert_eq!(draft.title, "[PALI-E1] Ingestion");
        assert_eq!(draft.labels, vec!["Epics", "E1", "P0"]);
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn matching_issue_is_left_alone() {
        let settings = settings();
        let seed = InMemoryTracker::new();
        let draft = Reconciler::new(&seed, &settings).desired(&epic(), &[]);
        let tracker = InMemoryTracker::new().with_issue(&draft.title, &draft.body, &["P0", "E1", "Epics"]);

        let mut report = SyncReport::default();
        let dir = directory(&tracker, ItemKind::Epic);
        Reconciler::new(&tracker, &settings)
            .reconcile_kind(ItemKind::Epic, &[epic()], &dir, &mut report)
            .await;

        assert!(tracker.writes().is_empty());
        assert_eq!(report.unchanged, 1);
    }

    #[tokio::test]
    async fn priority_change_swaps_priority_label_and_keeps_others() {
        let settings = settings();
        let tracker = InMemoryTracker::new().with_issue(
            "[PALI-E1-S2] Store",
            "old body",
            &["Stories", "E1", "S2", "P2", "customer"],
        );

        let mut report = SyncReport::default();
        let dir = directory(&tracker, ItemKind::Story);
        Reconciler::new(&tracker, &settings)
            .reconcile_kind(ItemKind::Story, &[story()], &dir, &mut report)
            .await;

        let writes = tracker.writes();
        let [Call::Update(number, draft)] = writes.as_slice() else {
            panic!("expected one update, got {writes:?}");
        };
        assert_eq!(*number, IssueNumber::new(1));
        assert_eq!(draft.labels, vec!["Stories", "E1", "S2", "customer", "P0"]);
        assert!(draft.body.contains("Persist it."));
        assert_eq!(report.updated, 1);
    }

    #[tokio::test]
    async fn failed_create_does_not_stop_the_batch() {
        let settings = settings();
        let tracker = InMemoryTracker::new().failing_for("PALI-E1");
        let mut second = epic();
        second.id = ItemId::new("PALI-E2").unwrap();

        let mut report = SyncReport::default();
        Reconciler::new(&tracker, &settings)
            .reconcile_kind(ItemKind::Epic, &[epic(), second], &IssueDirectory::default(), &mut report)
            .await;

        assert_eq!(tracker.writes().len(), 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.created, 1);
        assert!(tracker.issue_by_id("PALI-E2").is_some());
    }

    #[tokio::test]
    async fn other_kinds_are_ignored() {
        let settings = settings();
        let tracker = InMemoryTracker::new();
        let mut report = SyncReport::default();
        Reconciler::new(&tracker, &settings)
            .reconcile_kind(ItemKind::Task, &[epic(), story()], &IssueDirectory::default(), &mut report)
            .await;
        assert!(tracker.calls().is_empty());
        assert_eq!(report, SyncReport::default());
    }
}
