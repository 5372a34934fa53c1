//! In-memory `IssueTracker` that records every call.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use backlog::{
    extract_identifier, CreatedIssue, IssueDraft, IssueId, IssueNumber, IssueState, IssueTracker,
    LinkOutcome, RemoteIssue, TrackerError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { page: u32 },
    Create(IssueDraft),
    Update(IssueNumber, IssueDraft),
    Close(IssueNumber),
    Link { parent: IssueNumber, child: IssueId },
}

#[derive(Default)]
struct State {
    issues: Vec<RemoteIssue>,
    calls: Vec<Call>,
    links: HashSet<(IssueNumber, IssueId)>,
    failing: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryTracker {
    state: Mutex<State>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing issue; numbers and ids are assigned sequentially.
    pub fn with_issue(self, title: &str, body: &str, labels: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let n = state.issues.len() as u64 + 1;
            state.issues.push(RemoteIssue {
                id: IssueId::new(1000 + n),
                number: IssueNumber::new(n),
                title: title.to_string(),
                body: body.to_string(),
                state: IssueState::Open,
                labels: labels.iter().map(|s| s.to_string()).collect(),
                is_pull_request: false,
                html_url: Some(format!("https://example.test/issues/{n}")),
            });
        }
        self
    }

    /// Makes every write touching `id` fail with HTTP 500.
    pub fn failing_for(self, id: &str) -> Self {
        self.state.lock().unwrap().failing.insert(id.to_string());
        self
    }

    /// Records an existing sub-issue relationship.
    pub fn with_link(self, parent: IssueNumber, child: IssueId) -> Self {
        self.state.lock().unwrap().links.insert((parent, child));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than listing.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .collect()
    }

    /// Every issue, in number order.
    pub fn snapshot(&self) -> Vec<RemoteIssue> {
        self.state.lock().unwrap().issues.clone()
    }

    pub fn issue(&self, number: u64) -> RemoteIssue {
        self.state.lock().unwrap().issues[number as usize - 1].clone()
    }

    pub fn issue_by_id(&self, id: &str) -> Option<RemoteIssue> {
        self.state
            .lock()
            .unwrap()
            .issues
            .iter()
            .find(|i| extract_identifier(&i.title, "PALI").as_deref() == Some(id))
            .cloned()
    }

    fn fail(state: &State, title: &str) -> Result<(), TrackerError> {
        match extract_identifier(title, "PALI") {
            Some(id) if state.failing.contains(&id) => Err(TrackerError::Status {
                status: 500,
                body: format!("boom for {id}"),
            }),
            _ => Ok(()),
        }
    }
}

const PAGE: usize = 2;

#[async_trait]
impl IssueTracker for InMemoryTracker {
    async fn list_issues(&self, page: u32, _per_page: u32) -> Result<Vec<RemoteIssue>, TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List { page });
        let start = (page as usize - 1) * PAGE;
        Ok(state.issues.iter().skip(start).take(PAGE).cloned().collect())
    }

    async fn create_issue(&self, draft: &IssueDraft) -> Result<CreatedIssue, TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(draft.clone()));
        Self::fail(&state, &draft.title)?;
        let n = state.issues.len() as u64 + 1;
        let html_url = format!("https://example.test/issues/{n}");
        state.issues.push(RemoteIssue {
            id: IssueId::new(1000 + n),
            number: IssueNumber::new(n),
            title: draft.title.clone(),
            body: draft.body.clone(),
            state: IssueState::Open,
            labels: draft.labels.clone(),
            is_pull_request: false,
            html_url: Some(html_url.clone()),
        });
        Ok(CreatedIssue {
            number: IssueNumber::new(n),
            html_url: Some(html_url),
        })
    }

    async fn update_issue(&self, number: IssueNumber, draft: &IssueDraft) -> Result<(), TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(number, draft.clone()));
        Self::fail(&state, &draft.title)?;
        let issue = &mut state.issues[number.as_u64() as usize - 1];
        issue.title = draft.title.clone();
        issue.body = draft.body.clone();
        issue.labels = draft.labels.clone();
        Ok(())
    }

    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Close(number));
        let title = state.issues[number.as_u64() as usize - 1].title.clone();
        Self::fail(&state, &title)?;
        state.issues[number.as_u64() as usize - 1].state = IssueState::Closed;
        Ok(())
    }

    async fn add_sub_issue(&self, parent: IssueNumber, child: IssueId) -> Result<LinkOutcome, TrackerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Link { parent, child });
        if state.links.insert((parent, child)) {
            Ok(LinkOutcome::Linked)
        } else {
            Ok(LinkOutcome::AlreadyLinked)
        }
    }
}
