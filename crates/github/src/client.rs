//! `IssueTracker` over the GitHub REST API.

use std::time::Duration;

use async_trait::async_trait;
use backlog::{
    CreatedIssue, IssueDraft, IssueId, IssueNumber, IssueState, IssueTracker, LinkOutcome, RemoteIssue,
    TrackerError,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GitHubConfig, GitHubConfigError};

const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IssuePayload {
    id: u64,
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
    #[serde(default)]
    html_url: Option<String>,
}

/// Labels come back as objects; string entries are accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelPayload {
    Object { name: String },
    Name(String),
}

impl LabelPayload {
    fn into_name(self) -> String {
        match self {
            Self::Object { name } | Self::Name(name) => name,
        }
    }
}

impl From<IssuePayload> for RemoteIssue {
    fn from(p: IssuePayload) -> Self {
        RemoteIssue {
            id: IssueId::new(p.id),
            number: IssueNumber::new(p.number),
            title: p.title,
            body: p.body.unwrap_or_default(),
            state: if p.state == "closed" {
                IssueState::Closed
            } else {
                IssueState::Open
            },
            labels: p.labels.into_iter().map(LabelPayload::into_name).collect(),
            is_pull_request: p.pull_request.is_some(),
            html_url: p.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedPayload {
    number: u64,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Serialize)]
struct StatePatch<'a> {
    state: &'a str,
}

#[derive(Serialize)]
struct SubIssueRequest {
    sub_issue_id: u64,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The production [`IssueTracker`].
#[derive(Debug, Clone)]
pub struct GitHubIssueTracker {
    client: reqwest::Client,
    issues_url: String,
}

impl GitHubIssueTracker {
    /// Builds an authenticated client for `config.repository`.
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubConfigError> {
        let token = config.token.trim();
        if token.is_empty() {
            return Err(GitHubConfigError::MissingToken);
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GitHubConfigError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("backlog-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GitHubConfigError::Client)?;

        Ok(Self {
            client,
            issues_url: config.issues_url(),
        })
    }

    fn issue_url(&self, number: IssueNumber) -> String {
        format!("{}/{}", self.issues_url, number)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let response = request
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response).await)
        }
    }
}

async fn status_error(response: Response) -> TrackerError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    TrackerError::Status { status, body }
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, TrackerError> {
    response
        .json::<T>()
        .await
        .map_err(|e| TrackerError::Decode(e.to_string()))
}

#[async_trait]
impl IssueTracker for GitHubIssueTracker {
    async fn list_issues(&self, page: u32, per_page: u32) -> Result<Vec<RemoteIssue>, TrackerError> {
        debug!(page, per_page, "GET issues");
        let request = self.client.get(&self.issues_url).query(&[
            ("state", "all".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);
        let response = self.send(request).await?;
        let payload: Vec<IssuePayload> = decode(response).await?;
        Ok(payload.into_iter().map(RemoteIssue::from).collect())
    }

    async fn create_issue(&self, draft: &IssueDraft) -> Result<CreatedIssue, TrackerError> {
        let response = self.send(self.client.post(&self.issues_url).json(draft)).await?;
        let created: CreatedPayload = decode(response).await?;
        Ok(CreatedIssue {
            number: IssueNumber::new(created.number),
            html_url: created.html_url,
        })
    }

    async fn update_issue(&self, number: IssueNumber, draft: &IssueDraft) -> Result<(), TrackerError> {
        self.send(self.client.patch(self.issue_url(number)).json(draft))
            .await
            .map(drop)
    }

    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError> {
        let patch = StatePatch { state: "closed" };
        self.send(self.client.patch(self.issue_url(number)).json(&patch))
            .await
            .map(drop)
    }

    async fn add_sub_issue(&self, parent: IssueNumber, child: IssueId) -> Result<LinkOutcome, TrackerError> {
        let url = format!("{}/sub_issues", self.issue_url(parent));
        let response = self
            .client
            .post(url)
            .json(&SubIssueRequest {
                sub_issue_id: child.as_u64(),
            })
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        // GitHub answers 422 when the child is already a sub-issue of this parent.
        match response.status() {
            s if s.is_success() => Ok(LinkOutcome::Linked),
            StatusCode::UNPROCESSABLE_ENTITY => Ok(LinkOutcome::AlreadyLinked),
            _ => Err(status_error(response).await),
        }
    }
}
