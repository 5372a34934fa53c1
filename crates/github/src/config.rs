//! Connection settings for the GitHub adapter.

use std::str::FromStr;

use thiserror::Error;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Errors raised while building the adapter. All are fatal at startup.
#[derive(Debug, Error)]
pub enum GitHubConfigError {
    #[error("repository must be given as 'owner/name', got '{0}'")]
    InvalidRepository(String),

    #[error("GitHub token is empty")]
    MissingToken,

    #[error("GitHub token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepositorySlug {
    type Err = GitHubConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GitHubConfigError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything needed to talk to one repository's issues.
#[derive(Clone)]
pub struct GitHubConfig {
    pub repository: RepositorySlug,
    pub token: String,
    /// REST base URL; overridable for GitHub Enterprise and tests.
    pub api_url: String,
}

impl GitHubConfig {
    pub fn new(repository: RepositorySlug, token: impl Into<String>) -> Self {
        Self {
            repository,
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// `{api}/repos/{owner}/{repo}/issues`
    pub fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_url.trim_end_matches('/'),
            self.repository.owner,
            self.repository.name
        )
    }
}

// The token never appears in logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}
