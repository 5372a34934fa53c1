//! backlog-sync GitHub infrastructure adapter.
//!
//! Implements the [`backlog::IssueTracker`] port against the GitHub REST API
//! using `reqwest`. Endpoints used:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET /repos/{owner}/{repo}/issues?state=all&per_page=N&page=P` |
//! | create | `POST /repos/{owner}/{repo}/issues` |
//! | update | `PATCH /repos/{owner}/{repo}/issues/{number}` (title, body, labels) |
//! | close | `PATCH /repos/{owner}/{repo}/issues/{number}` (`state: closed`) |
//! | link | `POST /repos/{owner}/{repo}/issues/{number}/sub_issues` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. All GitHub API
//! details (headers, pagination parameters, status-code interpretation) are
//! handled here; the [`backlog`] crate never sees them. Nothing is retried and
//! rate-limit headers are not inspected.

pub mod client;
pub mod config;

pub use client::GitHubIssueTracker;
pub use config::{GitHubConfig, GitHubConfigError, RepositorySlug, DEFAULT_API_URL};
