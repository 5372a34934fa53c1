//! Remote directory: existing issues keyed by the identifier in their title.
//!
//! Two title grammars are recognised: `[PALI-E1] Title` and the legacy
//! `PALI-E1 – Title`. Pull requests share the listing endpoint and are skipped.
//!
//! When several issues carry the same identifier only the first one in listing
//! order is kept. The others are reported as duplicates and never touched.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{IdentifierGrammar, IssueTracker, ItemKind, RemoteIssue, SyncError};

/// Extracts the work-item identifier from an issue title.
///
/// A bracketed prefix wins; otherwise the first space-delimited token is used
/// if it starts with `prefix`.
pub fn extract_identifier(title: &str, prefix: &str) -> Option<String> {
    let title = title.trim();

    if let Some(rest) = title.strip_prefix('[') {
        if let Some(closing) = rest.find(']') {
            return Some(rest[..closing].trim().to_string());
        }
    }

    title
        .split(' ')
        .next()
        .filter(|token| token.starts_with(prefix))
        .map(str::to_string)
}

/// Which identifiers a directory keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryScope {
    /// Only identifiers matching one kind's pattern.
    Kind(ItemKind),
    /// Any identifier starting with the base prefix.
    AllKinds,
}

/// An issue that lost the first-seen race for its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIssue {
    pub id: String,
    pub kept: RemoteIssue,
    pub ignored: RemoteIssue,
}

/// Existing issues keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct IssueDirectory {
    issues: BTreeMap<String, RemoteIssue>,
    duplicates: Vec<DuplicateIssue>,
}

impl IssueDirectory {
    /// Builds a directory from listing entries in listing order.
    pub fn from_issues<I>(issues: I, scope: DirectoryScope, grammar: &IdentifierGrammar) -> Self
    where
        I: IntoIterator<Item = RemoteIssue>,
    {
        let mut directory = Self::default();
        for issue in issues {
            directory.insert(issue, scope, grammar);
        }
        directory
    }

    /// Lists every issue page by page and builds the directory for `scope`.
    ///
    /// Stops at the first empty page. A listing failure aborts the run.
    pub async fn fetch(
        tracker: &dyn IssueTracker,
        scope: DirectoryScope,
        grammar: &IdentifierGrammar,
        page_size: u32,
    ) -> Result<Self, SyncError> {
        let mut directory = Self::default();
        let mut page = 1;
        loop {
            let issues = tracker
                .list_issues(page, page_size)
                .await
                .map_err(SyncError::Listing)?;
            if issues.is_empty() {
                break;
            }
            debug!(page, count = issues.len(), "Fetched issue page");
            for issue in issues {
                directory.insert(issue, scope, grammar);
            }
            page += 1;
        }

        for dup in &directory.duplicates {
            warn!(
                id = %dup.id,
                kept = %dup.kept.number,
                ignored = %dup.ignored.number,
                "Duplicate issue for identifier; only the first is managed"
            );
        }
        Ok(directory)
    }

    fn insert(&mut self, issue: RemoteIssue, scope: DirectoryScope, grammar: &IdentifierGrammar) {
        if issue.is_pull_request {
            return;
        }
        let Some(id) = extract_identifier(&issue.title, grammar.prefix()) else {
            return;
        };
        let in_scope = match scope {
            DirectoryScope::Kind(kind) => grammar.matches(kind, &id),
            DirectoryScope::AllKinds => id.starts_with(grammar.prefix()),
        };
        if !in_scope {
            return;
        }
        match self.issues.get(&id) {
            Some(kept) => self.duplicates.push(DuplicateIssue {
                id,
                kept: kept.clone(),
                ignored: issue,
            }),
            None => {
                self.issues.insert(id, issue);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&RemoteIssue> {
        self.issues.get(id)
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.issues.keys().map(String::as_str)
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RemoteIssue)> {
        self.issues.iter().map(|(id, issue)| (id.as_str(), issue))
    }

    pub fn duplicates(&self) -> &[DuplicateIssue] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
