//! Run settings shared by every component.
//!
//! Built once at process entry and passed by reference; nothing in the
//! workspace reads configuration from globals.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::{IdentifierGrammar, SyncError};

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/pali_items.yaml";

/// Default identifier prefix.
pub const DEFAULT_ID_PREFIX: &str = "PALI";

/// Default priority label set.
pub const DEFAULT_PRIORITY_LABELS: [&str; 3] = ["P0", "P1", "P2"];

/// Issues requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Everything a sync run needs to know besides the tracker itself.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    config_path: PathBuf,
    grammar: IdentifierGrammar,
    priority_labels: BTreeSet<String>,
    page_size: u32,
}

impl SyncSettings {
    /// Builds settings, validating the prefix and the priority label set.
    pub fn new<I, S>(config_path: impl Into<PathBuf>, prefix: &str, priority_labels: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let priority_labels: BTreeSet<String> = priority_labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        if priority_labels.is_empty() {
            return Err(SyncError::InvalidSetting {
                message: "at least one priority label is required".into(),
            });
        }

        Ok(Self {
            config_path: config_path.into(),
            grammar: IdentifierGrammar::new(prefix)?,
            priority_labels,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Overrides the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, SyncError> {
        if page_size == 0 || page_size > 100 {
            return Err(SyncError::InvalidSetting {
                message: format!("page size must be between 1 and 100, got {page_size}"),
            });
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn grammar(&self) -> &IdentifierGrammar {
        &self.grammar
    }

    pub fn priority_labels(&self) -> &BTreeSet<String> {
        &self.priority_labels
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
