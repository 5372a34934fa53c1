//! Identifier grammar: which identifiers belong to which hierarchy level.
//!
//! Identifiers are `PREFIX-E<n>`, `PREFIX-E<n>-S<n>`, `PREFIX-E<n>-S<n>-T<n>` and
//! `PREFIX-E<n>-S<n>-T<n>-ST<n>`. Each component after the prefix is also a
//! *segment label* on the issue.

use regex::Regex;

use crate::{ItemKind, SyncError};

/// Compiled kind patterns for one identifier prefix.
#[derive(Debug, Clone)]
pub struct IdentifierGrammar {
    prefix: String,
    epic: Regex,
    story: Regex,
    task: Regex,
    subtask: Regex,
    segments: Regex,
}

impl IdentifierGrammar {
    /// Compiles the grammar for `prefix` (e.g. `"PALI"`).
    ///
    /// The prefix is matched literally.
    pub fn new(prefix: &str) -> Result<Self, SyncError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(SyncError::InvalidSetting {
                message: "identifier prefix must not be empty".into(),
            });
        }

        let p = regex::escape(prefix);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| SyncError::InvalidSetting {
                message: format!("identifier pattern for prefix '{prefix}': {e}"),
            })
        };

        Ok(Self {
            prefix: prefix.to_string(),
            epic: compile(format!(r"^{p}-E\d+$"))?,
            story: compile(format!(r"^{p}-E\d+-S\d+$"))?,
            task: compile(format!(r"^{p}-E\d+-S\d+-T\d+$"))?,
            subtask: compile(format!(r"^{p}-E\d+-S\d+-T\d+-ST\d+$"))?,
            segments: compile(format!(r"^{p}-(E\d+)(?:-(S\d+))?(?:-(T\d+))?(?:-(ST\d+))?$"))?,
        })
    }

    /// The base prefix, without the trailing dash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The compiled pattern for `kind`.
    pub fn pattern(&self, kind: ItemKind) -> &Regex {
        match kind {
            ItemKind::Epic => &self.epic,
            ItemKind::Story => &self.story,
            ItemKind::Task => &self.task,
            ItemKind::Subtask => &self.subtask,
        }
    }

    /// Returns `true` if `id` is a well-formed identifier of `kind`.
    pub fn matches(&self, kind: ItemKind, id: &str) -> bool {
        self.pattern(kind).is_match(id)
    }

    /// The kind whose pattern `id` matches, if any.
    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        ItemKind::ALL.into_iter().find(|kind| self.matches(*kind, id))
    }

    /// Human-readable form of the pattern for `kind`, for error messages.
    pub fn describe(&self, kind: ItemKind) -> String {
        let tail = match kind {
            ItemKind::Epic => "E<n>",
            ItemKind::Story => "E<n>-S<n>",
            ItemKind::Task => "E<n>-S<n>-T<n>",
            ItemKind::Subtask => "E<n>-S<n>-T<n>-ST<n>",
        };
        format!("{}-{tail}", self.prefix)
    }

    /// Splits `id` into its segment labels: `PALI-E1-S5-T3-ST2` → `E1, S5, T3, ST2`.
    ///
    /// An identifier outside the grammar yields no segments.
    pub fn segments<'a>(&self, id: &'a str) -> Vec<&'a str> {
        self.segments
            .captures(id)
            .map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
