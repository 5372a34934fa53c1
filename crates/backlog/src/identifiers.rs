//! Newtype domain identifiers.
//!
//! A work item is known by two unrelated kinds of identity: the configured
//! [`ItemId`] (`"PALI-E1-S2"`) and the integers GitHub assigns to the issue that
//! mirrors it. GitHub assigns *two* integers per issue: the repository-scoped
//! [`IssueNumber`] used in URLs and the global [`IssueId`] required by the
//! sub-issue API. Keeping them as distinct newtypes prevents passing one where
//! the other is expected even though both are `u64` under the hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (GitHub-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GitHub-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// The repository-scoped issue number (`#42`).
    ///
    /// Used to address an issue in update, close and sub-issue calls.
    IssueNumber
}

u64_id! {
    /// The global numeric id GitHub assigns to every issue.
    ///
    /// Only the sub-issue API takes this; everything else uses [`IssueNumber`].
    IssueId
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (configuration)
// ---------------------------------------------------------------------------

string_id! {
    /// The configured identifier of a work item (e.g. `"PALI-E1-S5-T3"`).
    ///
    /// Encodes the item's ancestry: every component after the prefix names one
    /// level of the hierarchy. Format is validated against
    /// [`crate::IdentifierGrammar`] when the configuration is loaded.
    ItemId
}
