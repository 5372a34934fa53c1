//! backlog-sync orchestration.
//!
//! Sequences calls between the domain rules in the [`backlog`] crate and the
//! [`backlog::IssueTracker`] port: reconcile each kind, optionally prune
//! orphans, then wire sub-issue relationships.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** This crate contains no domain rules of its own and
//! no transport code. Every remote call is awaited before the next one starts;
//! nothing is retried.

pub mod linker;
pub mod pruner;
pub mod reconciler;
pub mod report;
pub mod runner;

#[cfg(test)]
mod testing;

pub use linker::link_sub_issues;
pub use pruner::prune_kind;
pub use reconciler::Reconciler;
pub use report::SyncReport;
pub use runner::{SyncRunner, SyncScope};
