//! Label policy.
//!
//! Three families of labels are *governed*: the kind base label (`Epics`,
//! `Stories`, ...), segment labels derived from the identifier (`E1`, `S5`, ...)
//! and the priority labels. Everything else on an issue belongs to humans and is
//! carried through untouched.

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::IdentifierGrammar;

/// Computes desired label sets for one identifier grammar and priority set.
#[derive(Debug, Clone, Copy)]
pub struct LabelPolicy<'a> {
    grammar: &'a IdentifierGrammar,
    priority_labels: &'a BTreeSet<String>,
}

impl<'a> LabelPolicy<'a> {
    pub fn new(grammar: &'a IdentifierGrammar, priority_labels: &'a BTreeSet<String>) -> Self {
        Self {
            grammar,
            priority_labels,
        }
    }

    /// Returns the labels an issue should carry.
    ///
    /// Starting from `current`, appends `kind_label` and each segment label of
    /// `id` if missing, removes every priority label other than `priority`, then
    /// appends `priority`. A priority outside the configured set is reported and
    /// no priority label is added.
    pub fn compute(&self, current: &[String], kind_label: &str, priority: &str, id: &str) -> Vec<String> {
        let mut labels: Vec<String> = current.to_vec();

        push_missing(&mut labels, kind_label);
        for segment in self.grammar.segments(id) {
            push_missing(&mut labels, segment);
        }

        labels.retain(|l| !self.priority_labels.contains(l) || l == priority);

        if self.priority_labels.contains(priority) {
            push_missing(&mut labels, priority);
        } else {
            warn!(
                id = %id,
                priority = %priority,
                expected = ?self.priority_labels,
                "Unknown priority; no priority label applied"
            );
        }

        labels
    }
}

fn push_missing(labels: &mut Vec<String>, label: &str) {
    if !labels.iter().any(|l| l == label) {
        labels.push(label.to_string());
    }
}

/// Returns `true` if both slices hold the same set of labels, ignoring order
/// and repetition.
pub fn labels_equal(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}
