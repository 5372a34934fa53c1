//! The configuration document and the flattener.
//!
//! The document is a tree of epics → stories → tasks → subtasks. Flattening
//! produces one [`WorkItem`] per node in depth-first pre-order, so a parent
//! always precedes its children. Phase and priority resolve top-down: a node
//! that leaves either blank takes its parent's *resolved* value.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::{IdentifierGrammar, ItemId, ItemKind, SyncError, WorkItem};

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacklogDocument {
    #[serde(default)]
    pub epics: Option<Vec<ItemNode>>,
}

/// One node of the tree, at any level.
///
/// Every field is optional at the serde level so that a missing field is
/// reported with the item it belongs to rather than as a bare parser error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemNode {
    pub id: Option<String>,
    pub title: Option<String>,
    pub phase: Option<String>,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub stories: Option<Vec<ItemNode>>,
    pub tasks: Option<Vec<ItemNode>>,
    pub subtasks: Option<Vec<ItemNode>>,
}

impl ItemNode {
    fn children_under(&self, key: &str) -> Option<&Vec<ItemNode>> {
        match key {
            "stories" => self.stories.as_ref(),
            "tasks" => self.tasks.as_ref(),
            "subtasks" => self.subtasks.as_ref(),
            _ => None,
        }
    }
}

impl BacklogDocument {
    /// Parses a document from YAML text. An empty document has no epics.
    pub fn from_yaml_str(text: &str) -> Result<Self, SyncError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Option<Self>>(text)
            .map(Option::unwrap_or_default)
            .map_err(|e| SyncError::ConfigParse {
                message: e.to_string(),
            })
    }

    /// Reads and parses the document at `path`.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            return Err(SyncError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| SyncError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Flattens the tree into work items, validating identifiers against `grammar`.
    pub fn flatten(&self, grammar: &IdentifierGrammar) -> Result<Vec<WorkItem>, SyncError> {
        let mut flattener = Flattener {
            grammar,
            items: Vec::new(),
            seen: HashSet::new(),
        };
        for (index, epic) in self.epics.iter().flatten().enumerate() {
            flattener.visit(epic, ItemKind::Epic, None, index)?;
        }
        Ok(flattener.items)
    }
}

/// Loads `path` and flattens it in one step.
pub fn load_items(path: &Path, grammar: &IdentifierGrammar) -> Result<Vec<WorkItem>, SyncError> {
    BacklogDocument::load(path)?.flatten(grammar)
}

struct Flattener<'a> {
    grammar: &'a IdentifierGrammar,
    items: Vec<WorkItem>,
    seen: HashSet<String>,
}

impl Flattener<'_> {
    fn visit(
        &mut self,
        node: &ItemNode,
        kind: ItemKind,
        parent: Option<&WorkItem>,
        index: usize,
    ) -> Result<(), SyncError> {
        let position = match parent {
            Some(p) => format!("#{} under '{}'", index + 1, p.id),
            None => format!("#{}", index + 1),
        };

        let id = required(&node.id, kind, "id", &position)?;
        let context = format!("'{id}'");
        let title = required(&node.title, kind, "title", &context)?;

        let (phase, priority) = match parent {
            Some(p) => (
                inherit(&node.phase, &p.phase),
                inherit(&node.priority, &p.priority),
            ),
            None => (
                required(&node.phase, kind, "phase", &context)?,
                required(&node.priority, kind, "priority", &context)?,
            ),
        };

        self.validate_id(&id, kind, parent)?;
        self.reject_foreign_children(node, kind, &id)?;

        let item_id = ItemId::new(id.clone()).ok_or_else(|| SyncError::MissingField {
            kind,
            field: "id",
            context: position.clone(),
        })?;

        let (epic_id, story_id, task_id) = match (kind, parent) {
            (ItemKind::Epic, _) | (_, None) => (None, None, None),
            (ItemKind::Story, Some(p)) => (Some(p.id.clone()), None, None),
            (ItemKind::Task, Some(p)) => (p.epic_id.clone(), Some(p.id.clone()), None),
            (ItemKind::Subtask, Some(p)) => (p.epic_id.clone(), p.story_id.clone(), Some(p.id.clone())),
        };

        let item = WorkItem {
            id: item_id,
            kind,
            phase,
            priority,
            title,
            description: trimmed(&node.description).unwrap_or_default(),
            epic_id,
            story_id,
            task_id,
        };
        self.items.push(item.clone());

        if let (Some(child_kind), Some(key)) = (kind.child(), kind.children_key()) {
            for (child_index, child) in node.children_under(key).into_iter().flatten().enumerate() {
                self.visit(child, child_kind, Some(&item), child_index)?;
            }
        }
        Ok(())
    }

    fn validate_id(&mut self, id: &str, kind: ItemKind, parent: Option<&WorkItem>) -> Result<(), SyncError> {
        if !self.grammar.matches(kind, id) {
            return Err(SyncError::InvalidIdentifier {
                kind,
                id: id.to_string(),
                expected: self.grammar.describe(kind),
            });
        }
        if let Some(parent) = parent {
            let extends_parent = id
                .strip_prefix(parent.id.as_str())
                .is_some_and(|rest| rest.starts_with('-'));
            if !extends_parent {
                return Err(SyncError::ParentMismatch {
                    kind,
                    id: id.to_string(),
                    parent: parent.id.to_string(),
                });
            }
        }
        if !self.seen.insert(id.to_string()) {
            return Err(SyncError::DuplicateIdentifier { id: id.to_string() });
        }
        Ok(())
    }

    fn reject_foreign_children(&self, node: &ItemNode, kind: ItemKind, id: &str) -> Result<(), SyncError> {
        let allowed = kind.children_key();
        for key in ["stories", "tasks", "subtasks"] {
            if Some(key) != allowed && node.children_under(key).is_some_and(|c| !c.is_empty()) {
                return Err(SyncError::UnexpectedChildren {
                    kind,
                    id: id.to_string(),
                    key,
                });
            }
        }
        Ok(())
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, kind: ItemKind, field: &'static str, context: &str) -> Result<String, SyncError> {
    trimmed(value).ok_or_else(|| SyncError::MissingField {
        kind,
        field,
        context: context.to_string(),
    })
}

fn inherit(value: &Option<String>, parent: &str) -> String {
    trimmed(value).unwrap_or_else(|| parent.to_string())
}
