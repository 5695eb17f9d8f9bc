//! Layout state holders
//!
//! The drop handlers never keep state of their own. They read the current
//! tree and registry from a [`LayoutStore`], compute the new values, and hand
//! both back in one [`LayoutChange`] only when every step succeeded.

use formforge_ir::{ComponentRegistry, FormSchema, LayoutTree};
use serde::{Deserialize, Serialize};

// ============================================================================
// LayoutStore
// ============================================================================

/// A finished edit: the new tree and, if it changed, the new registry
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutChange {
    /// Short description, e.g. "drop"
    pub action: String,
    pub tree: LayoutTree,
    pub registry: Option<ComponentRegistry>,
}

impl LayoutChange {
    pub fn new(action: impl Into<String>, tree: LayoutTree) -> Self {
        Self {
            action: action.into(),
            tree,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Owner of the (tree, registry) pair edited by drops
pub trait LayoutStore {
    fn tree(&self) -> &LayoutTree;

    fn registry(&self) -> &ComponentRegistry;

    fn set_tree(&mut self, tree: LayoutTree);

    fn set_registry(&mut self, registry: ComponentRegistry);

    /// Install a finished change
    fn apply(&mut self, change: LayoutChange) {
        if let Some(registry) = change.registry {
            self.set_registry(registry);
        }
        self.set_tree(change.tree);
    }
}

// ============================================================================
// FormLayout
// ============================================================================

/// Plain in-memory layout state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormLayout {
    pub tree: LayoutTree,
    pub registry: ComponentRegistry,
}

impl FormLayout {
    pub fn new(tree: LayoutTree, registry: ComponentRegistry) -> Self {
        Self { tree, registry }
    }
}

impl LayoutStore for FormLayout {
    fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn set_tree(&mut self, tree: LayoutTree) {
        self.tree = tree;
    }

    fn set_registry(&mut self, registry: ComponentRegistry) {
        self.registry = registry;
    }
}

impl From<FormSchema> for FormLayout {
    fn from(schema: FormSchema) -> Self {
        Self::new(schema.layout, schema.components)
    }
}

impl LayoutStore for FormSchema {
    fn tree(&self) -> &LayoutTree {
        &self.layout
    }

    fn registry(&self) -> &ComponentRegistry {
        &self.components
    }

    fn set_tree(&mut self, tree: LayoutTree) {
        self.layout = tree;
        self.touch();
    }

    fn set_registry(&mut self, registry: ComponentRegistry) {
        self.components = registry;
        self.touch();
    }
}

// ============================================================================
// History (Undo/Redo)
// ============================================================================

/// A layout state recorded for undo/redo
///
/// Trees share structure, so a snapshot costs one `Arc` per root item plus
/// the registry map.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// Description of the action that replaced this state
    pub action: String,
    pub layout: FormLayout,
}

/// Bounded undo/redo stacks
#[derive(Debug, Clone)]
pub struct History {
    /// Past states (for undo)
    past: Vec<HistorySnapshot>,
    /// Future states (for redo)
    future: Vec<HistorySnapshot>,
    /// Maximum history size
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_size: 50,
        }
    }
}

impl History {
    /// Create new history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create history with custom max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            max_size,
            ..Default::default()
        }
    }

    /// Push a new snapshot (clears redo stack)
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.past.push(snapshot);
        self.future.clear();

        if self.past.len() > self.max_size {
            self.past.remove(0);
        }
    }

    /// Undo: pop from past, push current to future
    pub fn undo(&mut self, current: HistorySnapshot) -> Option<HistorySnapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Redo: pop from future, push current to past
    pub fn redo(&mut self, current: HistorySnapshot) -> Option<HistorySnapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Action that the next undo reverts
    pub fn last_action(&self) -> Option<&str> {
        self.past.last().map(|s| s.action.as_str())
    }

    /// Action that the next redo re-applies
    pub fn next_action(&self) -> Option<&str> {
        self.future.last().map(|s| s.action.as_str())
    }
}

/// Layout state with undo/redo
///
/// Every applied change records one snapshot, however many of the tree and
/// registry it replaced. Direct `set_*` calls record one snapshot each.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    layout: FormLayout,
    history: History,
}

impl HistoryStore {
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            history: History::new(),
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_layout(self) -> FormLayout {
        self.layout
    }

    fn record(&mut self, action: impl Into<String>) {
        self.history.push(HistorySnapshot {
            action: action.into(),
            layout: self.layout.clone(),
        });
    }

    /// Restore the state before the last change
    pub fn undo(&mut self) -> bool {
        let current = HistorySnapshot {
            action: self.history.last_action().unwrap_or_default().to_string(),
            layout: self.layout.clone(),
        };
        match self.history.undo(current) {
            Some(previous) => {
                tracing::debug!("Undo '{}'", previous.action);
                self.layout = previous.layout;
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone change
    pub fn redo(&mut self) -> bool {
        let current = HistorySnapshot {
            action: self.history.next_action().unwrap_or_default().to_string(),
            layout: self.layout.clone(),
        };
        match self.history.redo(current) {
            Some(next) => {
                self.layout = next.layout;
                true
            }
            None => false,
        }
    }
}

impl LayoutStore for HistoryStore {
    fn tree(&self) -> &LayoutTree {
        &self.layout.tree
    }

    fn registry(&self) -> &ComponentRegistry {
        &self.layout.registry
    }

    fn set_tree(&mut self, tree: LayoutTree) {
        self.record("set tree");
        self.layout.tree = tree;
    }

    fn set_registry(&mut self, registry: ComponentRegistry) {
        self.record("set registry");
        self.layout.registry = registry;
    }

    fn apply(&mut self, change: LayoutChange) {
        self.record(change.action);
        if let Some(registry) = change.registry {
            self.layout.registry = registry;
        }
        self.layout.tree = change.tree;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use formforge_ir::{ComponentDefinition, LayoutNode, WidgetType};

    fn tree(ids: &[&str]) -> LayoutTree {
        LayoutTree::from_nodes(ids.iter().map(|id| LayoutNode::row(*id, vec![])).collect())
    }

    #[test]
    fn test_apply_sets_both() {
        let mut layout = FormLayout::default();
        let registry: ComponentRegistry =
            std::iter::once(ComponentDefinition::new("f1", WidgetType::Input)).collect();
        layout.apply(LayoutChange::new("drop", tree(&["r1"])).with_registry(registry.clone()));
        assert_eq!(layout.tree.len(), 1);
        assert_eq!(layout.registry, registry);
    }

    #[test]
    fn test_apply_without_registry_keeps_it() {
        let registry: ComponentRegistry =
            std::iter::once(ComponentDefinition::new("f1", WidgetType::Input)).collect();
        let mut layout = FormLayout::new(LayoutTree::new(), registry.clone());
        layout.apply(LayoutChange::new("move", tree(&["r1"])));
        assert_eq!(layout.registry, registry);
    }

    #[test]
    fn test_schema_store_touches_timestamp() {
        let mut schema = FormSchema::new("Store");
        let before = schema.meta.modified_at;
        schema.apply(LayoutChange::new("drop", tree(&["r1"])));
        assert_eq!(schema.layout.len(), 1);
        assert!(schema.meta.modified_at >= before);
    }

    #[test]
    fn test_undo_redo() {
        let mut store = HistoryStore::default();
        store.apply(LayoutChange::new("first", tree(&["a"])));
        store.apply(LayoutChange::new("second", tree(&["a", "b"])));
        assert_eq!(store.history().undo_count(), 2);
        assert_eq!(store.history().last_action(), Some("second"));

        assert!(store.undo());
        assert_eq!(store.tree().len(), 1);
        assert!(store.undo());
        assert!(store.tree().is_empty());
        assert!(!store.undo());

        assert_eq!(store.history().next_action(), Some("first"));
        assert!(store.redo());
        assert!(store.redo());
        assert_eq!(store.tree().len(), 2);
        assert_eq!(store.history().last_action(), Some("second"));
        assert!(!store.redo());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut store = HistoryStore::default();
        store.apply(LayoutChange::new("first", tree(&["a"])));
        store.undo();
        assert!(store.history().can_redo());
        store.apply(LayoutChange::new("other", tree(&["z"])));
        assert!(!store.history().can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = HistoryStore::default().with_history(History::with_max_size(3));
        for i in 0..10 {
            store.apply(LayoutChange::new(format!("edit {}", i), tree(&["r"])));
        }
        assert_eq!(store.history().undo_count(), 3);
    }

    #[test]
    fn test_default_history_size() {
        let mut history = History::new();
        for i in 0..60 {
            history.push(HistorySnapshot {
                action: i.to_string(),
                layout: FormLayout::default(),
            });
        }
        assert_eq!(history.undo_count(), 50);
        assert_eq!(history.last_action(), Some("59"));
    }
}
