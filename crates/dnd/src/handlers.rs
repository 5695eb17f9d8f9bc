//! Drag/drop orchestration
//!
//! [`DropHandler`] turns a (drop target, dragged item) pair into a validated
//! engine call and installs the result in a [`LayoutStore`]. The `try_*`
//! methods return the engine error; the `handle_*` methods are the boundary
//! used by the canvas, logging the error and reporting `false` instead.

use crate::item::DraggedItem;
use crate::store::{LayoutChange, LayoutStore};
use crate::target::{DropTarget, ResolvedDrop};
use formforge_core::{EngineError, EngineResult, NodeId, NodeType};
use formforge_ir::{
    ComponentRegistry, DropValidation, LayoutEngine, LayoutNode, LayoutTree, PaletteItem,
};

/// What a successful drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A palette item was placed
    Created {
        id: NodeId,
        /// Outermost node inserted; differs from `id` when a root drop was wrapped
        inserted: NodeId,
    },
    /// An existing node changed place
    Moved { id: NodeId },
    /// A node was deleted along with its registry entries
    Removed { id: NodeId, definitions_removed: usize },
}

impl DropOutcome {
    /// Id of the dropped node
    pub fn node_id(&self) -> &NodeId {
        match self {
            DropOutcome::Created { id, .. }
            | DropOutcome::Moved { id }
            | DropOutcome::Removed { id, .. } => id,
        }
    }
}

/// Drop orchestration over a [`LayoutEngine`]
#[derive(Debug, Clone, Default)]
pub struct DropHandler {
    engine: LayoutEngine,
}

impl DropHandler {
    pub fn new(engine: LayoutEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    // ========================================================================
    // Drops
    // ========================================================================

    /// Perform a drop, reporting failure as `false`
    pub fn handle_advanced_drop<S: LayoutStore + ?Sized>(
        &self,
        target: &DropTarget,
        item: &DraggedItem,
        store: &mut S,
    ) -> bool {
        match self.try_handle_drop(target, item, store) {
            Ok(outcome) => {
                tracing::debug!("Drop succeeded: {:?}", outcome);
                true
            }
            Err(e) => {
                tracing::warn!("Drop rejected: {}", e);
                false
            }
        }
    }

    /// Perform a drop
    ///
    /// The store is only written once the new tree (and registry, for palette
    /// drops) has been fully computed.
    pub fn try_handle_drop<S: LayoutStore + ?Sized>(
        &self,
        target: &DropTarget,
        item: &DraggedItem,
        store: &mut S,
    ) -> EngineResult<DropOutcome> {
        let resolved = target.resolve(store.tree())?;
        let (change, outcome) = match item {
            DraggedItem::Sidebar(palette) => {
                self.sidebar_drop(store.tree(), store.registry(), palette, &resolved)?
            }
            DraggedItem::Existing { id, .. } => {
                let tree = self.move_existing(store.tree(), id, &resolved)?;
                (
                    LayoutChange::new("move", tree),
                    DropOutcome::Moved { id: id.clone() },
                )
            }
        };
        store.apply(change);
        Ok(outcome)
    }

    fn sidebar_drop(
        &self,
        tree: &LayoutTree,
        registry: &ComponentRegistry,
        palette: &PaletteItem,
        resolved: &ResolvedDrop,
    ) -> EngineResult<(LayoutChange, DropOutcome)> {
        self.check_sidebar_type(palette)?;

        let node = self
            .engine
            .create_component(palette.node_type, palette.props.clone());
        let id = node.id().clone();

        let mut registry = registry.clone();
        if let Some(definition) = palette.instantiate(&id) {
            registry.insert(definition);
        }

        let (tree, inserted) = match &resolved.container {
            None => {
                let node = wrap_for_root(node);
                let inserted = node.id().clone();
                (self.engine.insert_at_root(tree, node, resolved.index)?, inserted)
            }
            Some(container) => (
                self.engine.add_component_to_container(
                    tree,
                    container,
                    node,
                    resolved.index,
                    resolved.tab.as_deref(),
                )?,
                id.clone(),
            ),
        };

        tracing::debug!("Created {} from palette item '{}'", id, palette.key);
        Ok((
            LayoutChange::new("drop", tree).with_registry(registry),
            DropOutcome::Created { id, inserted },
        ))
    }

    fn move_existing(
        &self,
        tree: &LayoutTree,
        id: &NodeId,
        resolved: &ResolvedDrop,
    ) -> EngineResult<LayoutTree> {
        match &resolved.container {
            None => self.engine.move_to_root(tree, id, resolved.index),
            Some(container) => self.engine.move_component(
                tree,
                id,
                container,
                resolved.index,
                resolved.tab.as_deref(),
            ),
        }
    }

    // ========================================================================
    // Trash
    // ========================================================================

    /// Delete the dragged node, reporting failure as `false`
    pub fn handle_advanced_trash_drop<S: LayoutStore + ?Sized>(
        &self,
        item: &DraggedItem,
        store: &mut S,
    ) -> bool {
        match self.try_handle_trash_drop(item, store) {
            Ok(outcome) => {
                tracing::debug!("Trash drop succeeded: {:?}", outcome);
                true
            }
            Err(e) => {
                tracing::warn!("Trash drop rejected: {}", e);
                false
            }
        }
    }

    /// Delete the dragged node and the definitions of every component in it
    pub fn try_handle_trash_drop<S: LayoutStore + ?Sized>(
        &self,
        item: &DraggedItem,
        store: &mut S,
    ) -> EngineResult<DropOutcome> {
        let id = item
            .node_id()
            .ok_or_else(|| EngineError::drop_target("palette items cannot be trashed"))?;

        let mut doomed = store
            .tree()
            .get(id)
            .map(LayoutNode::component_ids)
            .ok_or_else(|| EngineError::not_found(id.clone()))?;
        doomed.insert(id.clone());

        let tree = self.engine.remove_component_from_layout(store.tree(), id)?;
        let mut registry = store.registry().clone();
        let definitions_removed = doomed
            .iter()
            .filter(|doomed_id| registry.remove(doomed_id).is_some())
            .count();

        store.apply(LayoutChange::new("trash", tree).with_registry(registry));
        Ok(DropOutcome::Removed {
            id: id.clone(),
            definitions_removed,
        })
    }

    // ========================================================================
    // Validation-only
    // ========================================================================

    /// Check whether a drop would succeed, without performing it
    ///
    /// Root targets pass the container checks; wrapping happens at drop time.
    pub fn validate_advanced_drop(
        &self,
        target: &DropTarget,
        item: &DraggedItem,
        tree: &LayoutTree,
    ) -> DropValidation {
        match item {
            DraggedItem::Sidebar(palette) => self.validate_sidebar_item_drop(target, palette, tree),
            DraggedItem::Existing { id, .. } => self.validate_component_move(target, id, tree),
        }
    }

    /// Check whether a palette item may be dropped on `target`
    pub fn validate_sidebar_item_drop(
        &self,
        target: &DropTarget,
        palette: &PaletteItem,
        tree: &LayoutTree,
    ) -> DropValidation {
        DropValidation::from_result(self.check_sidebar_drop(target, palette, tree))
    }

    /// Check whether an existing node may be moved to `target`
    pub fn validate_component_move(
        &self,
        target: &DropTarget,
        source_id: &NodeId,
        tree: &LayoutTree,
    ) -> DropValidation {
        DropValidation::from_result(self.check_move(target, source_id, tree))
    }

    fn check_sidebar_drop(
        &self,
        target: &DropTarget,
        palette: &PaletteItem,
        tree: &LayoutTree,
    ) -> EngineResult<()> {
        self.check_sidebar_type(palette)?;
        let resolved = target.resolve(tree)?;
        let Some(container_id) = resolved.container else {
            return Ok(());
        };
        let container = tree
            .get(&container_id)
            .ok_or_else(|| EngineError::not_found(container_id.clone()))?;

        let candidate = self
            .engine
            .create_component(palette.node_type, palette.props.clone());
        self.engine.check_drop(&candidate, container)?;
        self.check_depth(tree, &container_id, 0)
    }

    fn check_move(
        &self,
        target: &DropTarget,
        source_id: &NodeId,
        tree: &LayoutTree,
    ) -> EngineResult<()> {
        let resolved = target.resolve(tree)?;
        let Some(container_id) = resolved.container else {
            return Ok(());
        };
        let source = tree
            .locate(source_id)
            .ok_or_else(|| EngineError::not_found(source_id.clone()))?;
        let container = tree
            .get(&container_id)
            .ok_or_else(|| EngineError::not_found(container_id.clone()))?;

        // Reordering within the same children list never changes its count
        if source.slot.is_none()
            && source
                .parent
                .is_some_and(|parent| parent.id() == &container_id)
        {
            return Ok(());
        }

        self.engine.check_drop(source.node, container)?;
        self.check_depth(tree, &container_id, source.node.height())
    }

    fn check_sidebar_type(&self, palette: &PaletteItem) -> EngineResult<()> {
        if self
            .engine
            .capabilities()
            .sidebar_types()
            .contains(&palette.node_type)
        {
            return Ok(());
        }
        Err(EngineError::drop_target(format!(
            "'{}' cannot be dropped from the palette",
            palette.node_type
        )))
    }

    fn check_depth(
        &self,
        tree: &LayoutTree,
        container_id: &NodeId,
        height: usize,
    ) -> EngineResult<()> {
        let max = self.engine.max_depth();
        let depth = self
            .engine
            .calculate_nesting_depth(tree, container_id)
            .ok_or_else(|| EngineError::not_found(container_id.clone()))?
            + 1
            + height;
        if depth > max {
            return Err(EngineError::DepthExceeded { depth, max });
        }
        Ok(())
    }
}

/// Root items are rows; wrap anything else in a fresh `row > column`
fn wrap_for_root(node: LayoutNode) -> LayoutNode {
    let column = match node.node_type() {
        NodeType::Row => return node,
        NodeType::Column => node,
        NodeType::Component => {
            LayoutNode::column(NodeId::generate(NodeType::Column), vec![node])
        }
    };
    LayoutNode::row(NodeId::generate(NodeType::Row), vec![column])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FormLayout;
    use formforge_core::{SlotKind, WidgetType};
    use formforge_ir::{
        CapabilityDescriptor, CapabilityTable, ComponentDefinition, ContainerNode, EngineConfig,
        InsertAt, NodeSlot,
    };
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn layout() -> FormLayout {
        let tree = LayoutTree::from_nodes(vec![
            LayoutNode::row(
                "r1",
                vec![
                    LayoutNode::column("c1", vec![LayoutNode::component("f1")]),
                    LayoutNode::column("c2", vec![]),
                ],
            ),
            LayoutNode::row("r2", vec![LayoutNode::column("c3", vec![])]),
        ]);
        let registry = std::iter::once(ComponentDefinition::new("f1", WidgetType::Input)).collect();
        FormLayout::new(tree, registry)
    }

    fn input() -> DraggedItem {
        DraggedItem::sidebar(PaletteItem::widget("input", WidgetType::Input))
    }

    #[test]
    fn test_sidebar_drop_into_column() {
        let handler = DropHandler::default();
        let mut store = layout();
        let outcome = handler
            .try_handle_drop(&DropTarget::container("c2", InsertAt::Index(0)), &input(), &mut store)
            .unwrap();
        let DropOutcome::Created { id: new_id, inserted } = outcome else {
            panic!("expected a created outcome");
        };
        assert_eq!(new_id, inserted);
        assert!(store.registry.contains(&new_id));
        let location = store.tree.locate(&new_id).unwrap();
        assert_eq!(location.parent.unwrap().id(), &id("c2"));
        assert_eq!(location.index, 0);
    }

    #[test]
    fn test_sidebar_component_at_root_is_wrapped() {
        let handler = DropHandler::default();
        let mut store = layout();
        let outcome = handler
            .try_handle_drop(&DropTarget::root(InsertAt::End), &input(), &mut store)
            .unwrap();

        let wrapper = store.tree.roots().last().unwrap();
        assert_eq!(wrapper.node_type(), NodeType::Row);
        assert_eq!(wrapper.id(), match &outcome {
            DropOutcome::Created { inserted, .. } => inserted,
            other => panic!("unexpected {:?}", other),
        });
        let column = &wrapper.children()[0];
        assert_eq!(column.node_type(), NodeType::Column);
        assert_eq!(column.children()[0].id(), outcome.node_id());
        assert_eq!(store.tree.len(), 3);
    }

    #[test]
    fn test_sidebar_column_at_root_gets_row() {
        let handler = DropHandler::default();
        let mut store = layout();
        let column = DraggedItem::sidebar(PaletteItem::layout("column", "Column", NodeType::Column));
        let outcome = handler
            .try_handle_drop(&DropTarget::root(InsertAt::Index(0)), &column, &mut store)
            .unwrap();

        let wrapper = &store.tree.roots()[0];
        assert_eq!(wrapper.node_type(), NodeType::Row);
        assert_eq!(wrapper.children()[0].id(), outcome.node_id());
        assert!(wrapper.children()[0].children().is_empty());
        // Layout items are never registered
        assert_eq!(store.registry.len(), 1);
    }

    #[test]
    fn test_sidebar_row_at_root_is_not_wrapped() {
        let handler = DropHandler::default();
        let mut store = layout();
        let row = DraggedItem::sidebar(PaletteItem::layout("row", "Row", NodeType::Row));
        let outcome = handler
            .try_handle_drop(&DropTarget::root(InsertAt::Index(1)), &row, &mut store)
            .unwrap();
        assert_eq!(store.tree.roots()[1].id(), outcome.node_id());
        assert!(store.tree.roots()[1].children().is_empty());
    }

    #[test]
    fn test_rejected_drop_leaves_store_untouched() {
        let handler = DropHandler::default();
        let mut store = layout();
        let before = store.clone();

        // Components cannot go straight into a row
        assert!(!handler.handle_advanced_drop(
            &DropTarget::container("r1", InsertAt::End),
            &input(),
            &mut store
        ));
        // Unknown container
        assert!(!handler.handle_advanced_drop(
            &DropTarget::container("ghost", InsertAt::End),
            &input(),
            &mut store
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_sidebar_types_are_enforced() {
        let mut component = CapabilityDescriptor::component();
        component.accepts_from_sidebar = false;
        let engine = LayoutEngine::with_capabilities(
            CapabilityTable::standard().with(NodeType::Component, component),
        );
        let handler = DropHandler::new(engine);
        let mut store = layout();
        let err = handler
            .try_handle_drop(&DropTarget::container("c2", InsertAt::End), &input(), &mut store)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDropTarget(_)));
    }

    #[test]
    fn test_sidebar_type_validation_matches_drop() {
        let mut component = CapabilityDescriptor::component();
        component.accepts_from_sidebar = false;
        let handler = DropHandler::new(LayoutEngine::with_capabilities(
            CapabilityTable::standard().with(NodeType::Component, component),
        ));
        let mut store = layout();

        for target in [
            DropTarget::container("c1", InsertAt::End),
            DropTarget::root(InsertAt::End),
        ] {
            let validation = handler.validate_advanced_drop(&target, &input(), &store.tree);
            assert!(!validation.is_valid);
            assert!(validation.reason.contains("cannot be dropped from the palette"));
            assert!(!handler.handle_advanced_drop(&target, &input(), &mut store));
        }

        // Layout items are still accepted
        let row = DraggedItem::sidebar(PaletteItem::layout("row", "Row", NodeType::Row));
        let target = DropTarget::root(InsertAt::End);
        assert!(handler.validate_advanced_drop(&target, &row, &store.tree).is_valid);
        assert!(handler.handle_advanced_drop(&target, &row, &mut store));
    }

    #[test]
    fn test_move_into_container() {
        let handler = DropHandler::default();
        let mut store = layout();
        let item = DraggedItem::existing("f1", NodeType::Component);
        assert!(handler.handle_advanced_drop(&DropTarget::container("c3", InsertAt::End), &item, &mut store));
        assert_eq!(store.tree.locate(&id("f1")).unwrap().parent.unwrap().id(), &id("c3"));
        assert!(store.registry.contains(&id("f1")));
    }

    #[test]
    fn test_move_to_root() {
        let handler = DropHandler::default();
        let mut store = layout();
        let item = DraggedItem::existing("r2", NodeType::Row);
        assert!(handler.handle_advanced_drop(&DropTarget::root(InsertAt::Index(0)), &item, &mut store));
        assert_eq!(store.tree.roots()[0].id(), &id("r2"));
        assert_eq!(store.tree.len(), 2);
    }

    #[test]
    fn test_move_with_legacy_path() {
        let handler = DropHandler::default();
        let mut store = layout();
        let item = DraggedItem::existing("f1", NodeType::Component);
        // row 0, column 1, index 0
        assert!(handler.handle_advanced_drop(&DropTarget::Legacy("0-1-0".into()), &item, &mut store));
        assert_eq!(store.tree.locate(&id("f1")).unwrap().parent.unwrap().id(), &id("c2"));
    }

    #[test]
    fn test_trash_component_and_container() {
        let handler = DropHandler::default();
        let mut store = layout();

        let outcome = handler
            .try_handle_trash_drop(&DraggedItem::existing("r1", NodeType::Row), &mut store)
            .unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Removed {
                id: id("r1"),
                definitions_removed: 1
            }
        );
        assert!(!store.tree.contains(&id("f1")));
        assert!(store.registry.is_empty());
    }

    #[test]
    fn test_trash_failures() {
        let handler = DropHandler::default();
        let mut store = layout();
        let before = store.clone();
        assert!(!handler.handle_advanced_trash_drop(&input(), &mut store));
        assert!(!handler.handle_advanced_trash_drop(
            &DraggedItem::existing("ghost", NodeType::Component),
            &mut store
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_validation_only_entry_points() {
        let handler = DropHandler::default();
        let store = layout();
        let tree = &store.tree;

        assert!(handler
            .validate_advanced_drop(&DropTarget::root(InsertAt::End), &input(), tree)
            .is_valid);
        assert!(handler
            .validate_advanced_drop(&DropTarget::container("c2", InsertAt::End), &input(), tree)
            .is_valid);

        let into_row = handler.validate_advanced_drop(&DropTarget::container("r1", InsertAt::End), &input(), tree);
        assert!(!into_row.is_valid);
        assert!(into_row.reason.contains("allowed children are [column]"));

        let cycle = handler.validate_component_move(&DropTarget::container("c1", InsertAt::End), &id("r1"), tree);
        assert!(!cycle.is_valid);

        let missing = handler.validate_component_move(&DropTarget::container("c2", InsertAt::End), &id("ghost"), tree);
        assert!(!missing.is_valid);
        assert!(missing.reason.contains("ghost"));

        // Root moves are always reported valid
        assert!(handler
            .validate_component_move(&DropTarget::root(InsertAt::End), &id("ghost"), tree)
            .is_valid);
    }

    #[test]
    fn test_validate_reorder_in_full_container() {
        let mut column = CapabilityDescriptor::column();
        column.max_children = 1;
        let handler = DropHandler::new(LayoutEngine::with_capabilities(
            CapabilityTable::standard().with(NodeType::Column, column),
        ));
        let store = layout();
        let same_parent = handler.validate_component_move(
            &DropTarget::container("c1", InsertAt::Index(0)),
            &id("f1"),
            &store.tree,
        );
        assert!(same_parent.is_valid);
        let sidebar = handler.validate_sidebar_item_drop(
            &DropTarget::container("c1", InsertAt::End),
            &PaletteItem::widget("input", WidgetType::Input),
            &store.tree,
        );
        assert!(!sidebar.is_valid);
    }

    #[test]
    fn test_validate_move_out_of_slot_checks_capacity() {
        let mut column = CapabilityDescriptor::column();
        column.max_children = 1;
        let handler = DropHandler::new(LayoutEngine::with_capabilities(
            CapabilityTable::standard().with(NodeType::Column, column),
        ));
        let legacy = ContainerNode::new("c")
            .with_children(vec![LayoutNode::component("a")])
            .with_slot(
                SlotKind::Tabs,
                NodeSlot::new("tab-1", vec![LayoutNode::component("b")]),
            );
        let tree = LayoutTree::from_nodes(vec![LayoutNode::row(
            "r",
            vec![LayoutNode::Column(legacy)],
        )]);
        let mut store = FormLayout::new(tree, ComponentRegistry::default());

        let target = DropTarget::container("c", InsertAt::End);
        let validation = handler.validate_component_move(&target, &id("b"), &store.tree);
        assert!(!validation.is_valid);
        let item = DraggedItem::existing("b", NodeType::Component);
        assert!(!handler.handle_advanced_drop(&target, &item, &mut store));

        // Reordering inside `children` is still allowed
        let reorder = handler.validate_component_move(
            &DropTarget::container("c", InsertAt::Index(0)),
            &id("a"),
            &store.tree,
        );
        assert!(reorder.is_valid);
    }

    #[test]
    fn test_validate_depth() {
        let handler = DropHandler::new(LayoutEngine::new(EngineConfig::default().with_max_depth(2)));
        let store = layout();
        let row = DraggedItem::existing("r2", NodeType::Row);
        // r2 (height 1) under c2 (depth 1) would reach depth 3
        let result = handler.validate_advanced_drop(&DropTarget::container("c2", InsertAt::End), &row, &store.tree);
        assert!(!result.is_valid);
        assert!(result.reason.contains("Maximum nesting depth of 2"));
    }
}
