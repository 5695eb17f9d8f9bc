//! Layout node definitions
//!
//! A form layout is a tree of rows, columns, and components. Rows and columns
//! are containers with ordered children; components are leaves whose display
//! configuration lives in the [`ComponentRegistry`](crate::ComponentRegistry).
//!
//! Children are held behind [`Arc`] so trees share structure: cloning a tree is
//! cheap and a mutation copies only the nodes on the path it touches.

use formforge_core::{Identifiable, NodeId, NodeType, SlotKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Free-form node properties (span, alignment, gutter, ...)
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Shared handle to a node inside a tree
pub type NodeRef = Arc<LayoutNode>;

// ============================================================================
// LayoutNode
// ============================================================================

/// A node of the form layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    /// Horizontal container of columns
    Row(ContainerNode),
    /// Vertical container of components and nested rows
    Column(ContainerNode),
    /// Form field backed by a registry entry
    Component(LeafNode),
}

impl LayoutNode {
    /// Create a node of the given type with a freshly generated id
    ///
    /// Container types start with an empty `children` list.
    pub fn create(node_type: NodeType, props: Props) -> Self {
        Self::with_id(NodeId::generate(node_type), node_type, props)
    }

    /// Create a node of the given type with an explicit id
    pub fn with_id(id: impl Into<NodeId>, node_type: NodeType, props: Props) -> Self {
        let id = id.into();
        match node_type {
            NodeType::Row => LayoutNode::Row(ContainerNode::new(id).with_props(props)),
            NodeType::Column => LayoutNode::Column(ContainerNode::new(id).with_props(props)),
            NodeType::Component => LayoutNode::Component(LeafNode { id, props }),
        }
    }

    /// Shorthand for a row with the given children
    pub fn row(id: impl Into<NodeId>, children: Vec<LayoutNode>) -> Self {
        LayoutNode::Row(ContainerNode::new(id).with_children(children))
    }

    /// Shorthand for a column with the given children
    pub fn column(id: impl Into<NodeId>, children: Vec<LayoutNode>) -> Self {
        LayoutNode::Column(ContainerNode::new(id).with_children(children))
    }

    /// Shorthand for a component leaf
    pub fn component(id: impl Into<NodeId>) -> Self {
        LayoutNode::Component(LeafNode {
            id: id.into(),
            props: Props::new(),
        })
    }

    /// Get the node id
    pub fn id(&self) -> &NodeId {
        match self {
            LayoutNode::Row(c) | LayoutNode::Column(c) => &c.id,
            LayoutNode::Component(l) => &l.id,
        }
    }

    /// Get the node type tag
    pub fn node_type(&self) -> NodeType {
        match self {
            LayoutNode::Row(_) => NodeType::Row,
            LayoutNode::Column(_) => NodeType::Column,
            LayoutNode::Component(_) => NodeType::Component,
        }
    }

    /// Get the node properties
    pub fn props(&self) -> &Props {
        match self {
            LayoutNode::Row(c) | LayoutNode::Column(c) => &c.props,
            LayoutNode::Component(l) => &l.props,
        }
    }

    /// Get the node properties mutably
    pub fn props_mut(&mut self) -> &mut Props {
        match self {
            LayoutNode::Row(c) | LayoutNode::Column(c) => &mut c.props,
            LayoutNode::Component(l) => &mut l.props,
        }
    }

    /// Borrow the container part, if this node is a container
    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            LayoutNode::Row(c) | LayoutNode::Column(c) => Some(c),
            LayoutNode::Component(_) => None,
        }
    }

    /// Mutably borrow the container part, if this node is a container
    pub fn as_container_mut(&mut self) -> Option<&mut ContainerNode> {
        match self {
            LayoutNode::Row(c) | LayoutNode::Column(c) => Some(c),
            LayoutNode::Component(_) => None,
        }
    }

    /// Check if this node carries children
    pub fn is_container(&self) -> bool {
        self.as_container().is_some()
    }

    /// Direct children (empty for leaves)
    pub fn children(&self) -> &[NodeRef] {
        self.as_container()
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Check whether `id` names a node anywhere below this one
    ///
    /// Walks `children` and the legacy slot arrays. The node itself does not
    /// count as its own descendant.
    pub fn contains_descendant(&self, id: &NodeId) -> bool {
        let Some(container) = self.as_container() else {
            return false;
        };
        container
            .all_child_lists()
            .flatten()
            .any(|child| child.id() == id || child.contains_descendant(id))
    }

    /// Height of the subtree rooted here, in depth units
    ///
    /// A leaf has height 0; a `children` edge costs 1 and a slot edge costs 2.
    pub fn height(&self) -> usize {
        let Some(container) = self.as_container() else {
            return 0;
        };
        let through_children = container
            .children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0);
        let through_slots = SlotKind::all()
            .into_iter()
            .flat_map(|kind| container.slots(kind))
            .flat_map(|slot| slot.children.iter())
            .map(|c| c.height() + 2)
            .max()
            .unwrap_or(0);
        through_children.max(through_slots)
    }

    /// Collect every id in this subtree, including the node itself
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id().clone());
        if let Some(container) = self.as_container() {
            for child in container.all_child_lists().flatten() {
                child.collect_ids(out);
            }
        }
    }

    /// Collect the ids of every component leaf in this subtree
    pub fn component_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        self.collect_component_ids(&mut ids);
        ids
    }

    fn collect_component_ids(&self, out: &mut HashSet<NodeId>) {
        match self {
            LayoutNode::Component(leaf) => {
                out.insert(leaf.id.clone());
            }
            LayoutNode::Row(c) | LayoutNode::Column(c) => {
                for child in c.all_child_lists().flatten() {
                    child.collect_component_ids(out);
                }
            }
        }
    }
}

impl Identifiable for LayoutNode {
    fn id(&self) -> &NodeId {
        LayoutNode::id(self)
    }
}

/// Structural descendant check between two nodes
///
/// True iff `descendant`'s id occurs anywhere below `ancestor`. Returns false
/// when both carry the same id.
pub fn is_descendant(ancestor: &LayoutNode, descendant: &LayoutNode) -> bool {
    if ancestor.id() == descendant.id() {
        return false;
    }
    ancestor.contains_descendant(descendant.id())
}

// ============================================================================
// ContainerNode
// ============================================================================

/// Body of a row or column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerNode {
    /// Unique identifier
    pub id: NodeId,

    /// Ordered children; order is display order
    #[serde(default)]
    pub children: Vec<NodeRef>,

    /// Legacy tab sub-items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<NodeSlot>,

    /// Legacy step sub-items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<NodeSlot>,

    /// Legacy panel sub-items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<NodeSlot>,

    /// Layout properties
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
}

impl ContainerNode {
    /// Create an empty container
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            tabs: Vec::new(),
            steps: Vec::new(),
            panels: Vec::new(),
            props: Props::new(),
        }
    }

    /// Set the children
    pub fn with_children(mut self, children: Vec<LayoutNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    /// Set the properties
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Add a legacy slot
    pub fn with_slot(mut self, kind: SlotKind, slot: NodeSlot) -> Self {
        self.slots_mut(kind).push(slot);
        self
    }

    /// Legacy slots of the given kind
    pub fn slots(&self, kind: SlotKind) -> &[NodeSlot] {
        match kind {
            SlotKind::Tabs => &self.tabs,
            SlotKind::Steps => &self.steps,
            SlotKind::Panels => &self.panels,
        }
    }

    /// Legacy slots of the given kind, mutably
    pub fn slots_mut(&mut self, kind: SlotKind) -> &mut Vec<NodeSlot> {
        match kind {
            SlotKind::Tabs => &mut self.tabs,
            SlotKind::Steps => &mut self.steps,
            SlotKind::Panels => &mut self.panels,
        }
    }

    /// Check whether any legacy slot array is populated
    pub fn has_slots(&self) -> bool {
        !(self.tabs.is_empty() && self.steps.is_empty() && self.panels.is_empty())
    }

    /// `children` followed by every slot's children
    pub(crate) fn all_child_lists(&self) -> impl Iterator<Item = &[NodeRef]> + '_ {
        std::iter::once(self.children.as_slice()).chain(
            SlotKind::all()
                .into_iter()
                .flat_map(move |kind| self.slots(kind))
                .map(|slot| slot.children.as_slice()),
        )
    }
}

// ============================================================================
// LeafNode / NodeSlot
// ============================================================================

/// Body of a component leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    /// Unique identifier, also the registry key
    pub id: NodeId,

    /// Layout properties
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
}

/// A legacy tab, step, or panel sub-item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSlot {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub children: Vec<NodeRef>,
}

impl NodeSlot {
    pub fn new(id: impl Into<String>, children: Vec<LayoutNode>) -> Self {
        Self {
            id: id.into(),
            title: None,
            children: children.into_iter().map(Arc::new).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> LayoutNode {
        LayoutNode::row(
            "r1",
            vec![
                LayoutNode::column("c1", vec![LayoutNode::component("f1")]),
                LayoutNode::column(
                    "c2",
                    vec![LayoutNode::row(
                        "r2",
                        vec![LayoutNode::column("c3", vec![LayoutNode::component("f2")])],
                    )],
                ),
            ],
        )
    }

    #[test]
    fn test_create_attaches_children_to_containers() {
        let row = LayoutNode::create(NodeType::Row, Props::new());
        assert!(row.is_container());
        assert!(row.children().is_empty());
        assert!(row.id().as_str().starts_with("row_"));

        let field = LayoutNode::create(NodeType::Component, Props::new());
        assert!(!field.is_container());
        assert_eq!(field.node_type(), NodeType::Component);
    }

    #[test]
    fn test_create_merges_props() {
        let mut props = Props::new();
        props.insert("span".into(), serde_json::json!(12));
        let col = LayoutNode::create(NodeType::Column, props);
        assert_eq!(col.props().get("span"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn test_contains_descendant() {
        let tree = sample();
        assert!(tree.contains_descendant(&NodeId::new("f2")));
        assert!(tree.contains_descendant(&NodeId::new("c1")));
        assert!(!tree.contains_descendant(&NodeId::new("r1")));
        assert!(!tree.contains_descendant(&NodeId::new("nope")));
    }

    #[test]
    fn test_is_descendant_same_id_is_false() {
        let tree = sample();
        assert!(!is_descendant(&tree, &tree));
        assert!(is_descendant(&tree, &LayoutNode::component("f1")));
        assert!(!is_descendant(&LayoutNode::component("f1"), &tree));
    }

    #[test]
    fn test_descendant_search_walks_slots() {
        let container = ContainerNode::new("legacy").with_slot(
            SlotKind::Tabs,
            NodeSlot::new("tab-1", vec![LayoutNode::component("inside-tab")]),
        );
        let node = LayoutNode::Column(container);
        assert!(node.contains_descendant(&NodeId::new("inside-tab")));
        assert_eq!(node.height(), 2);
    }

    #[test]
    fn test_height_and_ids() {
        let tree = sample();
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.subtree_ids().len(), 7);
        let components = tree.component_ids();
        assert_eq!(components.len(), 2);
        assert!(components.contains(&NodeId::new("f2")));
    }

    #[test]
    fn test_json_shape() {
        let node = LayoutNode::row("r1", vec![LayoutNode::column("c1", vec![])]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "row",
                "id": "r1",
                "children": [{ "type": "column", "id": "c1", "children": [] }]
            })
        );
        let back: LayoutNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_container_without_children_field_deserializes() {
        let node: LayoutNode =
            serde_json::from_str(r#"{"type":"column","id":"c9"}"#).unwrap();
        assert_eq!(node.child_count(), 0);
    }
}
