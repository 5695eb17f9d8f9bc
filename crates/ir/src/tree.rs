//! The layout tree and addressing within it
//!
//! [`LayoutTree`] is the ordered list of root nodes of a form. It is a value:
//! cloning shares every node, and the mutation helpers here copy only the
//! nodes on the path from the root to the changed list (`Arc::make_mut`), so
//! a previously cloned tree never observes the change.

use crate::node::{ContainerNode, LayoutNode, NodeRef};
use formforge_core::{NodeId, SlotKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Paths
// ============================================================================

/// One edge from a node to one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// `children[index]` (or `roots[index]` for the first step)
    Child(usize),
    /// `<kind>[slot].children[child]`
    Slot {
        kind: SlotKind,
        slot: usize,
        child: usize,
    },
}

impl PathStep {
    /// Index of the node within the list that holds it
    pub fn index(&self) -> usize {
        match *self {
            PathStep::Child(index) => index,
            PathStep::Slot { child, .. } => child,
        }
    }

    /// Depth cost of taking this edge
    pub fn depth_cost(&self) -> usize {
        match self {
            PathStep::Child(_) => 1,
            PathStep::Slot { .. } => 2,
        }
    }

    /// The list in `container` this step indexes into
    fn list_mut<'c>(&self, container: &'c mut ContainerNode) -> Option<&'c mut Vec<NodeRef>> {
        match *self {
            PathStep::Child(_) => Some(&mut container.children),
            PathStep::Slot { kind, slot, .. } => container
                .slots_mut(kind)
                .get_mut(slot)
                .map(|s| &mut s.children),
        }
    }

    fn list<'c>(&self, container: &'c ContainerNode) -> Option<&'c [NodeRef]> {
        match *self {
            PathStep::Child(_) => Some(container.children.as_slice()),
            PathStep::Slot { kind, slot, .. } => {
                container.slots(kind).get(slot).map(|s| s.children.as_slice())
            }
        }
    }
}

/// Full address of a node from the root list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// Path made only of `children` edges
    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.iter().copied().map(PathStep::Child).collect())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Flattened indices (slot edges contribute slot and child index)
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .flat_map(|step| match *step {
                PathStep::Child(index) => vec![index],
                PathStep::Slot { slot, child, .. } => vec![slot, child],
            })
            .collect()
    }

    /// Nesting depth of the addressed node (root items are at depth 0)
    pub fn depth(&self) -> usize {
        self.0.iter().skip(1).map(PathStep::depth_cost).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent, or None for root items
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }
}

impl fmt::Display for NodePath {
    /// Dash-separated indices, e.g. `0-1-2`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.indices().iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join("-"))
    }
}

/// Where to insert within a list of children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertAt {
    /// Append after the last child
    #[default]
    End,
    /// Insert before the child currently at this index (appends if past the end)
    Index(usize),
}

impl InsertAt {
    /// Interpret a signed index where any negative value means "append"
    pub fn from_signed(index: i64) -> Self {
        usize::try_from(index)
            .map(InsertAt::Index)
            .unwrap_or(InsertAt::End)
    }

    /// Resolve against a list of `len` items
    pub fn resolve(&self, len: usize) -> usize {
        match *self {
            InsertAt::End => len,
            InsertAt::Index(index) => index.min(len),
        }
    }
}

impl From<usize> for InsertAt {
    fn from(index: usize) -> Self {
        InsertAt::Index(index)
    }
}

impl From<Option<usize>> for InsertAt {
    fn from(index: Option<usize>) -> Self {
        index.map(InsertAt::Index).unwrap_or(InsertAt::End)
    }
}

// ============================================================================
// NodeLocation
// ============================================================================

/// Result of looking a node up by id
#[derive(Debug, Clone)]
pub struct NodeLocation<'t> {
    /// The node itself
    pub node: &'t LayoutNode,
    /// Its direct parent, None for root items
    pub parent: Option<&'t LayoutNode>,
    /// Index within the list that holds it
    pub index: usize,
    /// Full path from the root list
    pub path: NodePath,
    /// Index of the parent within its own list, None for root items
    pub parent_index: Option<usize>,
    /// Legacy slot holding the node, if it is not in `children`
    pub slot: Option<(SlotKind, usize)>,
}

impl NodeLocation<'_> {
    /// Nesting depth of the node (root items are at depth 0)
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// ============================================================================
// LayoutTree
// ============================================================================

/// Ordered list of root nodes of a form layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTree {
    roots: Vec<NodeRef>,
}

impl LayoutTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree from root nodes
    pub fn from_nodes(nodes: Vec<LayoutNode>) -> Self {
        Self {
            roots: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Root items
    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    /// Number of root items
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order iterator over every node with its depth
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: self.roots.iter().rev().map(|n| (n.as_ref(), 0)).collect(),
        }
    }

    /// Every id in the tree
    pub fn ids(&self) -> HashSet<NodeId> {
        self.iter().map(|(node, _)| node.id().clone()).collect()
    }

    /// Check if a node with this id exists
    pub fn contains(&self, id: &NodeId) -> bool {
        self.locate(id).is_some()
    }

    /// Get a node by id
    pub fn get(&self, id: &NodeId) -> Option<&LayoutNode> {
        self.locate(id).map(|loc| loc.node)
    }

    /// Depth-first pre-order lookup with full ancestry information
    ///
    /// Within a container, `children` are searched before the `tabs`,
    /// `steps`, and `panels` slot arrays.
    pub fn locate(&self, id: &NodeId) -> Option<NodeLocation<'_>> {
        let mut path = Vec::new();
        search_list(&self.roots, ListKind::Root, None, id, &mut path)
    }

    /// Get the node at a path
    pub fn node_at(&self, path: &NodePath) -> Option<&LayoutNode> {
        let (first, rest) = path.steps().split_first()?;
        let PathStep::Child(root_index) = *first else {
            return None;
        };
        let mut node: &LayoutNode = self.roots.get(root_index)?.as_ref();
        for step in rest {
            let list = step.list(node.as_container()?)?;
            node = list.get(step.index())?.as_ref();
        }
        Some(node)
    }

    /// Maximum depth of any node, None for an empty tree
    pub fn max_depth(&self) -> Option<usize> {
        self.iter().map(|(_, depth)| depth).max()
    }

    // ========================================================================
    // Path-copying mutation
    // ========================================================================

    /// Root list, for placement outside any container
    pub(crate) fn roots_mut(&mut self) -> &mut Vec<NodeRef> {
        &mut self.roots
    }

    /// The list that holds the node at `path`, copying nodes along the way
    pub(crate) fn list_mut(&mut self, path: &NodePath) -> Option<&mut Vec<NodeRef>> {
        let (first, rest) = path.steps().split_first()?;
        let PathStep::Child(root_index) = *first else {
            return None;
        };
        let Some((last, middle)) = rest.split_last() else {
            return Some(&mut self.roots);
        };
        let mut node: &mut LayoutNode = Arc::make_mut(self.roots.get_mut(root_index)?);
        for step in middle {
            let list = step.list_mut(node.as_container_mut()?)?;
            node = Arc::make_mut(list.get_mut(step.index())?);
        }
        last.list_mut(node.as_container_mut()?)
    }

    /// The node at `path`, copying nodes along the way
    pub(crate) fn node_mut(&mut self, path: &NodePath) -> Option<&mut LayoutNode> {
        let index = path.steps().last()?.index();
        let list = self.list_mut(path)?;
        list.get_mut(index).map(Arc::make_mut)
    }

    /// Detach the node at `path` and hand back its shared handle
    pub(crate) fn take_at(&mut self, path: &NodePath) -> Option<NodeRef> {
        let index = path.steps().last()?.index();
        let list = self.list_mut(path)?;
        (index < list.len()).then(|| list.remove(index))
    }
}

impl From<Vec<LayoutNode>> for LayoutTree {
    fn from(nodes: Vec<LayoutNode>) -> Self {
        Self::from_nodes(nodes)
    }
}

/// Pre-order iterator produced by [`LayoutTree::iter`]
pub struct TreeIter<'t> {
    stack: Vec<(&'t LayoutNode, usize)>,
}

impl<'t> Iterator for TreeIter<'t> {
    type Item = (&'t LayoutNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if let Some(container) = node.as_container() {
            let mut pending: Vec<(&'t LayoutNode, usize)> = Vec::new();
            pending.extend(container.children.iter().map(|c| (c.as_ref(), depth + 1)));
            for kind in SlotKind::all() {
                for slot in container.slots(kind) {
                    pending.extend(slot.children.iter().map(|c| (c.as_ref(), depth + 2)));
                }
            }
            self.stack.extend(pending.into_iter().rev());
        }
        Some((node, depth))
    }
}

// ============================================================================
// Search
// ============================================================================

#[derive(Clone, Copy)]
enum ListKind {
    Root,
    Children,
    Slot(SlotKind, usize),
}

impl ListKind {
    fn step(self, index: usize) -> PathStep {
        match self {
            ListKind::Root | ListKind::Children => PathStep::Child(index),
            ListKind::Slot(kind, slot) => PathStep::Slot {
                kind,
                slot,
                child: index,
            },
        }
    }
}

fn search_list<'t>(
    nodes: &'t [NodeRef],
    list: ListKind,
    parent: Option<&'t LayoutNode>,
    target: &NodeId,
    path: &mut Vec<PathStep>,
) -> Option<NodeLocation<'t>> {
    for (index, node) in nodes.iter().enumerate() {
        let node: &'t LayoutNode = node.as_ref();
        path.push(list.step(index));

        if node.id() == target {
            let parent_index = path.len().checked_sub(2).map(|i| path[i].index());
            let slot = match list {
                ListKind::Slot(kind, slot) => Some((kind, slot)),
                _ => None,
            };
            return Some(NodeLocation {
                node,
                parent,
                index,
                path: NodePath(path.clone()),
                parent_index,
                slot,
            });
        }

        if let Some(container) = node.as_container() {
            let found = search_list(
                &container.children,
                ListKind::Children,
                Some(node),
                target,
                path,
            );
            if found.is_some() {
                return found;
            }
            for kind in SlotKind::all() {
                for (slot_index, slot) in container.slots(kind).iter().enumerate() {
                    let found = search_list(
                        &slot.children,
                        ListKind::Slot(kind, slot_index),
                        Some(node),
                        target,
                        path,
                    );
                    if found.is_some() {
                        return found;
                    }
                }
            }
        }

        path.pop();
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeSlot;
    use pretty_assertions::assert_eq;

    fn sample() -> LayoutTree {
        LayoutTree::from_nodes(vec![
            LayoutNode::row(
                "r1",
                vec![
                    LayoutNode::column("c1", vec![LayoutNode::component("f1")]),
                    LayoutNode::column(
                        "c2",
                        vec![LayoutNode::component("f2"), LayoutNode::component("f3")],
                    ),
                ],
            ),
            LayoutNode::row("r2", vec![LayoutNode::column("c3", vec![])]),
        ])
    }

    #[test]
    fn test_locate_root_item() {
        let tree = sample();
        let loc = tree.locate(&NodeId::new("r2")).unwrap();
        assert!(loc.is_root());
        assert_eq!(loc.index, 1);
        assert_eq!(loc.parent_index, None);
        assert_eq!(loc.depth(), 0);
        assert_eq!(loc.path.to_string(), "1");
    }

    #[test]
    fn test_locate_nested_item() {
        let tree = sample();
        let loc = tree.locate(&NodeId::new("f3")).unwrap();
        assert_eq!(loc.parent.unwrap().id().as_str(), "c2");
        assert_eq!(loc.index, 1);
        assert_eq!(loc.parent_index, Some(1));
        assert_eq!(loc.path.indices(), vec![0, 1, 1]);
        assert_eq!(loc.depth(), 2);
        assert_eq!(loc.slot, None);
    }

    #[test]
    fn test_locate_missing() {
        assert!(sample().locate(&NodeId::new("ghost")).is_none());
    }

    #[test]
    fn test_locate_inside_slot() {
        let legacy = ContainerNode::new("legacy").with_slot(
            SlotKind::Steps,
            NodeSlot::new("step-1", vec![LayoutNode::component("deep")]),
        );
        let tree = LayoutTree::from_nodes(vec![LayoutNode::Column(legacy)]);
        let loc = tree.locate(&NodeId::new("deep")).unwrap();
        assert_eq!(loc.slot, Some((SlotKind::Steps, 0)));
        assert_eq!(loc.depth(), 2);
        assert_eq!(tree.node_at(&loc.path).unwrap().id().as_str(), "deep");
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = sample();
        let order: Vec<(&str, usize)> = tree
            .iter()
            .map(|(n, d)| (n.id().as_str(), d))
            .collect();
        assert_eq!(
            order,
            vec![
                ("r1", 0),
                ("c1", 1),
                ("f1", 2),
                ("c2", 1),
                ("f2", 2),
                ("f3", 2),
                ("r2", 0),
                ("c3", 1),
            ]
        );
        assert_eq!(tree.node_count(), 8);
        assert_eq!(tree.max_depth(), Some(2));
    }

    #[test]
    fn test_take_at_leaves_clone_untouched() {
        let original = sample();
        let mut edited = original.clone();
        let path = original.locate(&NodeId::new("f2")).unwrap().path;
        let taken = edited.take_at(&path).unwrap();
        assert_eq!(taken.id().as_str(), "f2");
        assert!(original.contains(&NodeId::new("f2")));
        assert!(!edited.contains(&NodeId::new("f2")));
        // Untouched subtrees are still shared
        assert!(Arc::ptr_eq(&original.roots()[1], &edited.roots()[1]));
    }

    #[test]
    fn test_insert_at_resolution() {
        assert_eq!(InsertAt::End.resolve(3), 3);
        assert_eq!(InsertAt::Index(1).resolve(3), 1);
        assert_eq!(InsertAt::Index(9).resolve(3), 3);
        assert_eq!(InsertAt::from_signed(-1), InsertAt::End);
        assert_eq!(InsertAt::from_signed(2), InsertAt::Index(2));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let tree = LayoutTree::from_nodes(vec![LayoutNode::row("r1", vec![])]);
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"[{"type":"row","id":"r1","children":[]}]"#);
    }
}
