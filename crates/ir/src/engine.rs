//! Tree query and mutation engine
//!
//! [`LayoutEngine`] answers lookups and validation questions about a
//! [`LayoutTree`] and produces new trees for insert, remove, and move. Every
//! mutator takes the caller's tree by reference and returns a new value; on
//! error nothing is returned and the caller's tree is untouched.
//!
//! Checks run in a fixed order and stop at the first failure:
//! node lookup, capability descriptor, allowed child type, capacity, cycle,
//! id uniqueness, nesting depth.

use crate::capability::CapabilityTable;
use crate::config::EngineConfig;
use crate::node::{LayoutNode, NodeRef, Props};
use crate::tree::{InsertAt, LayoutTree, NodeLocation};
use formforge_core::{EngineError, EngineResult, NodeId, NodeType};
use std::sync::Arc;

// ============================================================================
// Check results
// ============================================================================

/// Outcome of a drop check, for live "can drop here" feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropValidation {
    pub is_valid: bool,
    pub reason: String,
}

impl DropValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: "Valid drop".to_string(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }

    /// Collapse a checked result into a validation record
    pub fn from_result(result: EngineResult<()>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(e) => Self::invalid(e.to_string()),
        }
    }
}

/// Outcome of a nesting depth check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthValidation {
    pub is_valid: bool,
    pub reason: String,
    /// Depth of the target container, None if it was not found
    pub current_depth: Option<usize>,
    pub max_depth: usize,
    /// Depth a new child would land at, None if the container was not found
    pub new_depth: Option<usize>,
}

/// Outcome of a parent/child type check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCompatibility {
    pub is_valid: bool,
    pub reason: String,
    pub allowed_types: Vec<NodeType>,
}

// ============================================================================
// LayoutEngine
// ============================================================================

/// Validated queries and mutations over layout trees
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: EngineConfig,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine with default settings and a custom capability table
    pub fn with_capabilities(capabilities: CapabilityTable) -> Self {
        Self::new(EngineConfig::default().with_capabilities(capabilities))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.config.capabilities
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Find a node by id, with its parent, index, and path
    pub fn find_component_by_id<'t>(
        &self,
        tree: &'t LayoutTree,
        id: &NodeId,
    ) -> Option<NodeLocation<'t>> {
        tree.locate(id)
    }

    /// Find a container that exists and may hold `node_type`
    pub fn find_valid_parent_container<'t>(
        &self,
        tree: &'t LayoutTree,
        container_id: &NodeId,
        node_type: NodeType,
    ) -> Option<NodeLocation<'t>> {
        let location = tree.locate(container_id)?;
        self.capabilities()
            .can_contain(location.node.node_type(), node_type)
            .then_some(location)
    }

    /// Depth of a node (root items are at depth 0), None if absent
    pub fn calculate_nesting_depth(&self, tree: &LayoutTree, id: &NodeId) -> Option<usize> {
        tree.locate(id).map(|location| location.depth())
    }

    /// Structural descendant check, see [`crate::node::is_descendant`]
    pub fn is_descendant(&self, ancestor: &LayoutNode, descendant: &LayoutNode) -> bool {
        crate::node::is_descendant(ancestor, descendant)
    }

    /// Build a new node with a fresh id
    pub fn create_component(&self, node_type: NodeType, props: Props) -> LayoutNode {
        if self.capabilities().get(node_type).is_none() {
            tracing::warn!("Creating '{}' node without a capability descriptor", node_type);
        }
        LayoutNode::create(node_type, props)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check whether `source` may be dropped into `target`
    pub fn validate_drop(&self, source: &LayoutNode, target: &LayoutNode) -> DropValidation {
        DropValidation::from_result(self.check_drop(source, target))
    }

    /// Like [`validate_drop`](Self::validate_drop), as a `Result`
    pub fn check_drop(&self, source: &LayoutNode, target: &LayoutNode) -> EngineResult<()> {
        let target_type = target.node_type();
        let descriptor = self
            .capabilities()
            .get(target_type)
            .ok_or(EngineError::MissingCapability(target_type))?;

        if !descriptor.can_contain(source.node_type()) {
            return Err(EngineError::CapabilityViolation {
                parent: target_type,
                child: source.node_type(),
                allowed: descriptor.allowed_list(),
            });
        }

        if !descriptor.has_room_for(target.child_count()) {
            return Err(EngineError::CapacityExceeded {
                container: target.id().clone(),
                max: descriptor.max_children,
            });
        }

        if source.id() == target.id() || source.contains_descendant(target.id()) {
            return Err(EngineError::CycleViolation {
                source_id: source.id().clone(),
                target: target.id().clone(),
            });
        }

        Ok(())
    }

    /// Check whether a new `node_type` child of `container_id` stays within `max_depth`
    pub fn validate_nesting_depth(
        &self,
        tree: &LayoutTree,
        container_id: &NodeId,
        node_type: NodeType,
        max_depth: usize,
    ) -> DepthValidation {
        let Some(current_depth) = self.calculate_nesting_depth(tree, container_id) else {
            return DepthValidation {
                is_valid: false,
                reason: format!("Container {} not found", container_id),
                current_depth: None,
                max_depth,
                new_depth: None,
            };
        };

        let new_depth = current_depth + 1;
        let (is_valid, reason) = if new_depth > max_depth {
            (
                false,
                format!(
                    "Adding a {} at depth {} exceeds the maximum nesting depth of {}",
                    node_type, new_depth, max_depth
                ),
            )
        } else {
            (true, "Nesting depth is within limits".to_string())
        };

        DepthValidation {
            is_valid,
            reason,
            current_depth: Some(current_depth),
            max_depth,
            new_depth: Some(new_depth),
        }
    }

    /// Pure capability lookup: may `parent` directly hold `child`?
    pub fn validate_type_compatibility(
        &self,
        parent: NodeType,
        child: NodeType,
    ) -> TypeCompatibility {
        let Some(descriptor) = self.capabilities().get(parent) else {
            return TypeCompatibility {
                is_valid: false,
                reason: format!("No capability descriptor for node type '{}'", parent),
                allowed_types: Vec::new(),
            };
        };

        let mut allowed_types = descriptor.can_contain.clone();
        if descriptor.allows_row_nesting && !allowed_types.contains(&NodeType::Row) {
            allowed_types.push(NodeType::Row);
        }

        if descriptor.can_contain(child) {
            TypeCompatibility {
                is_valid: true,
                reason: format!("'{}' can be placed in '{}'", child, parent),
                allowed_types,
            }
        } else if allowed_types.is_empty() {
            TypeCompatibility {
                is_valid: false,
                reason: format!("'{}' cannot contain children", parent),
                allowed_types,
            }
        } else {
            TypeCompatibility {
                is_valid: false,
                reason: format!(
                    "'{}' can only contain: {}",
                    parent,
                    descriptor.allowed_list()
                ),
                allowed_types,
            }
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `node` into a container, returning the new tree
    ///
    /// `index` past the end appends. `tab_id` addresses a legacy slot; no
    /// active capability entry defines slot containers, so it is ignored.
    pub fn add_component_to_container(
        &self,
        tree: &LayoutTree,
        container_id: &NodeId,
        node: LayoutNode,
        index: InsertAt,
        tab_id: Option<&str>,
    ) -> EngineResult<LayoutTree> {
        let mut next = tree.clone();
        self.insert_into(&mut next, container_id, Arc::new(node), index, tab_id)?;
        Ok(next)
    }

    /// Remove a node (and its subtree), returning the new tree
    pub fn remove_component_from_layout(
        &self,
        tree: &LayoutTree,
        id: &NodeId,
    ) -> EngineResult<LayoutTree> {
        let mut next = tree.clone();
        self.detach(&mut next, id)?;
        Ok(next)
    }

    /// Move a node, children and id intact, into another container
    pub fn move_component(
        &self,
        tree: &LayoutTree,
        source_id: &NodeId,
        target_container_id: &NodeId,
        index: InsertAt,
        tab_id: Option<&str>,
    ) -> EngineResult<LayoutTree> {
        let source = tree
            .get(source_id)
            .ok_or_else(|| EngineError::not_found(source_id.clone()))?;
        if source.id() == target_container_id || source.contains_descendant(target_container_id) {
            return Err(EngineError::CycleViolation {
                source_id: source_id.clone(),
                target: target_container_id.clone(),
            });
        }

        let mut next = tree.clone();
        let node = self.detach(&mut next, source_id)?;
        self.insert_into(&mut next, target_container_id, node, index, tab_id)?;
        Ok(next)
    }

    /// Insert a node into the root list
    ///
    /// The root list is not a capability-governed container, so only id
    /// uniqueness is checked.
    pub fn insert_at_root(
        &self,
        tree: &LayoutTree,
        node: LayoutNode,
        index: InsertAt,
    ) -> EngineResult<LayoutTree> {
        let mut next = tree.clone();
        self.ensure_unique(&next, &node)?;
        let roots = next.roots_mut();
        let at = index.resolve(roots.len());
        roots.insert(at, Arc::new(node));
        tracing::debug!("Inserted root item at index {}", at);
        Ok(next)
    }

    /// Move a node into the root list
    pub fn move_to_root(
        &self,
        tree: &LayoutTree,
        source_id: &NodeId,
        index: InsertAt,
    ) -> EngineResult<LayoutTree> {
        let mut next = tree.clone();
        let node = self.detach(&mut next, source_id)?;
        let roots = next.roots_mut();
        let at = index.resolve(roots.len());
        roots.insert(at, node);
        tracing::debug!("Moved {} to root index {}", source_id, at);
        Ok(next)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn detach(&self, tree: &mut LayoutTree, id: &NodeId) -> EngineResult<NodeRef> {
        let path = tree
            .locate(id)
            .map(|location| location.path)
            .ok_or_else(|| EngineError::not_found(id.clone()))?;
        let node = tree
            .take_at(&path)
            .ok_or_else(|| EngineError::internal(format!("path {} did not resolve", path)))?;
        tracing::debug!("Detached {} from {}", id, path);
        Ok(node)
    }

    fn insert_into(
        &self,
        tree: &mut LayoutTree,
        container_id: &NodeId,
        node: NodeRef,
        index: InsertAt,
        tab_id: Option<&str>,
    ) -> EngineResult<()> {
        let location = tree
            .locate(container_id)
            .ok_or_else(|| EngineError::not_found(container_id.clone()))?;

        self.check_drop(&node, location.node)?;
        self.ensure_unique(tree, &node)?;

        let deepest = location.depth() + 1 + node.height();
        if deepest > self.config.max_depth {
            return Err(EngineError::DepthExceeded {
                depth: deepest,
                max: self.config.max_depth,
            });
        }

        if let Some(tab_id) = tab_id {
            tracing::debug!(
                "Ignoring slot '{}' for {}: no slot containers are configured",
                tab_id,
                container_id
            );
        }

        let path = location.path;
        let container = tree
            .node_mut(&path)
            .and_then(LayoutNode::as_container_mut)
            .ok_or_else(|| EngineError::internal(format!("{} is not a container", container_id)))?;
        let at = index.resolve(container.children.len());
        let node_id = node.id().clone();
        container.children.insert(at, node);
        tracing::debug!("Inserted {} into {} at index {}", node_id, container_id, at);
        Ok(())
    }

    fn ensure_unique(&self, tree: &LayoutTree, node: &LayoutNode) -> EngineResult<()> {
        let existing = tree.ids();
        match node.subtree_ids().into_iter().find(|id| existing.contains(id)) {
            Some(duplicate) => Err(EngineError::DuplicateNode(duplicate)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
