//! Capability table: what each node type may contain
//!
//! The table is a plain value carried by [`EngineConfig`](crate::EngineConfig)
//! and handed to the engine, so alternate tables (including ones missing
//! entries) can be used without touching shared state.

use formforge_core::NodeType;
use serde::{Deserialize, Serialize};

/// How deep a node type may nest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingLevel {
    /// May hold further containers without a type-specific limit
    Unlimited,
    /// Holds nothing
    Leaf,
}

/// Static capabilities of one node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Types allowed as direct children
    #[serde(default)]
    pub can_contain: Vec<NodeType>,

    /// Whether the type can be dragged in from the palette
    #[serde(default)]
    pub accepts_from_sidebar: bool,

    /// Whether the type carries children
    pub is_container: bool,

    /// Inclusive upper bound on direct children
    #[serde(default)]
    pub max_children: usize,

    /// Inclusive lower bound on direct children
    #[serde(default)]
    pub min_children: usize,

    pub nesting_level: NestingLevel,

    /// Whether a row may hold another row (rows only)
    #[serde(default)]
    pub allows_row_nesting: bool,
}

impl CapabilityDescriptor {
    /// Standard row: holds 1 to 12 columns, no nested rows
    pub fn row() -> Self {
        Self {
            can_contain: vec![NodeType::Column],
            accepts_from_sidebar: true,
            is_container: true,
            max_children: 12,
            min_children: 1,
            nesting_level: NestingLevel::Unlimited,
            allows_row_nesting: false,
        }
    }

    /// Standard column: holds components and rows
    pub fn column() -> Self {
        Self {
            can_contain: vec![NodeType::Component, NodeType::Row],
            accepts_from_sidebar: true,
            is_container: true,
            max_children: 50,
            min_children: 0,
            nesting_level: NestingLevel::Unlimited,
            allows_row_nesting: false,
        }
    }

    /// Standard component: a leaf
    pub fn component() -> Self {
        Self {
            can_contain: Vec::new(),
            accepts_from_sidebar: true,
            is_container: false,
            max_children: 0,
            min_children: 0,
            nesting_level: NestingLevel::Leaf,
            allows_row_nesting: false,
        }
    }

    /// Check whether `child` may be a direct child
    pub fn can_contain(&self, child: NodeType) -> bool {
        if !self.is_container {
            return false;
        }
        self.can_contain.contains(&child) || (child == NodeType::Row && self.allows_row_nesting)
    }

    /// Check whether one more child fits after `current` children
    pub fn has_room_for(&self, current: usize) -> bool {
        current < self.max_children
    }

    /// Allowed child types as a comma-separated list
    pub fn allowed_list(&self) -> String {
        self.can_contain
            .iter()
            .map(NodeType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Capability descriptors keyed by node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<CapabilityDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<CapabilityDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<CapabilityDescriptor>,
}

impl CapabilityTable {
    /// The standard row / column / component table
    pub fn standard() -> Self {
        Self {
            row: Some(CapabilityDescriptor::row()),
            column: Some(CapabilityDescriptor::column()),
            component: Some(CapabilityDescriptor::component()),
        }
    }

    /// A table with no descriptors
    pub fn empty() -> Self {
        Self {
            row: None,
            column: None,
            component: None,
        }
    }

    /// Descriptor for a type, if registered
    pub fn get(&self, node_type: NodeType) -> Option<&CapabilityDescriptor> {
        match node_type {
            NodeType::Row => self.row.as_ref(),
            NodeType::Column => self.column.as_ref(),
            NodeType::Component => self.component.as_ref(),
        }
    }

    /// Replace the descriptor for a type
    pub fn with(mut self, node_type: NodeType, descriptor: CapabilityDescriptor) -> Self {
        *self.slot_mut(node_type) = Some(descriptor);
        self
    }

    /// Remove the descriptor for a type
    pub fn without(mut self, node_type: NodeType) -> Self {
        *self.slot_mut(node_type) = None;
        self
    }

    fn slot_mut(&mut self, node_type: NodeType) -> &mut Option<CapabilityDescriptor> {
        match node_type {
            NodeType::Row => &mut self.row,
            NodeType::Column => &mut self.column,
            NodeType::Component => &mut self.component,
        }
    }

    /// Check whether `parent` may directly hold `child`
    pub fn can_contain(&self, parent: NodeType, child: NodeType) -> bool {
        self.get(parent).is_some_and(|d| d.can_contain(child))
    }

    /// Types that may be dragged in from the palette
    pub fn sidebar_types(&self) -> Vec<NodeType> {
        NodeType::all()
            .into_iter()
            .filter(|t| self.get(*t).is_some_and(|d| d.accepts_from_sidebar))
            .collect()
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Tests
// ============================================================================
