//! Form schema definitions
//!
//! [`FormSchema`] is the persisted document: metadata, the layout tree, and
//! the component registry keyed by the tree's component ids.

use crate::registry::{ComponentDefinition, ComponentRegistry};
use crate::tree::LayoutTree;
use chrono::{DateTime, Utc};
use formforge_core::{EngineError, EngineResult, NodeType, Persistable, Validatable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// FormSchema
// ============================================================================

/// A complete form: layout plus component definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Form metadata
    pub meta: FormMeta,

    /// Root items of the layout
    #[serde(default)]
    pub layout: LayoutTree,

    /// Definitions of the layout's components, keyed by node id
    #[serde(default)]
    pub components: ComponentRegistry,

    /// Schema version for migration purposes
    pub schema_version: u32,
}

impl FormSchema {
    /// Create an empty form with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: FormMeta::new(name),
            layout: LayoutTree::new(),
            components: ComponentRegistry::new(),
            schema_version: crate::SCHEMA_VERSION,
        }
    }

    /// Replace the layout and registry together
    pub fn with_layout(mut self, layout: LayoutTree, components: ComponentRegistry) -> Self {
        self.layout = layout;
        self.components = components;
        self
    }

    /// Add a definition to the registry
    pub fn with_component(mut self, definition: ComponentDefinition) -> Self {
        self.components.insert(definition);
        self
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.meta.modified_at = Utc::now();
    }

    /// Check if the form has no layout items
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Drop every layout item and definition (keep metadata)
    pub fn clear(&mut self) {
        self.layout = LayoutTree::new();
        self.components = ComponentRegistry::new();
        self.touch();
    }

    /// Node counts and depth of the layout
    pub fn stats(&self) -> SchemaStats {
        let mut stats = SchemaStats {
            roots: self.layout.len(),
            definitions: self.components.len(),
            max_depth: self.layout.max_depth(),
            ..SchemaStats::default()
        };
        for (node, _) in self.layout.iter() {
            match node.node_type() {
                NodeType::Row => stats.rows += 1,
                NodeType::Column => stats.columns += 1,
                NodeType::Component => stats.components += 1,
            }
        }
        stats
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new("Untitled Form")
    }
}

impl Validatable for FormSchema {
    fn validate(&self) -> EngineResult<()> {
        self.meta.validate()?;
        let report = crate::validation::Validator::with_default_rules().validate(self);
        report.to_result()
    }
}

impl Persistable for FormSchema {
    fn file_extension() -> &'static str {
        crate::SCHEMA_FILE_EXTENSION
    }

    fn schema_version() -> u32 {
        crate::SCHEMA_VERSION
    }
}

// ============================================================================
// FormMeta
// ============================================================================

/// Form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMeta {
    /// Unique form identifier
    pub id: Uuid,

    /// Form name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl FormMeta {
    /// Create new metadata with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validatable for FormMeta {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("Form name cannot be empty"));
        }
        if self.name.len() > 100 {
            return Err(EngineError::validation(
                "Form name too long (max 100 characters)",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SchemaStats
// ============================================================================

/// Summary counts of a form layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStats {
    pub roots: usize,
    pub rows: usize,
    pub columns: usize,
    pub components: usize,
    pub definitions: usize,
    /// Depth of the deepest node, None for an empty layout
    pub max_depth: Option<usize>,
}

impl SchemaStats {
    pub fn total_nodes(&self) -> usize {
        self.rows + self.columns + self.components
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LayoutNode;
    use formforge_core::WidgetType;

    fn sample() -> FormSchema {
        let layout = LayoutTree::from_nodes(vec![LayoutNode::row(
            "r1",
            vec![
                LayoutNode::column("c1", vec![LayoutNode::component("f1")]),
                LayoutNode::column("c2", vec![LayoutNode::component("f2")]),
            ],
        )]);
        let components = vec![
            ComponentDefinition::new("f1", WidgetType::Input),
            ComponentDefinition::new("f2", WidgetType::Email),
        ]
        .into_iter()
        .collect();
        FormSchema::new("Signup").with_layout(layout, components)
    }

    #[test]
    fn test_new_schema() {
        let schema = FormSchema::new("Contact");
        assert_eq!(schema.meta.name, "Contact");
        assert!(schema.is_empty());
        assert_eq!(schema.schema_version, crate::SCHEMA_VERSION);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.rows, 1);
        assert_eq!(stats.columns, 2);
        assert_eq!(stats.components, 2);
        assert_eq!(stats.definitions, 2);
        assert_eq!(stats.max_depth, Some(2));
        assert_eq!(stats.total_nodes(), 5);
    }

    #[test]
    fn test_clear_keeps_meta() {
        let mut schema = sample();
        let id = schema.meta.id;
        schema.clear();
        assert!(schema.is_empty());
        assert!(schema.components.is_empty());
        assert_eq!(schema.meta.id, id);
    }

    #[test]
    fn test_validate() {
        assert!(sample().is_valid());
        let mut unnamed = sample();
        unnamed.meta.name = "  ".to_string();
        assert!(!unnamed.is_valid());
    }

    #[test]
    fn test_persistable_json() {
        let schema = sample();
        let json = schema.to_json().unwrap();
        assert!(json.contains("\"type\": \"row\""));
        let back = FormSchema::from_json(&json).unwrap();
        assert_eq!(back, schema);
    }
}
