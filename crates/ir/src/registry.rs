//! Component registry
//!
//! The layout tree only records where a component sits. Everything needed to
//! render it (label, widget, validation rules, options, styling) lives in a
//! flat side table keyed by the component's node id.

use crate::node::Props;
use crate::tree::LayoutTree;
use formforge_core::{ChoiceOption, Identifiable, NodeId, Validation, WidgetType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ComponentDefinition
// ============================================================================

/// Display and behaviour configuration of one form component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Id of the layout leaf this definition belongs to
    pub id: NodeId,

    /// Widget to render
    pub widget: WidgetType,

    /// Form data key
    pub name: String,

    /// Display label
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Help text shown below the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,

    /// Choices for select/radio/checkbox widgets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    /// Widget-specific extras
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
}

impl ComponentDefinition {
    /// Create a definition with a generated field name and default label
    pub fn new(id: impl Into<NodeId>, widget: WidgetType) -> Self {
        let id = id.into();
        let name = default_field_name(&id, widget);
        Self {
            id,
            widget,
            name,
            label: widget.display_name().to_string(),
            placeholder: None,
            help_text: None,
            required: false,
            validations: widget.default_validations(),
            options: Vec::new(),
            css_class: None,
            default_value: None,
            props: Props::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    /// Mark as required (adds the `Required` rule once)
    pub fn required(mut self) -> Self {
        self.required = true;
        if !self.validations.contains(&Validation::Required) {
            self.validations.insert(0, Validation::Required);
        }
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(ChoiceOption::new(label, value));
        self
    }

    pub fn with_default_value(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Rebind this definition to a different node id
    pub fn rebind(mut self, id: NodeId) -> Self {
        self.name = default_field_name(&id, self.widget);
        self.id = id;
        self
    }
}

impl Identifiable for ComponentDefinition {
    fn id(&self) -> &NodeId {
        &self.id
    }
}

/// `<widget>_<last 6 id chars>`, e.g. `email_3fa9c1`
fn default_field_name(id: &NodeId, widget: WidgetType) -> String {
    let widget_key = serde_json::to_value(widget)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "field".to_string());
    let id = id.as_str();
    let suffix: String = id
        .chars()
        .rev()
        .take(6)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}_{}", widget_key, suffix)
}

// ============================================================================
// ComponentRegistry
// ============================================================================

/// Flat map from component node id to its definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    entries: HashMap<NodeId, ComponentDefinition>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition under its own id, returning any previous entry
    pub fn insert(&mut self, definition: ComponentDefinition) -> Option<ComponentDefinition> {
        self.entries.insert(definition.id.clone(), definition)
    }

    pub fn get(&self, id: &NodeId) -> Option<&ComponentDefinition> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut ComponentDefinition> {
        self.entries.get_mut(id)
    }

    pub fn remove(&mut self, id: &NodeId) -> Option<ComponentDefinition> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.entries.values()
    }

    /// Component leaves in `tree` that have no definition, in tree order
    pub fn missing_definitions(&self, tree: &LayoutTree) -> Vec<NodeId> {
        tree.iter()
            .filter(|(node, _)| node.node_type() == formforge_core::NodeType::Component)
            .map(|(node, _)| node.id())
            .filter(|id| !self.contains(id))
            .cloned()
            .collect()
    }

    /// Definitions whose id does not appear in `tree`, sorted by id
    pub fn orphaned_definitions(&self, tree: &LayoutTree) -> Vec<NodeId> {
        let ids = tree.ids();
        let mut orphans: Vec<NodeId> = self
            .entries
            .keys()
            .filter(|id| !ids.contains(*id))
            .cloned()
            .collect();
        orphans.sort();
        orphans
    }
}

impl FromIterator<ComponentDefinition> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = ComponentDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.insert(definition);
        }
        registry
    }
}

// ============================================================================
// Tests
// ============================================================================
