//! Core types used throughout FormForge
//!
//! This module contains the primitive types shared by the layout tree, the
//! component registry, and the drag/drop layer: node identifiers, node type
//! tags, widget kinds, and component validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Node Identifiers
// ============================================================================

/// Opaque identifier of a layout node
///
/// Ids are plain strings on the wire. Generated ids carry a short type prefix
/// followed by a v4 UUID, e.g. `cmp_0f8e...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for a node of the given type
    pub fn generate(node_type: NodeType) -> Self {
        Self(format!(
            "{}_{}",
            node_type.id_prefix(),
            uuid::Uuid::new_v4().simple()
        ))
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Node Types
// ============================================================================

/// Type tag of a layout node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Horizontal container holding columns
    Row,
    /// Vertical container holding components and nested rows
    Column,
    /// Leaf form field, backed by a registry entry
    Component,
}

impl NodeType {
    /// All node types, in display order
    pub fn all() -> [NodeType; 3] {
        [NodeType::Row, NodeType::Column, NodeType::Component]
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Row => "row",
            NodeType::Column => "column",
            NodeType::Component => "component",
        }
    }

    /// Prefix used for generated ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeType::Row => "row",
            NodeType::Column => "col",
            NodeType::Component => "cmp",
        }
    }

    /// Whether nodes of this type carry children
    pub fn is_layout(&self) -> bool {
        matches!(self, NodeType::Row | NodeType::Column)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "row" => Ok(NodeType::Row),
            "column" => Ok(NodeType::Column),
            "component" => Ok(NodeType::Component),
            other => Err(format!("unknown node type '{}'", other)),
        }
    }
}

/// Legacy sub-item arrays that a container may still carry
///
/// No active capability entry creates these, but trees loaded from older
/// schemas can contain them and every walk must descend into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Tabs,
    Steps,
    Panels,
}

impl SlotKind {
    /// All slot kinds, in walk order
    pub fn all() -> [SlotKind; 3] {
        [SlotKind::Tabs, SlotKind::Steps, SlotKind::Panels]
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::Tabs => "tabs",
            SlotKind::Steps => "steps",
            SlotKind::Panels => "panels",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Widget Types
// ============================================================================

/// Kind of input a component renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    /// Single-line text input
    #[default]
    Input,
    /// Multi-line text area
    TextArea,
    /// Numeric input
    Number,
    /// Email input with validation
    Email,
    /// Password input (masked)
    Password,
    /// Phone number input
    Phone,
    /// URL input
    Url,
    /// Dropdown select
    Select,
    /// Multi-select
    MultiSelect,
    /// Checkbox group
    Checkbox,
    /// Radio buttons
    Radio,
    /// Toggle switch
    Switch,
    /// Date picker
    Date,
    /// Time picker
    Time,
    /// Date range picker
    DateRange,
    /// File upload
    Upload,
    /// Rating (stars)
    Rating,
    /// Slider
    Slider,
    /// Static text block
    Paragraph,
    /// Section heading
    Heading,
    /// Horizontal divider
    Divider,
}

impl WidgetType {
    /// Human-readable name shown in the palette
    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetType::Input => "Text Input",
            WidgetType::TextArea => "Text Area",
            WidgetType::Number => "Number",
            WidgetType::Email => "Email",
            WidgetType::Password => "Password",
            WidgetType::Phone => "Phone",
            WidgetType::Url => "URL",
            WidgetType::Select => "Select",
            WidgetType::MultiSelect => "Multi Select",
            WidgetType::Checkbox => "Checkbox",
            WidgetType::Radio => "Radio",
            WidgetType::Switch => "Switch",
            WidgetType::Date => "Date",
            WidgetType::Time => "Time",
            WidgetType::DateRange => "Date Range",
            WidgetType::Upload => "Upload",
            WidgetType::Rating => "Rating",
            WidgetType::Slider => "Slider",
            WidgetType::Paragraph => "Paragraph",
            WidgetType::Heading => "Heading",
            WidgetType::Divider => "Divider",
        }
    }

    /// Whether the widget offers a fixed list of choices
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            WidgetType::Select | WidgetType::MultiSelect | WidgetType::Checkbox | WidgetType::Radio
        )
    }

    /// Whether the widget captures a value (as opposed to static content)
    pub fn is_input(&self) -> bool {
        !matches!(
            self,
            WidgetType::Paragraph | WidgetType::Heading | WidgetType::Divider
        )
    }

    /// Validation rules a freshly dropped widget starts with
    pub fn default_validations(&self) -> Vec<Validation> {
        match self {
            WidgetType::Email => vec![Validation::Email],
            WidgetType::Url => vec![Validation::Url],
            WidgetType::Phone => vec![Validation::Phone],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Validation Rules
// ============================================================================

/// Validation rule attached to a form component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Validation {
    /// Field must have a value
    Required,
    /// Minimum string length
    MinLength { value: usize },
    /// Maximum string length
    MaxLength { value: usize },
    /// Minimum numeric value
    Min { value: f64 },
    /// Maximum numeric value
    Max { value: f64 },
    /// Regex pattern validation
    Pattern { regex: String, message: String },
    /// Valid email address
    Email,
    /// Valid URL
    Url,
    /// Valid phone number
    Phone,
    /// Value must be in a list
    OneOf { values: Vec<String> },
    /// Custom named validator resolved by the host
    Custom { name: String, message: String },
}

impl Validation {
    /// Get a user-friendly error message
    pub fn error_message(&self) -> String {
        match self {
            Validation::Required => "This field is required".to_string(),
            Validation::MinLength { value } => format!("Minimum length is {} characters", value),
            Validation::MaxLength { value } => format!("Maximum length is {} characters", value),
            Validation::Min { value } => format!("Minimum value is {}", value),
            Validation::Max { value } => format!("Maximum value is {}", value),
            Validation::Pattern { message, .. } => message.clone(),
            Validation::Email => "Must be a valid email address".to_string(),
            Validation::Url => "Must be a valid URL".to_string(),
            Validation::Phone => "Must be a valid phone number".to_string(),
            Validation::OneOf { values } => format!("Must be one of: {}", values.join(", ")),
            Validation::Custom { message, .. } => message.clone(),
        }
    }
}

/// A selectable option for select/radio/checkbox widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
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

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = NodeId::generate(NodeType::Component);
        let b = NodeId::generate(NodeType::Component);
        assert!(a.as_str().starts_with("cmp_"));
        assert_ne!(a, b);
        assert!(NodeId::generate(NodeType::Column).as_str().starts_with("col_"));
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let id = NodeId::new("r1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r1\"");
        let back: NodeId = serde_json::from_str("\"r1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_node_type_wire_names() {
        assert_eq!(serde_json::to_string(&NodeType::Column).unwrap(), "\"column\"");
        assert_eq!("Row".parse::<NodeType>().unwrap(), NodeType::Row);
        assert!("tabs".parse::<NodeType>().is_err());
        assert!(NodeType::Row.is_layout());
        assert!(!NodeType::Component.is_layout());
    }

    #[test]
    fn test_widget_defaults() {
        assert_eq!(WidgetType::default(), WidgetType::Input);
        assert!(WidgetType::Radio.has_options());
        assert!(!WidgetType::Divider.is_input());
        assert_eq!(
            WidgetType::Email.default_validations(),
            vec![Validation::Email]
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            Validation::MinLength { value: 3 }.error_message(),
            "Minimum length is 3 characters"
        );
        assert_eq!(
            Validation::OneOf {
                values: vec!["a".into(), "b".into()]
            }
            .error_message(),
            "Must be one of: a, b"
        );
    }

    #[test]
    fn test_validation_serde_shape() {
        let json = serde_json::to_string(&Validation::MaxLength { value: 10 }).unwrap();
        assert_eq!(json, r#"{"rule":"max_length","value":10}"#);
    }
}
