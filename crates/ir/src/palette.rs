//! Sidebar palette catalog
//!
//! Each palette item describes something the user can drag onto the canvas:
//! a layout container (row, column) or a widget. Dropping a widget item
//! creates a fresh [`ComponentDefinition`] from the item's template.

use crate::node::Props;
use crate::registry::ComponentDefinition;
use formforge_core::{NodeId, NodeType, WidgetType};
use serde::{Deserialize, Serialize};

/// An entry in the sidebar palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteItem {
    /// Stable catalog key, e.g. `"email"`
    pub key: String,

    /// Label shown in the sidebar
    pub label: String,

    /// Type of the node a drop creates
    pub node_type: NodeType,

    /// Widget for component items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetType>,

    /// Layout props applied to the created node
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,

    /// Definition values copied into every created component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<ComponentDefinition>,
}

impl PaletteItem {
    /// Layout container item
    pub fn layout(key: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            node_type,
            widget: None,
            props: Props::new(),
            template: None,
        }
    }

    /// Widget item
    pub fn widget(key: impl Into<String>, widget: WidgetType) -> Self {
        Self {
            key: key.into(),
            label: widget.display_name().to_string(),
            node_type: NodeType::Component,
            widget: Some(widget),
            props: Props::new(),
            template: None,
        }
    }

    /// Use a definition as the template for created components
    pub fn with_template(mut self, template: ComponentDefinition) -> Self {
        self.widget = Some(template.widget);
        self.template = Some(template);
        self
    }

    /// Build the registry entry for a node created from this item
    ///
    /// Returns None for layout items, which are never registered.
    pub fn instantiate(&self, id: &NodeId) -> Option<ComponentDefinition> {
        if self.node_type != NodeType::Component {
            return None;
        }
        let definition = match &self.template {
            Some(template) => template.clone().rebind(id.clone()),
            None => ComponentDefinition::new(id.clone(), self.widget.unwrap_or_default())
                .with_label(self.label.clone()),
        };
        Some(definition)
    }
}

/// The built-in palette: layout items followed by the standard widgets
pub fn default_palette() -> Vec<PaletteItem> {
    let mut items = vec![
        PaletteItem::layout("row", "Row", NodeType::Row),
        PaletteItem::layout("column", "Column", NodeType::Column),
    ];
    items.extend(
        [
            ("input", WidgetType::Input),
            ("textarea", WidgetType::TextArea),
            ("number", WidgetType::Number),
            ("email", WidgetType::Email),
            ("password", WidgetType::Password),
            ("phone", WidgetType::Phone),
            ("select", WidgetType::Select),
            ("checkbox", WidgetType::Checkbox),
            ("radio", WidgetType::Radio),
            ("switch", WidgetType::Switch),
            ("date", WidgetType::Date),
            ("time", WidgetType::Time),
            ("upload", WidgetType::Upload),
            ("rating", WidgetType::Rating),
            ("heading", WidgetType::Heading),
            ("divider", WidgetType::Divider),
        ]
        .into_iter()
        .map(|(key, widget)| PaletteItem::widget(key, widget)),
    );
    items
}

/// Look up a palette item by key
pub fn find_palette_item<'a>(palette: &'a [PaletteItem], key: &str) -> Option<&'a PaletteItem> {
    palette.iter().find(|item| item.key == key)
}
