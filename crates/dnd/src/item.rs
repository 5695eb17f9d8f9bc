//! The thing being dragged
//!
//! On the wire a drag payload is a flat object whose `type` is either
//! `"sidebarItem"` (a palette entry, carried in `component`) or the type of an
//! existing node (`"row"`, `"column"`, `"component"`, with its `id`).

use formforge_core::{EngineError, NodeId, NodeType};
use formforge_ir::PaletteItem;
use serde::{Deserialize, Serialize};

/// Wire tag of palette drags
pub const SIDEBAR_ITEM_TAG: &str = "sidebarItem";

/// A dragged palette entry or a dragged node already on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DragPayload", into = "DragPayload")]
pub enum DraggedItem {
    /// New item from the sidebar palette
    Sidebar(PaletteItem),

    /// Node already in the tree
    Existing {
        id: NodeId,
        node_type: NodeType,
        /// Legacy dash path of the node at drag start
        path: Option<String>,
    },
}

impl DraggedItem {
    pub fn sidebar(item: PaletteItem) -> Self {
        DraggedItem::Sidebar(item)
    }

    pub fn existing(id: impl Into<NodeId>, node_type: NodeType) -> Self {
        DraggedItem::Existing {
            id: id.into(),
            node_type,
            path: None,
        }
    }

    /// Type of the node that lands on drop
    pub fn node_type(&self) -> NodeType {
        match self {
            DraggedItem::Sidebar(item) => item.node_type,
            DraggedItem::Existing { node_type, .. } => *node_type,
        }
    }

    pub fn is_sidebar(&self) -> bool {
        matches!(self, DraggedItem::Sidebar(_))
    }

    /// Id of an existing node, None for palette drags
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            DraggedItem::Sidebar(_) => None,
            DraggedItem::Existing { id, .. } => Some(id),
        }
    }
}

/// Flat wire shape of [`DraggedItem`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DragPayload {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<PaletteItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl TryFrom<DragPayload> for DraggedItem {
    type Error = EngineError;

    fn try_from(payload: DragPayload) -> Result<Self, Self::Error> {
        if payload.kind == SIDEBAR_ITEM_TAG {
            let item = payload.component.ok_or_else(|| {
                EngineError::drop_target("sidebar drag payload has no component")
            })?;
            return Ok(DraggedItem::Sidebar(item));
        }

        let node_type: NodeType = payload
            .kind
            .parse()
            .map_err(|_| EngineError::drop_target(format!("unknown drag type '{}'", payload.kind)))?;
        let id = payload.id.ok_or_else(|| {
            EngineError::drop_target(format!("dragged {} has no id", node_type))
        })?;
        Ok(DraggedItem::Existing {
            id,
            node_type,
            path: payload.path,
        })
    }
}

impl From<DraggedItem> for DragPayload {
    fn from(item: DraggedItem) -> Self {
        match item {
            DraggedItem::Sidebar(component) => DragPayload {
                kind: SIDEBAR_ITEM_TAG.to_string(),
                id: None,
                component: Some(component),
                path: None,
            },
            DraggedItem::Existing {
                id,
                node_type,
                path,
            } => DragPayload {
                kind: node_type.to_string(),
                id: Some(id),
                component: None,
                path,
            },
        }
    }
}
