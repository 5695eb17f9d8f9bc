//! Drop target parsing
//!
//! Two addressing schemes reach the drop handlers:
//!
//! - a legacy positional path such as `"0-1-2"`: every segment but the last
//!   walks root/children indices to the target container, the last segment is
//!   the insertion index, and a single segment is a drop into the root list
//! - a drop zone object naming the container by id, with an optional index
//!   (or a path whose last segment is the index) and an optional slot id
//!
//! Both normalize to [`ResolvedDrop`].

use formforge_core::{EngineError, EngineResult, NodeId};
use formforge_ir::{InsertAt, LayoutTree, NodePath};
use serde::{Deserialize, Serialize};

/// A drop target in either wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DropTarget {
    /// Dash-separated index path, e.g. `"0-1-2"`
    Legacy(String),
    /// Structured drop zone
    Zone(DropZone),
}

/// Structured drop zone descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropZone {
    /// Target container, None (or empty) for the root list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<NodeId>,

    /// Insertion index; negative appends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    /// Dash path whose last segment is used when `index` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_id: Option<String>,
}

/// Normalized drop location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDrop {
    /// Target container, None for the root list
    pub container: Option<NodeId>,
    pub index: InsertAt,
    /// Slot id from `tabId`, `stepId`, or `panelId`
    pub tab: Option<String>,
}

impl ResolvedDrop {
    pub fn is_root(&self) -> bool {
        self.container.is_none()
    }
}

impl DropTarget {
    /// Drop into the root list
    pub fn root(index: InsertAt) -> Self {
        DropTarget::Zone(DropZone {
            index: signed(index),
            ..DropZone::default()
        })
    }

    /// Drop into a container
    pub fn container(id: impl Into<NodeId>, index: InsertAt) -> Self {
        DropTarget::Zone(DropZone {
            container_id: Some(id.into()),
            index: signed(index),
            ..DropZone::default()
        })
    }

    /// Parse a JSON drop zone, a JSON string, or a bare legacy path
    pub fn parse(input: &str) -> EngineResult<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('"') {
            return Ok(serde_json::from_str(trimmed)?);
        }
        Ok(DropTarget::Legacy(trimmed.to_string()))
    }

    /// Normalize against the tree the drop lands in
    pub fn resolve(&self, tree: &LayoutTree) -> EngineResult<ResolvedDrop> {
        let resolved = match self {
            DropTarget::Legacy(path) => resolve_legacy(path, tree)?,
            DropTarget::Zone(zone) => zone.resolve(),
        };
        tracing::debug!(
            "Resolved drop target to {} at {:?}",
            resolved
                .container
                .as_ref()
                .map_or("root", NodeId::as_str),
            resolved.index
        );
        Ok(resolved)
    }
}

impl From<DropZone> for DropTarget {
    fn from(zone: DropZone) -> Self {
        DropTarget::Zone(zone)
    }
}

impl DropZone {
    fn resolve(&self) -> ResolvedDrop {
        let index = match (self.index, self.path.as_deref()) {
            (Some(index), _) => InsertAt::from_signed(index),
            (None, Some(path)) => path
                .rsplit('-')
                .next()
                .and_then(|last| last.trim().parse::<i64>().ok())
                .map_or(InsertAt::End, InsertAt::from_signed),
            (None, None) => InsertAt::End,
        };

        ResolvedDrop {
            container: self
                .container_id
                .clone()
                .filter(|id| !id.as_str().is_empty()),
            index,
            tab: self
                .tab_id
                .clone()
                .or_else(|| self.step_id.clone())
                .or_else(|| self.panel_id.clone()),
        }
    }
}

fn resolve_legacy(path: &str, tree: &LayoutTree) -> EngineResult<ResolvedDrop> {
    let indices = path
        .split('-')
        .map(|segment| segment.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| EngineError::drop_target(format!("malformed path '{}'", path)))?;

    let Some((&index, ancestors)) = indices.split_last() else {
        return Err(EngineError::drop_target("empty path"));
    };

    if ancestors.is_empty() {
        return Ok(ResolvedDrop {
            container: None,
            index: InsertAt::Index(index),
            tab: None,
        });
    }

    let container = tree
        .node_at(&NodePath::from_indices(ancestors))
        .filter(|node| node.is_container())
        .ok_or_else(|| {
            EngineError::drop_target(format!("path '{}' does not lead to a container", path))
        })?;

    Ok(ResolvedDrop {
        container: Some(container.id().clone()),
        index: InsertAt::Index(index),
        tab: None,
    })
}

fn signed(index: InsertAt) -> Option<i64> {
    match index {
        InsertAt::End => None,
        InsertAt::Index(i) => i64::try_from(i).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formforge_ir::LayoutNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree() -> LayoutTree {
        LayoutTree::from_nodes(vec![
            LayoutNode::row("r1", vec![LayoutNode::column("c1", vec![LayoutNode::component("f1")])]),
            LayoutNode::row(
                "r2",
                vec![
                    LayoutNode::column("c2", vec![]),
                    LayoutNode::column("c3", vec![LayoutNode::component("f2")]),
                ],
            ),
        ])
    }

    fn resolve(value: serde_json::Value) -> EngineResult<ResolvedDrop> {
        let target: DropTarget = serde_json::from_value(value)?;
        target.resolve(&tree())
    }

    #[test]
    fn test_legacy_single_segment_is_root() {
        let resolved = resolve(json!("1")).unwrap();
        assert!(resolved.is_root());
        assert_eq!(resolved.index, InsertAt::Index(1));
    }

    #[test]
    fn test_legacy_path_walks_to_container() {
        let resolved = resolve(json!("1-1-0")).unwrap();
        assert_eq!(resolved.container, Some(NodeId::new("c3")));
        assert_eq!(resolved.index, InsertAt::Index(0));

        let resolved = resolve(json!("0-2")).unwrap();
        assert_eq!(resolved.container, Some(NodeId::new("r1")));
        assert_eq!(resolved.index, InsertAt::Index(2));
    }

    #[test]
    fn test_legacy_path_errors() {
        assert!(resolve(json!("0-x")).is_err());
        assert!(resolve(json!("5-0")).is_err());
        // f1 is a leaf
        assert!(resolve(json!("0-0-0-0")).is_err());
        assert!(resolve(json!("")).is_err());
    }

    #[test]
    fn test_zone_with_index_and_tab() {
        let resolved = resolve(json!({"containerId": "c2", "index": 3, "stepId": "s1"})).unwrap();
        assert_eq!(
            resolved,
            ResolvedDrop {
                container: Some(NodeId::new("c2")),
                index: InsertAt::Index(3),
                tab: Some("s1".to_string()),
            }
        );
    }

    #[test]
    fn test_zone_index_from_path() {
        let resolved = resolve(json!({"containerId": "c3", "path": "1-1-4"})).unwrap();
        assert_eq!(resolved.index, InsertAt::Index(4));

        // index wins over path
        let resolved = resolve(json!({"containerId": "c3", "path": "1-1-4", "index": 0})).unwrap();
        assert_eq!(resolved.index, InsertAt::Index(0));
    }

    #[test]
    fn test_zone_negative_or_missing_index_appends() {
        assert_eq!(resolve(json!({"containerId": "c3", "index": -1})).unwrap().index, InsertAt::End);
        assert_eq!(resolve(json!({"containerId": "c3"})).unwrap().index, InsertAt::End);
    }

    #[test]
    fn test_zone_without_container_is_root() {
        assert!(resolve(json!({"index": 0})).unwrap().is_root());
        assert!(resolve(json!({"containerId": "", "index": 0})).unwrap().is_root());
    }

    #[test]
    fn test_tab_precedence() {
        let resolved =
            resolve(json!({"containerId": "c2", "tabId": "t", "stepId": "s", "panelId": "p"}))
                .unwrap();
        assert_eq!(resolved.tab.as_deref(), Some("t"));
    }

    #[test]
    fn test_parse_text_forms() {
        assert_eq!(DropTarget::parse("0-1").unwrap(), DropTarget::Legacy("0-1".to_string()));
        assert_eq!(DropTarget::parse("\"2\"").unwrap(), DropTarget::Legacy("2".to_string()));
        assert_eq!(
            DropTarget::parse(r#"{"containerId":"c1","index":0}"#).unwrap(),
            DropTarget::container("c1", InsertAt::Index(0))
        );
    }

    #[test]
    fn test_constructors() {
        let resolved = DropTarget::root(InsertAt::End).resolve(&tree()).unwrap();
        assert!(resolved.is_root());
        assert_eq!(resolved.index, InsertAt::End);
    }
}
