// src/core/ui_tree.rs
//! UI-element tree abstraction
//!
//! The platform hands the pipeline a snapshot of the foreground application's
//! UI tree with each notification. The snapshot is only valid for that one
//! pipeline run; dropping it releases whatever the platform holds for it, so
//! RAII replaces the explicit per-node release calls a raw accessibility API
//! would require.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One node in a UI-tree snapshot.
///
/// Child slots may be absent (`None`) even below `child_count()`; callers must
/// skip them rather than fail.
pub trait UiNode {
    /// Number of child slots, including slots that may turn out to be empty.
    fn child_count(&self) -> usize;

    /// Child at `index`, or `None` for an empty slot or out-of-range index.
    fn child(&self, index: usize) -> Option<&dyn UiNode>;

    /// Text currently displayed by this element, if any.
    fn text(&self) -> Option<String>;

    /// Platform resource identifier of this element, if any.
    fn view_id(&self) -> Option<String>;
}

/// Error raised when a snapshot can no longer be read.
///
/// The platform may invalidate a snapshot underneath us (the source window
/// went away mid-event); the pipeline treats this as a transient failure for
/// that one notification.
#[derive(Debug, Clone, Error)]
#[error("ui snapshot unavailable: {reason}")]
pub struct SnapshotError {
    pub reason: String,
}

impl SnapshotError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A snapshot of one application's UI tree, valid for a single pipeline run.
pub trait UiSnapshot {
    /// Root of the tree, or an error if the platform already tore it down.
    fn root(&self) -> Result<&dyn UiNode, SnapshotError>;
}

/// Owned in-memory tree node, used by the replay harness and by tests.
///
/// `children` holds `Option` entries so fixtures can express the null child
/// slots a live accessibility tree produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticNode {
    #[serde(default)]
    pub view_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Option<StaticNode>>,
}

impl StaticNode {
    pub fn new(view_id: Option<&str>, text: Option<&str>) -> Self {
        Self {
            view_id: view_id.map(str::to_string),
            text: text.map(str::to_string),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<StaticNode>) -> Self {
        self.children = children.into_iter().map(Some).collect();
        self
    }
}

impl UiNode for StaticNode {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&dyn UiNode> {
        self.children
            .get(index)
            .and_then(|slot| slot.as_ref())
            .map(|node| node as &dyn UiNode)
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn view_id(&self) -> Option<String> {
        self.view_id.clone()
    }
}

/// Owned snapshot wrapping a [`StaticNode`] tree.
#[derive(Debug, Clone)]
pub struct StaticTree {
    root: StaticNode,
}

impl StaticTree {
    pub fn new(root: StaticNode) -> Self {
        Self { root }
    }
}

impl UiSnapshot for StaticTree {
    fn root(&self) -> Result<&dyn UiNode, SnapshotError> {
        Ok(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_node_exposes_children_and_skips_null_slots() {
        let mut node = StaticNode::new(Some("root"), None)
            .with_children(vec![StaticNode::new(None, Some("a"))]);
        node.children.push(None);
        node.children.push(Some(StaticNode::new(None, Some("b"))));

        assert_eq!(node.child_count(), 3);
        assert_eq!(node.child(0).and_then(|c| c.text()).as_deref(), Some("a"));
        assert!(node.child(1).is_none());
        assert_eq!(node.child(2).and_then(|c| c.text()).as_deref(), Some("b"));
        assert!(node.child(3).is_none());
    }

    #[test]
    fn static_node_deserializes_null_child_slots() {
        let json = r#"{
            "view_id": "root",
            "children": [null, {"text": "hello"}]
        }"#;
        let node: StaticNode = serde_json::from_str(json).expect("valid fixture");
        assert_eq!(node.child_count(), 2);
        assert!(node.child(0).is_none());
        assert_eq!(
            node.child(1).and_then(|c| c.text()).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn static_tree_yields_root() {
        let tree = StaticTree::new(StaticNode::new(Some("root"), None));
        let root = tree.root().expect("static trees are always readable");
        assert_eq!(root.view_id().as_deref(), Some("root"));
    }
}
