// src/core/scanner.rs
//! Pre-order traversal over UI-tree snapshots
//!
//! Live accessibility trees have no useful depth bound, so the walk keeps its
//! own stack instead of recursing. Null child slots are skipped; a node with
//! zero children is simply a leaf.

use tracing::trace;

use crate::core::ui_tree::UiNode;

/// Iterator over every node reachable from a root, pre-order.
///
/// Each node is yielded exactly once, parent before its children.
pub struct TreeScanner<'a> {
    stack: Vec<&'a dyn UiNode>,
}

impl<'a> Iterator for TreeScanner<'a> {
    type Item = &'a dyn UiNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so children come back out in index order.
        for index in (0..node.child_count()).rev() {
            if let Some(child) = node.child(index) {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

/// Walk a tree starting at (and including) `root`.
pub fn scan(root: &dyn UiNode) -> TreeScanner<'_> {
    TreeScanner { stack: vec![root] }
}

/// Hook invoked once per visited node during an observed scan.
///
/// The plain [`scan`] reads nothing from the nodes it yields; diagnostic
/// side-reads live behind this trait instead.
pub trait ScanObserver {
    fn visit(&mut self, node: &dyn UiNode);
}

/// Walk a tree, handing every node to `observer` in visit order.
pub fn scan_with_observer(root: &dyn UiNode, observer: &mut dyn ScanObserver) {
    for node in scan(root) {
        observer.visit(node);
    }
}

/// Observer that logs each node's view id and text at `trace` level.
#[derive(Debug, Default)]
pub struct TraceObserver;

impl ScanObserver for TraceObserver {
    fn visit(&mut self, node: &dyn UiNode) {
        trace!(
            view_id = node.view_id().as_deref().unwrap_or(""),
            text = node.text().as_deref().unwrap_or(""),
            "visited ui node"
        );
    }
}
