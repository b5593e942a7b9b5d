// src/core/extractor.rs
//! Address-bar text capture
//!
//! Given a snapshot root and a browser layout entry, finds the element that
//! holds the address bar and returns its text verbatim. Normalization is the
//! policy layer's job, not this one's.

use crate::core::registry::BrowserConfig;
use crate::core::scanner::scan;
use crate::core::ui_tree::UiNode;

/// All nodes under `root` (inclusive) whose view id equals `view_id`.
///
/// A platform snapshot with a native id index may answer this without a full
/// walk; the generic path uses the scanner.
pub fn find_by_view_id<'a>(root: &'a dyn UiNode, view_id: &str) -> Vec<&'a dyn UiNode> {
    scan(root)
        .filter(|node| node.view_id().as_deref() == Some(view_id))
        .collect()
}

/// Text of the first element matching the browser's address-bar id.
///
/// Returns `None` when no element matches or the matching element currently
/// shows no text. The returned string is untouched; empty text counts as not
/// found.
pub fn capture_address(root: &dyn UiNode, config: &BrowserConfig) -> Option<String> {
    let nodes = find_by_view_id(root, &config.address_bar_id);
    let address_bar = nodes.first()?;
    address_bar.text().filter(|text| !text.is_empty())
}
