#![forbid(unsafe_code)]

//! Focusable-set resolution.
//!
//! Given a dialog container, produce the ordered sequence of elements that
//! keyboard traversal may visit inside it. The sequence mirrors standard
//! browser tab order: elements with a positive tab index come first
//! (ascending, stable by document order within equal values), followed by
//! zero-index elements in document order.
//!
//! # Invariants
//!
//! - The result preserves depth-first document order within each ordering
//!   class; it is recomputed, never patched in place.
//! - The container itself is never part of the sequence.
//! - A hidden element suppresses its entire subtree.
//!
//! # Failure Modes
//!
//! - None. A detached container or one without tabbable content yields an
//!   empty sequence, which is a valid result callers must handle.

use keytrap_core::{Document, NodeId};

/// Resolve the tab-traversal sequence inside `container`.
///
/// An element qualifies if it is visible (and under no hidden ancestor
/// within the container), not disabled, and carries a non-negative tab
/// index.
#[must_use]
pub fn resolve(doc: &Document, container: NodeId) -> Vec<NodeId> {
    let mut positive: Vec<(i32, usize, NodeId)> = Vec::new();
    let mut zero: Vec<NodeId> = Vec::new();

    for (position, id) in visible_descendants(doc, container).into_iter().enumerate() {
        let Some(element) = doc.element(id) else {
            continue;
        };
        if element.is_disabled() {
            continue;
        }
        match element.tab_index() {
            Some(0) => zero.push(id),
            Some(t) if t > 0 => positive.push((t, position, id)),
            _ => {}
        }
    }

    positive.sort_by_key(|&(tab, position, _)| (tab, position));

    let mut sequence: Vec<NodeId> = positive.into_iter().map(|(_, _, id)| id).collect();
    sequence.extend(zero);
    sequence
}

/// Depth-first descendants of `container`, pruning hidden subtrees.
fn visible_descendants(doc: &Document, container: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    if !doc.is_attached(container) {
        return out;
    }
    collect_visible(doc, container, &mut out);
    out
}

fn collect_visible(doc: &Document, parent: NodeId, out: &mut Vec<NodeId>) {
    for &id in doc.children(parent) {
        if !doc.element(id).is_some_and(|e| e.is_visible()) {
            continue;
        }
        out.push(id);
        collect_visible(doc, id, out);
    }
}
