#![forbid(unsafe_code)]

//! Background scroll and interaction blocking.
//!
//! While a trap is live, the background page must not scroll and must be
//! excluded from pointer and assistive-technology interaction (the inert
//! background). The lock captures the page's prior state once and restores
//! that exact state on release, so it composes with hosts that had already
//! altered scroll behavior before the dialog opened.
//!
//! # Invariants
//!
//! - Reference-counted: state is captured on the first `engage` and restored
//!   on the matching final `disengage`, never in between.
//! - `disengage` at depth zero is a no-op, not an error, so teardown paths
//!   may call it unconditionally.

use keytrap_core::{Document, NodeId, Overflow};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct SavedPageState {
    overflow: Overflow,
    inert_root: Option<NodeId>,
}

/// Refcounted lock over the page's scroll and interaction state.
#[derive(Debug, Default)]
pub struct BackgroundLock {
    depth: u32,
    saved: Option<SavedPageState>,
}

impl BackgroundLock {
    /// Create a disengaged lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the lock currently holds the page.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.depth > 0
    }

    /// Block background scroll and mark everything outside `container`'s
    /// subtree inert. Nested calls only deepen the count.
    pub fn engage(&mut self, doc: &mut Document, container: NodeId) {
        if self.depth == 0 {
            self.saved = Some(SavedPageState {
                overflow: doc.overflow(),
                inert_root: doc.inert_root(),
            });
            doc.set_overflow(Overflow::Hidden);
            doc.set_inert_root(Some(container));
            debug!(container = container.id(), "background locked");
        }
        self.depth += 1;
    }

    /// Release one engagement; the final release restores the exact page
    /// state captured by the first `engage`. Safe to call when already
    /// disengaged.
    pub fn disengage(&mut self, doc: &mut Document) {
        match self.depth {
            0 => {}
            1 => {
                self.depth = 0;
                if let Some(saved) = self.saved.take() {
                    doc.set_overflow(saved.overflow);
                    doc.set_inert_root(saved.inert_root);
                }
                debug!("background unlocked");
            }
            _ => self.depth -= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytrap_core::Element;

    fn doc_with_dialog() -> (Document, NodeId) {
        let mut doc = Document::new();
        let dialog = doc.append(doc.body(), Element::new()).unwrap();
        (doc, dialog)
    }

    #[test]
    fn engage_blocks_scroll_and_interaction() {
        let (mut doc, dialog) = doc_with_dialog();
        let outside = doc.append(doc.body(), Element::focusable()).unwrap();
        let mut lock = BackgroundLock::new();

        lock.engage(&mut doc, dialog);
        assert!(lock.is_engaged());
        assert_eq!(doc.overflow(), Overflow::Hidden);
        assert!(!doc.can_interact(outside));

        lock.disengage(&mut doc);
        assert!(!lock.is_engaged());
        assert_eq!(doc.overflow(), Overflow::Auto);
        assert!(doc.can_interact(outside));
    }

    #[test]
    fn restores_prior_state_not_a_default() {
        let (mut doc, dialog) = doc_with_dialog();
        doc.set_overflow(Overflow::Scroll);
        let mut lock = BackgroundLock::new();

        lock.engage(&mut doc, dialog);
        lock.disengage(&mut doc);
        assert_eq!(doc.overflow(), Overflow::Scroll);
    }

    #[test]
    fn double_engage_does_not_corrupt_saved_state() {
        let (mut doc, dialog) = doc_with_dialog();
        doc.set_overflow(Overflow::Visible);
        let mut lock = BackgroundLock::new();

        lock.engage(&mut doc, dialog);
        lock.engage(&mut doc, dialog);
        // First disengage only drops the count.
        lock.disengage(&mut doc);
        assert!(lock.is_engaged());
        assert_eq!(doc.overflow(), Overflow::Hidden);

        lock.disengage(&mut doc);
        assert_eq!(doc.overflow(), Overflow::Visible);
    }

    #[test]
    fn disengage_when_idle_is_noop() {
        let (mut doc, _dialog) = doc_with_dialog();
        doc.set_overflow(Overflow::Scroll);
        let mut lock = BackgroundLock::new();

        lock.disengage(&mut doc);
        assert_eq!(doc.overflow(), Overflow::Scroll);
        assert!(!lock.is_engaged());
    }

    #[test]
    fn preserves_existing_inert_root() {
        let (mut doc, dialog) = doc_with_dialog();
        let other = doc.append(doc.body(), Element::new()).unwrap();
        doc.set_inert_root(Some(other));
        let mut lock = BackgroundLock::new();

        lock.engage(&mut doc, dialog);
        assert_eq!(doc.inert_root(), Some(dialog));

        lock.disengage(&mut doc);
        assert_eq!(doc.inert_root(), Some(other));
    }
}
