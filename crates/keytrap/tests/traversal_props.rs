//! Property-based traversal invariants.
//!
//! For any dialog shape these must hold:
//!
//! 1. Traversal is cyclic: tabbing once per element from the first returns
//!    to the first.
//! 2. Forward then backward is a round trip from any starting element.
//! 3. Focus never leaves the dialog under any traversal key sequence.
//! 4. The resolved sequence respects tab-index classes for arbitrary
//!    index assignments.

use keytrap::{resolve, FocusTrap, KeyOutcome};
use keytrap_core::{Document, Element, KeyCode, KeyEvent, Modifiers, NodeId};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn dialog_with(n: usize) -> (Document, NodeId, Vec<NodeId>, FocusTrap) {
    let mut doc = Document::new();
    let opener = doc.append(doc.body(), Element::focusable()).unwrap();
    doc.focus(opener);
    let dialog = doc.append(doc.body(), Element::new()).unwrap();
    let fields: Vec<NodeId> = (0..n)
        .map(|_| doc.append(dialog, Element::focusable()).unwrap())
        .collect();
    let mut trap = FocusTrap::new();
    trap.activate(&mut doc, dialog, None)
        .expect("activation over an attached container");
    (doc, dialog, fields, trap)
}

fn tab() -> KeyEvent {
    KeyEvent::new(KeyCode::Tab)
}

fn shift_tab() -> KeyEvent {
    KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT)
}

/// One host-side Tab step: the trap consumes boundary wraps; interior moves
/// fall through to native traversal, which steps to the adjacent element.
fn press_tab(doc: &mut Document, trap: &mut FocusTrap, fields: &[NodeId], backward: bool) {
    let event = if backward { shift_tab() } else { tab() };
    if trap.handle_key(doc, &event) == KeyOutcome::Passthrough {
        if let Some(i) = fields.iter().position(|&f| f == doc.active()) {
            let next = if backward { i - 1 } else { i + 1 };
            doc.focus(fields[next]);
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn forward_traversal_is_cyclic(n in 1usize..10) {
        let (mut doc, _dialog, fields, mut trap) = dialog_with(n);
        prop_assert_eq!(doc.active(), fields[0]);

        for step in 0..n {
            prop_assert_eq!(doc.active(), fields[step]);
            press_tab(&mut doc, &mut trap, &fields, false);
        }
        prop_assert_eq!(doc.active(), fields[0]);
    }

    #[test]
    fn backward_traversal_is_cyclic(n in 1usize..10) {
        let (mut doc, _dialog, fields, mut trap) = dialog_with(n);

        press_tab(&mut doc, &mut trap, &fields, true);
        prop_assert_eq!(doc.active(), fields[n - 1]);
        for step in (0..n - 1).rev() {
            press_tab(&mut doc, &mut trap, &fields, true);
            prop_assert_eq!(doc.active(), fields[step]);
        }
    }

    #[test]
    fn forward_then_backward_round_trips(n in 1usize..10, start in 0usize..10) {
        let (mut doc, _dialog, fields, mut trap) = dialog_with(n);
        let start = start % n;
        doc.focus(fields[start]);

        press_tab(&mut doc, &mut trap, &fields, false);
        press_tab(&mut doc, &mut trap, &fields, true);
        prop_assert_eq!(doc.active(), fields[start]);
    }

    #[test]
    fn focus_never_escapes_the_dialog(n in 1usize..8, steps in proptest::collection::vec(any::<bool>(), 0..40)) {
        let (mut doc, dialog, fields, mut trap) = dialog_with(n);

        for backward in steps {
            press_tab(&mut doc, &mut trap, &fields, backward);
            prop_assert!(doc.is_within(doc.active(), dialog));
        }
    }

    #[test]
    fn positive_indexes_sort_before_zero(indexes in proptest::collection::vec(0i32..4, 1..8)) {
        let mut doc = Document::new();
        let dialog = doc.append(doc.body(), Element::new()).unwrap();
        let mut nodes = Vec::new();
        for &tab_index in &indexes {
            nodes.push(doc.append(dialog, Element::new().with_tab_index(tab_index)).unwrap());
        }

        let sequence = resolve(&doc, dialog);
        prop_assert_eq!(sequence.len(), nodes.len());

        // Expected order: positive indexes ascending (stable), then zeros in
        // document order.
        let mut expected: Vec<(i32, usize, NodeId)> = indexes
            .iter()
            .zip(&nodes)
            .enumerate()
            .filter(|&(_, (&t, _))| t > 0)
            .map(|(pos, (&t, &id))| (t, pos, id))
            .collect();
        expected.sort_by_key(|&(t, pos, _)| (t, pos));
        let mut expected: Vec<NodeId> = expected.into_iter().map(|(_, _, id)| id).collect();
        expected.extend(
            indexes
                .iter()
                .zip(&nodes)
                .filter(|&(&t, _)| t == 0)
                .map(|(_, &id)| id),
        );
        prop_assert_eq!(sequence, expected);
    }
}
