#![forbid(unsafe_code)]

//! Key event classification.
//!
//! A pure mapping from a keyboard event plus the live session state to a
//! trap action. Classification never mutates anything; the manager applies
//! the resulting action.
//!
//! # Invariants
//!
//! - Escape classifies as `Dismiss` regardless of which element holds focus.
//! - Traversal wraps: Tab on the last sequence element cycles to the first,
//!   Shift+Tab on the first cycles to the last.
//! - Tab between interior elements is left to native traversal (`Ignore`),
//!   which by construction stays inside the trap.

use keytrap_core::{Document, KeyCode, KeyEvent, KeyEventKind};

use crate::trap::TrapSession;

/// Action derived from one keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Wrap focus to the first element of the sequence.
    CycleForward,
    /// Wrap focus to the last element of the sequence.
    CycleBackward,
    /// The user asked to close the dialog.
    Dismiss,
    /// The designated action control was triggered.
    Activate,
    /// Not the trap's concern; let default handling proceed.
    Ignore,
}

/// Classify a keyboard event against the live session.
#[must_use]
pub fn classify(event: &KeyEvent, doc: &Document, session: &TrapSession) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    match event.code {
        KeyCode::Escape => KeyAction::Dismiss,
        KeyCode::Tab | KeyCode::BackTab => {
            if event.has_command_modifier() {
                return KeyAction::Ignore;
            }
            let backward = event.code == KeyCode::BackTab || event.shift();
            classify_traversal(doc, session, backward)
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let on_action_control = doc
                .element(doc.active())
                .is_some_and(|e| e.is_action_control());
            if on_action_control {
                KeyAction::Activate
            } else {
                KeyAction::Ignore
            }
        }
        _ => KeyAction::Ignore,
    }
}

fn classify_traversal(doc: &Document, session: &TrapSession, backward: bool) -> KeyAction {
    let sequence = session.sequence();
    let position = sequence.iter().position(|&id| id == doc.active());

    match (backward, position) {
        // Focus outside the sequence (empty set, or content changed under
        // us): cycling pulls focus back in rather than letting it escape.
        (false, None) => KeyAction::CycleForward,
        (true, None) => KeyAction::CycleBackward,
        (false, Some(i)) if i + 1 == sequence.len() => KeyAction::CycleForward,
        (true, Some(0)) => KeyAction::CycleBackward,
        (_, Some(_)) => KeyAction::Ignore,
    }
}
