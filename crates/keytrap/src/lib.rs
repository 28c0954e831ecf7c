#![forbid(unsafe_code)]

//! Modal-dialog focus trapping and keyboard interaction.
//!
//! The engine keeps keyboard focus cycling inside an open dialog, blocks
//! background scroll and interaction for the dialog's lifetime, and routes
//! dialog-relevant keys (Escape, Tab wrap-around, Enter/Space on the close
//! control) while everything else passes through. On close, focus returns
//! to the element that opened the dialog.
//!
//! The host document model lives in `keytrap-core`; this crate holds the
//! engine proper:
//!
//! - [`resolver`]: computes the ordered focusable sequence inside a
//!   container.
//! - [`blocker`]: refcounted scroll/interaction lock over the background.
//! - [`router`]: pure classification of key events into trap actions.
//! - [`trap`]: the session state machine tying the pieces together.
//!
//! # Example
//!
//! ```
//! use keytrap::{FocusTrap, KeyOutcome};
//! use keytrap_core::{Document, Element, KeyCode, KeyEvent};
//!
//! let mut doc = Document::new();
//! let opener = doc.append(doc.body(), Element::focusable()).unwrap();
//! let dialog = doc.append(doc.body(), Element::new()).unwrap();
//! let field = doc.append(dialog, Element::focusable()).unwrap();
//! doc.focus(opener);
//!
//! let mut trap = FocusTrap::new();
//! let handle = trap.activate(&mut doc, dialog, None).unwrap();
//! assert_eq!(doc.active(), field);
//!
//! // Escape asks to close; the caller completes the transition.
//! let outcome = trap.handle_key(&mut doc, &KeyEvent::new(KeyCode::Escape));
//! assert!(matches!(outcome, KeyOutcome::Consumed(_)));
//! trap.deactivate(&mut doc, handle);
//! assert_eq!(doc.active(), opener);
//! ```

pub mod blocker;
pub mod error;
pub mod resolver;
pub mod router;
pub mod trap;

pub use blocker::BackgroundLock;
pub use error::TrapError;
pub use resolver::resolve;
pub use router::KeyAction;
pub use trap::{DismissReason, FocusTrap, KeyOutcome, TrapHandle, TrapSession, TrapState};
