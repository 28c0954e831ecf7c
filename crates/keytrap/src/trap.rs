#![forbid(unsafe_code)]

//! Focus-trap state machine.
//!
//! The manager owns activation state and coordinates the resolver, the
//! background lock, and the key router. While a session is live, focus is
//! always somewhere inside the trap; on teardown it returns to the element
//! that held focus before activation.
//!
//! # States
//!
//! `Inactive -> Activating -> Active -> Deactivating -> Inactive`. A dismiss
//! request (Escape, or the designated close control) only moves the machine
//! to `Deactivating` and signals the caller; the caller owns the dialog's
//! open flag and completes the transition by calling [`FocusTrap::deactivate`].
//!
//! # Invariants
//!
//! - At most one session is live; re-entrant activation is a no-op against
//!   the live session and never stacks a second router.
//! - Teardown runs on every exit path, including abnormal container removal,
//!   and releases the key listener and background lock exactly once.
//! - The dismiss callback fires at most once per session.
//!
//! # Failure Modes
//!
//! - `deactivate` with a stale handle, or with no live session, is a no-op
//!   returning `false`.
//! - A restoration target that left the document is recovered by focusing
//!   the body; it is never surfaced as an error.

use keytrap_core::{Document, KeyCode, KeyEvent, ListenerToken, NodeId};
use tracing::{debug, warn};

use crate::blocker::BackgroundLock;
use crate::error::TrapError;
use crate::resolver::resolve;
use crate::router::{self, KeyAction};

/// Trap lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapState {
    /// No session; initial and terminal state.
    #[default]
    Inactive,
    /// Activation in progress (transient within `activate`).
    Activating,
    /// Session live; keyboard input routes through the trap.
    Active,
    /// Dismiss requested; waiting for the caller to deactivate.
    Deactivating,
}

/// Why a dismiss was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Escape was pressed.
    EscapeKey,
    /// The designated close control was activated.
    CloseControl,
}

/// Handle identifying one activation. Deactivation with a handle from an
/// earlier session is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapHandle(u64);

/// Outcome of routing one key event through the trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The trap consumed the event; the host must suppress its default
    /// action so native traversal cannot leave the trap.
    Consumed(KeyAction),
    /// Not the trap's concern; default handling may proceed.
    Passthrough,
}

impl KeyOutcome {
    /// Whether the event was consumed by the trap.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed(_))
    }
}

/// Live state of an active trap.
#[derive(Debug)]
pub struct TrapSession {
    id: u64,
    container: NodeId,
    trigger: NodeId,
    sequence: Vec<NodeId>,
    listener: ListenerToken,
}

impl TrapSession {
    /// The dialog container this session guards.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// The element focus returns to on deactivation.
    #[must_use]
    pub const fn trigger(&self) -> NodeId {
        self.trigger
    }

    /// The resolved tab-traversal sequence.
    #[must_use]
    pub fn sequence(&self) -> &[NodeId] {
        &self.sequence
    }
}

type DismissListener = Box<dyn FnMut(DismissReason)>;

/// Focus-trap manager coordinating resolver, blocker, and router.
#[derive(Default)]
pub struct FocusTrap {
    state: TrapState,
    session: Option<TrapSession>,
    lock: BackgroundLock,
    on_dismiss: Option<DismissListener>,
    dismiss_signalled: bool,
    next_session: u64,
}

impl FocusTrap {
    /// Create an inactive trap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> TrapState {
        self.state
    }

    /// Whether a session is live (`Active` or `Deactivating`).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, TrapState::Active | TrapState::Deactivating)
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&TrapSession> {
        self.session.as_ref()
    }

    /// The live session's handle, if any.
    #[must_use]
    pub fn handle(&self) -> Option<TrapHandle> {
        self.session.as_ref().map(|s| TrapHandle(s.id))
    }

    /// Register the dismiss-request callback. The trap reports close
    /// requests through it; whether to actually close stays with the caller.
    pub fn on_dismiss_requested(&mut self, listener: impl FnMut(DismissReason) + 'static) {
        self.on_dismiss = Some(Box::new(listener));
    }

    /// Activate a trap over `container`.
    ///
    /// Captures the restoration target (`trigger_hint`, or whatever holds
    /// focus right now), resolves the focusable sequence, blocks the
    /// background, installs the key router, and places initial focus: the
    /// first sequence element, or the container itself when the sequence is
    /// empty so keyboard users are never stranded outside the trap.
    ///
    /// Re-entrant activation while a session is live is a no-op returning
    /// the live handle.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        container: NodeId,
        trigger_hint: Option<NodeId>,
    ) -> Result<TrapHandle, TrapError> {
        if let Some(session) = &self.session {
            debug!(session = session.id, "activation ignored; session already live");
            return Ok(TrapHandle(session.id));
        }
        if !doc.is_attached(container) {
            return Err(TrapError::EmptyContainer(container));
        }

        self.state = TrapState::Activating;
        let trigger = trigger_hint.unwrap_or_else(|| doc.active());
        let sequence = resolve(doc, container);

        self.lock.engage(doc, container);
        let Some(listener) = doc.install_key_listener() else {
            self.lock.disengage(doc);
            self.state = TrapState::Inactive;
            return Err(TrapError::RouterContended);
        };

        let placed = match sequence.first() {
            Some(&first) => doc.focus(first),
            None => doc.focus(container),
        };
        if !placed {
            warn!(
                container = container.id(),
                "initial focus target unavailable; focusing body"
            );
            doc.blur();
        }

        let id = self.next_session;
        self.next_session += 1;
        self.session = Some(TrapSession {
            id,
            container,
            trigger,
            sequence,
            listener,
        });
        self.dismiss_signalled = false;
        self.state = TrapState::Active;
        debug!(
            session = id,
            container = container.id(),
            trigger = trigger.id(),
            "trap activated"
        );
        Ok(TrapHandle(id))
    }

    /// Route one keyboard event through the trap.
    ///
    /// Traversal keys re-resolve the sequence first, so content added or
    /// removed since activation is honored. Dismiss-class actions move the
    /// machine to `Deactivating` and fire the dismiss callback once; the
    /// session stays live until the caller deactivates.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyEvent) -> KeyOutcome {
        if !self.is_active() {
            return KeyOutcome::Passthrough;
        }
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::Passthrough;
        };

        if matches!(event.code, KeyCode::Tab | KeyCode::BackTab) {
            session.sequence = resolve(doc, session.container);
        }

        let action = router::classify(event, doc, session);
        match action {
            KeyAction::CycleForward => {
                let target = session.sequence.first().copied().unwrap_or(session.container);
                place_focus(doc, target);
                KeyOutcome::Consumed(action)
            }
            KeyAction::CycleBackward => {
                let target = session.sequence.last().copied().unwrap_or(session.container);
                place_focus(doc, target);
                KeyOutcome::Consumed(action)
            }
            KeyAction::Dismiss => {
                self.request_dismiss(DismissReason::EscapeKey);
                KeyOutcome::Consumed(action)
            }
            KeyAction::Activate => {
                self.request_dismiss(DismissReason::CloseControl);
                KeyOutcome::Consumed(action)
            }
            KeyAction::Ignore => KeyOutcome::Passthrough,
        }
    }

    /// Recompute the focusable sequence for the live session.
    pub fn refresh(&mut self, doc: &Document) {
        if let Some(session) = self.session.as_mut() {
            session.sequence = resolve(doc, session.container);
        }
    }

    /// Deactivate the session identified by `handle`.
    ///
    /// Removes the key router, releases the background lock, and restores
    /// focus to the trigger element; a trigger that left the document falls
    /// back to the body. Idempotent: a stale handle or an already-inactive
    /// trap is a no-op returning `false`. Works even when the container was
    /// abnormally removed from the document while the trap was live.
    pub fn deactivate(&mut self, doc: &mut Document, handle: TrapHandle) -> bool {
        match &self.session {
            Some(session) if session.id == handle.0 => {}
            _ => return false,
        }
        self.state = TrapState::Deactivating;
        self.teardown(doc);
        true
    }

    fn request_dismiss(&mut self, reason: DismissReason) {
        if self.dismiss_signalled {
            return;
        }
        self.dismiss_signalled = true;
        self.state = TrapState::Deactivating;
        debug!(?reason, "dismiss requested");
        if let Some(listener) = self.on_dismiss.as_mut() {
            listener(reason);
        }
    }

    fn teardown(&mut self, doc: &mut Document) {
        let Some(session) = self.session.take() else {
            self.state = TrapState::Inactive;
            return;
        };

        doc.remove_key_listener(session.listener);
        self.lock.disengage(doc);

        if !doc.focus(session.trigger) {
            warn!(
                trigger = session.trigger.id(),
                "restoration target unavailable; focusing body"
            );
            doc.blur();
        }

        self.state = TrapState::Inactive;
        debug!(session = session.id, "trap deactivated");
    }
}

fn place_focus(doc: &mut Document, target: NodeId) {
    if !doc.focus(target) {
        warn!(target = target.id(), "focus target unavailable; focusing body");
        doc.blur();
    }
}
