#![forbid(unsafe_code)]

//! Host document model and keyboard event types for the keytrap engine.
//!
//! This crate holds everything the trap engine and its host share: the
//! canonical keyboard event vocabulary and a retained element tree with the
//! page-wide state a modal focus trap coordinates (focus, overflow,
//! inertness, the single document-level key listener slot).

pub mod document;
pub mod event;

pub use document::{Document, Element, ListenerToken, NodeId, Overflow};
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
