//! Speech recognition capability contract
//!
//! This module defines the injected capability the session controller
//! drives:
//! - `Recognizer` / `RecognizerFactory` traits for the platform engine
//! - Event and segment types delivered over the event channel
//! - A deterministic scripted implementation for tests and demos

mod backend;
mod scripted;

pub use backend::{
    Recognizer, RecognizerConfig, RecognizerErrorKind, RecognizerEvent,
    RecognizerFactory, Segment, SegmentBatch,
};
pub use scripted::{ScriptedFactory, ScriptedHandle, ScriptedRecognizer};
