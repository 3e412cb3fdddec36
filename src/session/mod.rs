//! Voice capture session management
//!
//! This module provides the `VoiceCaptureSession` abstraction that manages:
//! - Transcript accumulation from recognizer result batches
//! - Silence debouncing to decide when an utterance is done
//! - Done-word detection and stripping for immediate submission
//! - The finalize/stop lifecycle and its callback emissions

mod config;
mod matcher;
mod session;
mod stats;
mod timer;

pub use config::{
    CaptureConfig, DEFAULT_SILENCE_TIMEOUT_MS, MAX_SILENCE_TIMEOUT_MS, MIN_SILENCE_TIMEOUT_MS,
};
pub use matcher::match_done_word;
pub use session::{SessionState, VoiceCaptureSession};
pub use stats::SessionStats;
pub use timer::SilenceTimer;
