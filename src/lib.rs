pub mod config;
pub mod recognizer;
pub mod session;

pub use config::Config;
pub use recognizer::{
    Recognizer, RecognizerConfig, RecognizerErrorKind, RecognizerEvent, RecognizerFactory,
    ScriptedFactory, ScriptedHandle, ScriptedRecognizer, Segment, SegmentBatch,
};
pub use session::{
    match_done_word, CaptureConfig, SessionState, SessionStats, SilenceTimer,
    VoiceCaptureSession, DEFAULT_SILENCE_TIMEOUT_MS, MAX_SILENCE_TIMEOUT_MS,
    MIN_SILENCE_TIMEOUT_MS,
};
