use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A single unit of speech recognition output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Recognized text for this segment
    pub text: String,
    /// Whether the engine has committed this text (stable, won't be revised)
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl Segment {
    /// Committed text that will not be revised
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    /// Speculative in-progress text that may still change
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Incremental batch of segments delivered by one result event
///
/// The engine resumes delivery from `resume_index`, so `segments` only
/// contains what is new since the previous batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentBatch {
    pub resume_index: usize,
    pub segments: Vec<Segment>,
}

impl SegmentBatch {
    pub fn new(resume_index: usize, segments: Vec<Segment>) -> Self {
        Self {
            resume_index,
            segments,
        }
    }
}

/// Error kinds reported by the recognition engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerErrorKind {
    /// No speech was detected before the engine gave up
    NoSpeech,
    /// Recognition was aborted by request
    Aborted,
    /// Audio capture failed (no microphone, device error)
    AudioCapture,
    /// Network failure while talking to the recognition service
    Network,
    /// Permission to use the capability was denied
    NotAllowed,
    /// Any other engine-specific error code
    Other(String),
}

impl RecognizerErrorKind {
    /// Errors that require no state change: the engine simply had nothing
    /// to report, or we asked it to abort ourselves.
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            RecognizerErrorKind::NoSpeech | RecognizerErrorKind::Aborted
        )
    }
}

impl std::fmt::Display for RecognizerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognizerErrorKind::NoSpeech => write!(f, "no-speech"),
            RecognizerErrorKind::Aborted => write!(f, "aborted"),
            RecognizerErrorKind::AudioCapture => write!(f, "audio-capture"),
            RecognizerErrorKind::Network => write!(f, "network"),
            RecognizerErrorKind::NotAllowed => write!(f, "not-allowed"),
            RecognizerErrorKind::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Lifecycle and result events emitted by a recognizer instance
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// The capability confirmed it is capturing
    Started,
    /// An incremental batch of recognized segments
    Result(SegmentBatch),
    /// The engine reported an error
    Error(RecognizerErrorKind),
    /// The capability ended on its own (e.g. platform-enforced timeout)
    Ended,
}

/// Configuration handed to the recognizer on creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Keep capturing across utterances instead of stopping after the first
    pub continuous: bool,
    /// Deliver speculative interim segments in addition to final ones
    pub interim_results: bool,
    /// BCP 47 locale tag passed through to the engine
    pub locale: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            locale: "en-US".to_string(),
        }
    }
}

/// Speech recognition capability trait
///
/// Implementations wrap a platform engine. The real engine lives outside
/// this crate; `ScriptedRecognizer` provides a deterministic stand-in for
/// tests and demos.
pub trait Recognizer: Send {
    /// Request capture start
    ///
    /// Returns a channel receiver that will receive recognizer events.
    /// May fail synchronously; the session treats that as a start failure.
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<RecognizerEvent>>;

    /// Request capture stop
    ///
    /// Callers must tolerate and swallow errors during teardown.
    fn stop(&mut self) -> Result<()>;

    /// Abort capture, discarding anything in flight
    ///
    /// Callers must tolerate and swallow errors during teardown.
    fn abort(&mut self) -> Result<()>;
}

/// Creates recognizer instances and reports capability availability
///
/// The session creates a fresh instance for every listening period, so the
/// factory is the long-lived injection point.
pub trait RecognizerFactory: Send {
    /// Whether the speech capability is available in this environment
    fn is_supported(&self) -> bool;

    /// Create a recognizer configured for one listening period
    fn create(&self, config: &RecognizerConfig) -> Result<Box<dyn Recognizer>>;
}
