use serde::{Deserialize, Serialize};

/// Lower bound for the silence timeout, in milliseconds
pub const MIN_SILENCE_TIMEOUT_MS: u64 = 600;

/// Upper bound for the silence timeout, in milliseconds
pub const MAX_SILENCE_TIMEOUT_MS: u64 = 1200;

/// Default silence timeout, in milliseconds
pub const DEFAULT_SILENCE_TIMEOUT_MS: u64 = 800;

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_silence_timeout_ms() -> u64 {
    DEFAULT_SILENCE_TIMEOUT_MS
}

fn default_done_words() -> Vec<String> {
    vec!["send".to_string(), "over".to_string(), "done".to_string()]
}

/// Configuration for a voice capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// BCP 47 locale tag passed through to the recognition engine
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Silence debounce before auto-finalizing, in milliseconds
    /// Kept within [MIN_SILENCE_TIMEOUT_MS, MAX_SILENCE_TIMEOUT_MS] by the
    /// session setter
    #[serde(default = "default_silence_timeout_ms")]
    pub silence_timeout_ms: u64,

    /// Trailing keywords that finalize the utterance immediately,
    /// matched case-insensitively against the end of the transcript
    #[serde(default = "default_done_words")]
    pub done_words: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            silence_timeout_ms: DEFAULT_SILENCE_TIMEOUT_MS,
            done_words: default_done_words(),
        }
    }
}
