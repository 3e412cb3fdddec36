use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a voice capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether the session is currently listening
    pub is_listening: bool,

    /// When the current listening period started, if any
    pub started_at: Option<DateTime<Utc>>,

    /// Number of result batches received this listening period
    pub batches_received: usize,

    /// Length of the accumulated transcript, in characters
    pub transcript_chars: usize,
}
