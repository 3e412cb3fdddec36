use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{CaptureConfig, MAX_SILENCE_TIMEOUT_MS, MIN_SILENCE_TIMEOUT_MS};
use super::matcher::match_done_word;
use super::stats::SessionStats;
use super::timer::SilenceTimer;
use crate::recognizer::{
    Recognizer, RecognizerConfig, RecognizerErrorKind, RecognizerEvent, RecognizerFactory,
    SegmentBatch,
};

/// Operational state of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No capture in progress, ready to start
    Idle,
    /// Actively listening for speech
    Listening,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
        }
    }
}

type ResultCallback = Box<dyn FnMut(&str) + Send>;
type StateCallback = Box<dyn FnMut(bool) + Send>;

/// Voice capture session controller
///
/// Sits atop an injected continuous speech-to-text capability and turns its
/// event stream into auto-submitted utterances: transcript fragments are
/// accumulated, silence is debounced through a cancellable timer, and a
/// configured trailing done word finalizes the utterance immediately.
///
/// A fresh recognizer instance is created for every listening period. All
/// state mutation happens inside the event handlers (`handle_*`), which the
/// `run_to_idle` pump drives from the recognizer event channel and the
/// timer signal channel.
pub struct VoiceCaptureSession {
    id: Uuid,
    state: SessionState,
    transcript: String,
    config: CaptureConfig,
    factory: Box<dyn RecognizerFactory>,
    recognizer: Option<Box<dyn Recognizer>>,
    event_rx: Option<mpsc::UnboundedReceiver<RecognizerEvent>>,
    timer: SilenceTimer,
    timer_tx: mpsc::UnboundedSender<u64>,
    timer_rx: Option<mpsc::UnboundedReceiver<u64>>,
    started_at: Option<DateTime<Utc>>,
    batches_received: usize,
    on_result: Option<ResultCallback>,
    on_partial: Option<ResultCallback>,
    on_state_change: Option<StateCallback>,
}

impl VoiceCaptureSession {
    /// Create a session with default configuration
    pub fn new(factory: Box<dyn RecognizerFactory>) -> Self {
        Self::with_config(factory, CaptureConfig::default())
    }

    /// Create a session with explicit configuration
    pub fn with_config(factory: Box<dyn RecognizerFactory>, config: CaptureConfig) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            transcript: String::new(),
            config,
            factory,
            recognizer: None,
            event_rx: None,
            timer: SilenceTimer::new(),
            timer_tx,
            timer_rx: Some(timer_rx),
            started_at: None,
            batches_received: 0,
            on_result: None,
            on_partial: None,
            on_state_change: None,
        }
    }

    /// Whether the speech capability is available in this environment
    pub fn is_supported(&self) -> bool {
        self.factory.is_supported()
    }

    /// Whether the session is currently listening
    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// Start a new listening period
    ///
    /// No-op when already listening, when a recognizer is already live, or
    /// when the capability is unsupported. Clears the transcript and
    /// creates a fresh recognizer configured for continuous capture with
    /// interim results and the session locale. A synchronous start failure
    /// leaves the session Idle and emits state-change(false); the
    /// Listening transition itself happens on the `Started` event.
    pub fn start(&mut self) {
        if self.state == SessionState::Listening || self.recognizer.is_some() {
            warn!(session_id = %self.id, "start requested while capture already active");
            return;
        }
        if !self.factory.is_supported() {
            warn!(session_id = %self.id, "speech capability not supported, ignoring start");
            return;
        }

        self.transcript.clear();
        self.batches_received = 0;

        let recognizer_config = RecognizerConfig {
            continuous: true,
            interim_results: true,
            locale: self.config.locale.clone(),
        };

        let mut recognizer = match self.factory.create(&recognizer_config) {
            Ok(recognizer) => recognizer,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "failed to create recognizer");
                self.emit_state_change(false);
                return;
            }
        };

        match recognizer.start() {
            Ok(event_rx) => {
                info!(session_id = %self.id, locale = %self.config.locale, "capture start requested");
                self.recognizer = Some(recognizer);
                self.event_rx = Some(event_rx);
                self.started_at = Some(Utc::now());
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "recognizer start raised, reverting to Idle");
                self.emit_state_change(false);
            }
        }
    }

    /// Stop the session without finalizing
    ///
    /// Idempotent. Cancels any pending timer, best-effort stops the
    /// capability (errors swallowed), releases it, and transitions to Idle
    /// with state-change(false) when a transition actually happens. Callers
    /// that need a final transcript rely on the timer, a done word, or the
    /// engine ending on its own.
    pub fn stop(&mut self) {
        self.timer.cancel();
        if let Some(mut recognizer) = self.recognizer.take() {
            if let Err(e) = recognizer.stop() {
                warn!(session_id = %self.id, error = %e, "recognizer stop failed during teardown");
            }
        }
        self.event_rx = None;
        if self.state == SessionState::Listening {
            self.transition_to_idle();
        }
    }

    /// Abort the session, discarding the buffered transcript
    ///
    /// Never emits a final result. Capability abort errors are swallowed.
    pub fn abort(&mut self) {
        self.timer.cancel();
        self.transcript.clear();
        if let Some(mut recognizer) = self.recognizer.take() {
            if let Err(e) = recognizer.abort() {
                warn!(session_id = %self.id, error = %e, "recognizer abort failed during teardown");
            }
        }
        self.event_rx = None;
        if self.state == SessionState::Listening {
            info!(session_id = %self.id, "session aborted, transcript discarded");
            self.transition_to_idle();
        }
    }

    /// Capability confirmed it is capturing
    pub fn handle_started(&mut self) {
        if self.recognizer.is_none() {
            debug!(session_id = %self.id, "started event with no live recognizer, ignoring");
            return;
        }
        if self.state == SessionState::Listening {
            return;
        }
        self.state = SessionState::Listening;
        info!(session_id = %self.id, "session state: Idle -> Listening");
        self.emit_state_change(true);
    }

    /// Incremental result batch from the recognizer
    ///
    /// Final text is appended to the transcript and either finalizes
    /// immediately on a done-word match or (re)arms the silence timer.
    /// Interim text is only ever echoed through the partial callback.
    pub fn handle_result(&mut self, batch: SegmentBatch) {
        if self.state != SessionState::Listening {
            debug!(session_id = %self.id, "result batch while not listening, ignoring");
            return;
        }
        self.batches_received += 1;
        debug!(
            session_id = %self.id,
            resume_index = batch.resume_index,
            segments = batch.segments.len(),
            "result batch received"
        );

        let mut final_text = String::new();
        let mut interim_text = String::new();
        for segment in &batch.segments {
            if segment.is_final {
                final_text.push_str(&segment.text);
            } else {
                interim_text.push_str(&segment.text);
            }
        }

        if !final_text.is_empty() {
            self.transcript.push_str(&final_text);

            if let Some(stripped) = match_done_word(&self.transcript, &self.config.done_words) {
                info!(session_id = %self.id, "done word detected, finalizing");
                self.transcript = stripped;
                self.timer.cancel();
                self.finalize();
                self.stop();
                return;
            }

            // Debounce: only the most recent arm survives
            self.timer.arm(
                Duration::from_millis(self.config.silence_timeout_ms),
                self.timer_tx.clone(),
            );
        }

        if !interim_text.is_empty() {
            let preview = format!("{}{}", self.transcript, interim_text);
            self.emit_partial(&preview);
        } else if !self.transcript.is_empty() {
            let preview = self.transcript.clone();
            self.emit_partial(&preview);
        }
    }

    /// Silence timer elapsed for the given generation
    ///
    /// Stale generations (queued before a newer arm or a cancel) are
    /// ignored, so a timer that was superseded can never finalize.
    pub fn handle_silence_elapsed(&mut self, generation: u64) {
        if self.state != SessionState::Listening {
            debug!(session_id = %self.id, generation, "timer fired while not listening, ignoring");
            return;
        }
        if !self.timer.is_current(generation) {
            debug!(session_id = %self.id, generation, "stale timer generation, ignoring");
            return;
        }
        info!(session_id = %self.id, "silence timeout elapsed, finalizing");
        self.timer.cancel();
        self.finalize();
        self.stop();
    }

    /// Recognizer reported an error
    ///
    /// Ignorable kinds (no speech, aborted) cause no state change. Any
    /// other kind stops the session and discards the transcript without a
    /// finalize emission.
    pub fn handle_error(&mut self, kind: RecognizerErrorKind) {
        if kind.is_ignorable() {
            debug!(session_id = %self.id, kind = %kind, "ignorable recognizer error");
            return;
        }
        warn!(session_id = %self.id, kind = %kind, "fatal recognizer error, discarding transcript");
        self.transcript.clear();
        self.stop();
    }

    /// Capability ended on its own (e.g. platform-enforced timeout)
    ///
    /// Finalizes like a timer fire, then goes Idle directly. The engine has
    /// already ended, so its own stop is deliberately not invoked here;
    /// re-stopping it would raise an avoidable error. The explicit `stop()`
    /// path is the one that calls it.
    pub fn handle_ended(&mut self) {
        self.timer.cancel();
        self.recognizer = None;
        self.event_rx = None;
        if self.state == SessionState::Listening {
            info!(session_id = %self.id, "capability ended on its own");
            self.finalize();
            self.transition_to_idle();
        } else {
            debug!(session_id = %self.id, "end event while not listening, ignoring");
        }
    }

    /// Drive the session until it returns to Idle
    ///
    /// Pumps recognizer events and timer signals into the handlers. The
    /// event channel closing without an `Ended` event is treated as the
    /// engine ending. Returns immediately if no capture is active.
    pub async fn run_to_idle(&mut self) {
        let mut events = match self.event_rx.take() {
            Some(rx) => rx,
            None => return,
        };
        let mut timer_rx = match self.timer_rx.take() {
            Some(rx) => rx,
            None => return,
        };

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(RecognizerEvent::Started) => self.handle_started(),
                    Some(RecognizerEvent::Result(batch)) => self.handle_result(batch),
                    Some(RecognizerEvent::Error(kind)) => self.handle_error(kind),
                    Some(RecognizerEvent::Ended) | None => self.handle_ended(),
                },
                Some(generation) = timer_rx.recv() => {
                    self.handle_silence_elapsed(generation);
                }
            }

            if self.state == SessionState::Idle && self.recognizer.is_none() {
                break;
            }
        }

        self.timer_rx = Some(timer_rx);
    }

    /// Set the silence timeout in milliseconds
    ///
    /// Applied only within [600, 1200] inclusive; out-of-range values leave
    /// the previous timeout unchanged.
    pub fn set_silence_timeout(&mut self, ms: u64) {
        if (MIN_SILENCE_TIMEOUT_MS..=MAX_SILENCE_TIMEOUT_MS).contains(&ms) {
            self.config.silence_timeout_ms = ms;
        } else {
            debug!(session_id = %self.id, ms, "silence timeout out of range, keeping previous");
        }
    }

    /// Current silence timeout in milliseconds
    pub fn silence_timeout(&self) -> u64 {
        self.config.silence_timeout_ms
    }

    /// Replace the active done-word set
    pub fn set_done_words(&mut self, words: Vec<String>) {
        self.config.done_words = words;
    }

    /// Copy of the active done-word set
    pub fn done_words(&self) -> Vec<String> {
        self.config.done_words.clone()
    }

    /// Locale passed through to the recognition engine
    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    /// Register the final-result callback, replacing any previous one
    pub fn on_result(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.on_result = Some(Box::new(callback));
    }

    /// Register the partial-transcript callback, replacing any previous one
    pub fn on_partial(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.on_partial = Some(Box::new(callback));
    }

    /// Register the state-change callback, replacing any previous one
    pub fn on_state_change(&mut self, callback: impl FnMut(bool) + Send + 'static) {
        self.on_state_change = Some(Box::new(callback));
    }

    /// Generation of the currently armed silence timer, if any
    pub fn pending_silence_generation(&self) -> Option<u64> {
        self.timer.current_generation()
    }

    /// Snapshot of session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            is_listening: self.is_listening(),
            started_at: self.started_at,
            batches_received: self.batches_received,
            transcript_chars: self.transcript.chars().count(),
        }
    }

    /// Emit the trimmed transcript through the final callback, if non-empty
    ///
    /// Every caller leaves Listening immediately afterwards, which is what
    /// keeps finalize at most-once per listening period.
    fn finalize(&mut self) {
        let text = self.transcript.trim().to_string();
        if text.is_empty() {
            debug!(session_id = %self.id, "empty transcript, nothing to finalize");
            return;
        }
        info!(session_id = %self.id, chars = text.chars().count(), "finalizing transcript");
        if let Some(callback) = &mut self.on_result {
            callback(&text);
        }
    }

    fn transition_to_idle(&mut self) {
        self.state = SessionState::Idle;
        self.started_at = None;
        info!(session_id = %self.id, "session state: Listening -> Idle");
        self.emit_state_change(false);
    }

    fn emit_partial(&mut self, text: &str) {
        if let Some(callback) = &mut self.on_partial {
            callback(text);
        }
    }

    fn emit_state_change(&mut self, listening: bool) {
        if let Some(callback) = &mut self.on_state_change {
            callback(listening);
        }
    }
}
