use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::debug;

use super::backend::{
    Recognizer, RecognizerConfig, RecognizerEvent, RecognizerFactory,
};

/// Shared view into a `ScriptedRecognizer` for tests and demos
///
/// Lets the caller observe lifecycle calls and push further events after
/// the session has taken ownership of the recognizer.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHandle {
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    aborted: Arc<AtomicBool>,
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<RecognizerEvent>>>>,
}

impl ScriptedHandle {
    pub fn was_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Push an event into the live event channel
    ///
    /// Returns false if the recognizer was never started or has been
    /// released already.
    pub fn push(&self, event: RecognizerEvent) -> bool {
        let guard = self.tx.lock().expect("scripted handle mutex poisoned");
        match guard.as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Close the event channel, simulating the engine ending on its own
    /// without an explicit `Ended` event.
    pub fn close(&self) {
        let mut guard = self.tx.lock().expect("scripted handle mutex poisoned");
        *guard = None;
    }
}

/// Deterministic recognizer that plays back a fixed event script
///
/// Stand-in for the platform speech engine in tests and demos. On start it
/// emits `Started` followed by the scripted events; the channel then stays
/// open so the handle can push more events or the session can tear down.
#[derive(Debug)]
pub struct ScriptedRecognizer {
    script: Vec<RecognizerEvent>,
    fail_on_start: bool,
    handle: ScriptedHandle,
}

impl ScriptedRecognizer {
    /// Recognizer that emits `Started` followed by `script`
    pub fn new(script: Vec<RecognizerEvent>) -> Self {
        Self {
            script,
            fail_on_start: false,
            handle: ScriptedHandle::default(),
        }
    }

    /// Recognizer whose `start` raises synchronously
    pub fn failing() -> Self {
        Self {
            script: Vec::new(),
            fail_on_start: true,
            handle: ScriptedHandle::default(),
        }
    }

    /// Handle for observing calls and pushing events after handoff
    pub fn handle(&self) -> ScriptedHandle {
        self.handle.clone()
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<RecognizerEvent>> {
        if self.fail_on_start {
            bail!("scripted recognizer configured to fail on start");
        }

        let (tx, rx) = mpsc::unbounded_channel();

        // Scripted events are buffered in the unbounded channel up front;
        // the session consumes them through its pump in order.
        let _ = tx.send(RecognizerEvent::Started);
        for event in self.script.drain(..) {
            let _ = tx.send(event);
        }

        {
            let mut guard = self
                .handle
                .tx
                .lock()
                .expect("scripted handle mutex poisoned");
            *guard = Some(tx);
        }
        self.handle.started.store(true, Ordering::SeqCst);

        Ok(rx)
    }

    fn stop(&mut self) -> Result<()> {
        self.handle.stopped.store(true, Ordering::SeqCst);
        self.handle.close();
        Ok(())
    }

    fn abort(&mut self) -> Result<()> {
        self.handle.aborted.store(true, Ordering::SeqCst);
        self.handle.close();
        Ok(())
    }
}

/// Factory producing scripted recognizers
///
/// Queues prepared recognizers and hands them out in order; once the queue
/// is empty it produces recognizers with an empty script. Instantiation
/// count and the last requested config are observable through shared
/// handles, so tests can assert that no extra engine instances were
/// created.
pub struct ScriptedFactory {
    supported: bool,
    queue: Mutex<VecDeque<ScriptedRecognizer>>,
    created: Arc<AtomicUsize>,
    last_config: Arc<Mutex<Option<RecognizerConfig>>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            supported: true,
            queue: Mutex::new(VecDeque::new()),
            created: Arc::new(AtomicUsize::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    /// Factory that reports the capability as unavailable
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Queue a prepared recognizer to be handed out by the next `create`
    pub fn queue(self, recognizer: ScriptedRecognizer) -> Self {
        self.queue
            .lock()
            .expect("scripted factory mutex poisoned")
            .push_back(recognizer);
        self
    }

    /// Shared counter of recognizer instantiations
    pub fn created_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }

    /// Shared view of the config passed to the most recent `create`
    pub fn config_handle(&self) -> Arc<Mutex<Option<RecognizerConfig>>> {
        Arc::clone(&self.last_config)
    }
}

impl Default for ScriptedFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognizerFactory for ScriptedFactory {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(&self, config: &RecognizerConfig) -> Result<Box<dyn Recognizer>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        {
            let mut guard = self
                .last_config
                .lock()
                .expect("scripted factory mutex poisoned");
            *guard = Some(config.clone());
        }

        let next = self
            .queue
            .lock()
            .expect("scripted factory mutex poisoned")
            .pop_front();

        match next {
            Some(recognizer) => Ok(Box::new(recognizer)),
            None => {
                debug!("scripted factory queue empty, producing empty-script recognizer");
                Ok(Box::new(ScriptedRecognizer::new(Vec::new())))
            }
        }
    }
}
