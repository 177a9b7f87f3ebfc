//! In-memory handler for tests. Records every delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, Result};
use eventbus_events::{Event, EventType};

use crate::handler::EventHandler;

/// Counts calls and remembers the event types it saw. Share it through an
/// `Arc` to assert on it after dispatch.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    calls: AtomicUsize,
    seen: Mutex<Vec<EventType>>,
    fail_with: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records like [`RecordingHandler::new`], then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<EventType> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventHandler for RecordingHandler {
    fn handle_event(&self, event: &Event) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.event_type().clone());

        match &self.fail_with {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}
