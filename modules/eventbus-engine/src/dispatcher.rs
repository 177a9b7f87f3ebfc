//! The routing table: event type → ordered handlers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use eventbus_events::{ConfigError, Event, EventType, PayloadRegistry};
use tracing::{debug, warn};

use crate::config::{DeliveryPolicy, DispatcherConfig};
use crate::error::DispatchError;
use crate::handler::EventHandler;

/// Synchronous dispatcher. Handlers run on the caller's thread before
/// `handle_event` returns; there is no queue.
#[derive(Default)]
pub struct Dispatcher {
    handlers: RwLock<HashMap<EventType, Vec<Arc<dyn EventHandler>>>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            handlers: RwLock::default(),
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Append `handler` to the list of every listed event type. No
    /// deduplication: adding the same handler twice gives two entries.
    pub fn add_handler<H, I>(&self, handler: H, event_types: I) -> Result<(), ConfigError>
    where
        H: EventHandler + 'static,
        I: IntoIterator,
        I::Item: Into<EventType>,
    {
        let event_types: Vec<EventType> = event_types.into_iter().map(Into::into).collect();
        if event_types.iter().any(EventType::is_empty) {
            warn!("rejected handler registration for empty event type");
            return Err(ConfigError::EmptyEventType);
        }

        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        {
            let mut handlers = write(&self.handlers);
            for event_type in &event_types {
                handlers
                    .entry(event_type.clone())
                    .or_default()
                    .push(Arc::clone(&handler));
            }
        }
        debug!(event_types = ?event_types, "added event handler");
        Ok(())
    }

    /// Deliver `event` according to the configured [`DeliveryPolicy`].
    pub fn handle_event(&self, event: &Event) -> Result<(), DispatchError> {
        let event_type = event.event_type();

        // Clone out of the lock so handlers may dispatch or register.
        let selected: Vec<Arc<dyn EventHandler>> = {
            let handlers = read(&self.handlers);
            let list = handlers.get(event_type).map(Vec::as_slice).unwrap_or_default();
            match self.config.delivery {
                DeliveryPolicy::FirstHandler => list.iter().take(1).cloned().collect(),
                DeliveryPolicy::FanOut => list.to_vec(),
            }
        };

        if selected.is_empty() {
            warn!(%event_type, "no handlers for event");
            return Err(DispatchError::HandlerNotFound(event_type.clone()));
        }

        debug!(
            %event_type,
            handlers = selected.len(),
            delivery = ?self.config.delivery,
            "dispatching event"
        );
        for handler in &selected {
            handler.handle_event(event).map_err(DispatchError::Handler)?;
        }
        Ok(())
    }

    /// Decode an envelope produced by [`Event::bytes`] and dispatch it.
    pub fn handle_bytes(&self, registry: &PayloadRegistry, bytes: &[u8]) -> Result<(), DispatchError> {
        let event = Event::decode(registry, bytes)?;
        self.handle_event(&event)
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        read(&self.handlers).get(event_type).map_or(0, Vec::len)
    }

    /// Event types with at least one handler, sorted.
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = read(&self.handlers)
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(event_type, _)| event_type.clone())
            .collect();
        types.sort();
        types
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
