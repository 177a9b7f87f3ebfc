//! The handler capability and its plain-function form.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use eventbus_events::Event;

/// Processes a delivered event. May fail; the dispatcher hands the error
/// back to its caller untouched.
pub trait EventHandler: Send + Sync {
    fn handle_event(&self, event: &Event) -> Result<()>;
}

impl<H: EventHandler + ?Sized> EventHandler for Arc<H> {
    fn handle_event(&self, event: &Event) -> Result<()> {
        (**self).handle_event(event)
    }
}

/// A handler as a plain function. Cheap to clone; this is what middleware
/// wraps.
#[derive(Clone)]
pub struct EventHandlerFunc(Arc<dyn Fn(&Event) -> Result<()> + Send + Sync>);

impl EventHandlerFunc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Event) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, event: &Event) -> Result<()> {
        (self.0)(event)
    }
}

impl EventHandler for EventHandlerFunc {
    fn handle_event(&self, event: &Event) -> Result<()> {
        self.call(event)
    }
}

impl fmt::Debug for EventHandlerFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandlerFunc")
    }
}
