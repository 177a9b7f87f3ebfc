//! Handler middleware: functions from one `EventHandlerFunc` to another.
//!
//! Given `[a, b, c]`, [`use_event_handler_middleware`] produces
//! `a(b(c(handler)))`, so `a` sees the event first and the result last.

use std::sync::Arc;

use eventbus_events::Event;
use tracing::{debug, info_span, warn};

use crate::error::MiddlewareError;
use crate::handler::EventHandlerFunc;

pub type EventHandlerMiddleware =
    Box<dyn Fn(EventHandlerFunc) -> EventHandlerFunc + Send + Sync>;

/// Wrap `handler` in `middleware`, first entry outermost.
pub fn use_event_handler_middleware<I>(handler: EventHandlerFunc, middleware: I) -> EventHandlerFunc
where
    I: IntoIterator<Item = EventHandlerMiddleware>,
    I::IntoIter: DoubleEndedIterator,
{
    middleware
        .into_iter()
        .rev()
        .fold(handler, |inner, wrap| wrap(inner))
}

/// Runs the inner handler inside a `handle_event` span and logs failures.
pub fn logging() -> EventHandlerMiddleware {
    Box::new(|next: EventHandlerFunc| {
        EventHandlerFunc::new(move |event| {
            let span = info_span!("handle_event", event_type = %event.event_type());
            let _enter = span.enter();

            debug!(created_at = event.created_at(), "handling event");
            let result = next.call(event);
            if let Err(err) = &result {
                warn!(error = %err, "event handler failed");
            }
            result
        })
    })
}

/// Rejects events `predicate` refuses, without calling the inner handler.
pub fn guard<P>(predicate: P, reason: impl Into<String>) -> EventHandlerMiddleware
where
    P: Fn(&Event) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    let reason: Arc<str> = reason.into().into();

    Box::new(move |next: EventHandlerFunc| {
        let predicate = Arc::clone(&predicate);
        let reason = Arc::clone(&reason);
        EventHandlerFunc::new(move |event| {
            if !(*predicate)(event) {
                return Err(MiddlewareError::Rejected {
                    event_type: event.event_type().clone(),
                    reason: reason.to_string(),
                }
                .into());
            }
            next.call(event)
        })
    })
}
