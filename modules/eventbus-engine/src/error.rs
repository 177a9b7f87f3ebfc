use eventbus_events::{ConfigError, EventType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no handlers for event: {0}")]
    HandlerNotFound(EventType),

    /// The handler's own error, unchanged.
    #[error(transparent)]
    Handler(anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiddlewareError {
    #[error("event {event_type} rejected: {reason}")]
    Rejected { event_type: EventType, reason: String },
}
