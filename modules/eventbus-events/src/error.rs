use thiserror::Error;

use crate::types::{DataType, EventType};

/// Misuse of the registry or envelope API by the embedding program.
///
/// These are configuration mistakes, not runtime conditions. Callers should
/// treat them as unrecoverable: log and exit during startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("attempt to use an empty event type")]
    EmptyEventType,

    #[error("registering duplicate payload factory for {0:?}")]
    DuplicateEventType(EventType),

    #[error("unregister of non-registered event type {0:?}")]
    NotRegistered(EventType),

    /// Encoding side: the payload's concrete type was never registered.
    #[error("payload of data type {0:?} has an unregistered shape")]
    UnregisteredPayload(DataType),

    /// Decoding side: the shape name in the bytes is unknown.
    #[error("payload shape {0:?} is not registered")]
    ShapeNotRegistered(String),

    #[error("payload shape name {0:?} is already taken by a different type")]
    ShapeNameCollision(String),

    #[error("failed to encode event: {0}")]
    Encode(String),

    #[error("failed to decode event: {0}")]
    Decode(String),
}

/// Recoverable failures callers are expected to check.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("event not registered: {0}")]
    EventNotRegistered(EventType),
}

impl From<rmp_serde::encode::Error> for ConfigError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        ConfigError::Encode(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for ConfigError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        ConfigError::Decode(err.to_string())
    }
}
