//! Event envelopes and the payload registry.
//!
//! An [`Event`] pairs an event type with a [`Payload`] and a timestamp. The
//! [`PayloadRegistry`] maps event types to payload factories and remembers
//! each concrete payload shape, which is what lets an envelope survive a
//! round trip through bytes.
//!
//! No transport, no persistence. Routing lives in `eventbus-engine`.

pub mod error;
pub mod event;
pub mod payload;
pub mod registry;
pub mod types;

pub use error::{ConfigError, EventError};
pub use event::Event;
pub use payload::Payload;
pub use registry::PayloadRegistry;
pub use types::{DataId, DataType, EventType};
