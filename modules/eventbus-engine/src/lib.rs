//! Event dispatch.
//!
//! A [`Dispatcher`] maps event types to ordered lists of [`EventHandler`]s
//! and delivers envelopes synchronously on the caller's thread. Handlers can
//! be plain functions ([`EventHandlerFunc`]) wrapped in middleware chains.
//!
//! Envelopes, payloads and the payload registry come from `eventbus-events`.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod testing;

pub use config::{DeliveryPolicy, DispatcherConfig};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, MiddlewareError};
pub use handler::{EventHandler, EventHandlerFunc};
pub use middleware::{use_event_handler_middleware, EventHandlerMiddleware};
pub use testing::RecordingHandler;
