//! The event envelope and its binary encoding.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::payload::Payload;
use crate::registry::PayloadRegistry;
use crate::types::EventType;

/// An event type, a payload and a creation timestamp.
///
/// Immutable once built. The payload is absent only on an [`Event::empty`]
/// shell that has not been filled by [`Event::from_bytes`] yet.
#[derive(Debug, Clone, Default)]
pub struct Event {
    event_type: EventType,
    payload: Option<Arc<dyn Payload>>,
    created_at: i64,
}

/// On-the-wire envelope. `shape` names the concrete payload type so the
/// decoder can pick the right codec.
#[derive(Serialize, Deserialize)]
struct WireEvent {
    event_type: EventType,
    created_at: i64,
    payload: Option<WirePayload>,
}

#[derive(Serialize, Deserialize)]
struct WirePayload {
    shape: String,
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl Event {
    pub fn new(
        event_type: impl Into<EventType>,
        payload: impl Payload,
        created_at: i64,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            payload: Some(Arc::new(payload)),
            created_at,
        }
    }

    /// Like [`Event::new`], stamped with the current Unix time in seconds.
    pub fn now(event_type: impl Into<EventType>, payload: impl Payload) -> Self {
        Self::new(event_type, payload, Utc::now().timestamp())
    }

    /// Decode target for [`Event::from_bytes`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn payload(&self) -> Option<&(dyn Payload + 'static)> {
        self.payload.as_deref()
    }

    pub fn payload_as<T: Payload>(&self) -> Option<&T> {
        self.payload()?.downcast_ref::<T>()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Serialize the envelope and its concrete payload.
    ///
    /// Fails if the payload's type was never passed to
    /// [`PayloadRegistry::register_data`].
    pub fn bytes(&self, registry: &PayloadRegistry) -> Result<Vec<u8>, ConfigError> {
        let payload = match self.payload() {
            Some(payload) => {
                let codec = registry.codec_for(payload)?;
                Some(WirePayload {
                    shape: codec.name.to_string(),
                    data: (codec.encode)(payload)?,
                })
            }
            None => None,
        };

        let wire = WireEvent {
            event_type: self.event_type.clone(),
            created_at: self.created_at,
            payload,
        };
        Ok(rmp_serde::to_vec_named(&wire)?)
    }

    /// Overwrite this envelope with one decoded from `bytes`. Left unchanged
    /// on error.
    pub fn from_bytes(&mut self, registry: &PayloadRegistry, bytes: &[u8]) -> Result<(), ConfigError> {
        *self = Self::decode(registry, bytes)?;
        Ok(())
    }

    pub fn decode(registry: &PayloadRegistry, bytes: &[u8]) -> Result<Self, ConfigError> {
        let wire: WireEvent = rmp_serde::from_slice(bytes)?;

        let payload = match wire.payload {
            Some(WirePayload { shape, data }) => {
                let codec = registry.codec_named(&shape)?;
                Some((codec.decode)(&data)?)
            }
            None => None,
        };

        Ok(Self {
            event_type: wire.event_type,
            payload,
            created_at: wire.created_at,
        })
    }
}
