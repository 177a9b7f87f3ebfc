//! PayloadRegistry: event type → payload factory, plus the shape codecs
//! that let an envelope rebuild its concrete payload from bytes.
//!
//! One registry per process is the usual arrangement: build it during
//! startup, wrap it in an `Arc`, and hand it to whatever encodes, decodes or
//! creates payloads. Registration validates eagerly so a misconfigured
//! factory surfaces at startup rather than on first use.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, EventError};
use crate::payload::Payload;
use crate::types::EventType;

type Factory = Arc<dyn Fn() -> Box<dyn Payload> + Send + Sync>;

/// Encoder/decoder pair for one concrete payload type.
#[derive(Clone, Copy)]
pub(crate) struct ShapeCodec {
    pub name: &'static str,
    pub encode: fn(&(dyn Payload + 'static)) -> Result<Vec<u8>, ConfigError>,
    pub decode: fn(&[u8]) -> Result<Arc<dyn Payload>, ConfigError>,
}

#[derive(Default)]
struct Shapes {
    by_type: HashMap<TypeId, ShapeCodec>,
    by_name: HashMap<&'static str, TypeId>,
}

impl Shapes {
    /// `type_name` is not guaranteed unique; refuse a name another type holds.
    fn check_name(&self, name: &'static str, type_id: TypeId) -> Result<(), ConfigError> {
        match self.by_name.get(name) {
            Some(existing) if *existing != type_id => {
                Err(ConfigError::ShapeNameCollision(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn insert<T>(&mut self)
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        let type_id = TypeId::of::<T>();
        if self.by_type.contains_key(&type_id) {
            return;
        }
        let codec = ShapeCodec {
            name: type_name::<T>(),
            encode: encode_shape::<T>,
            decode: decode_shape::<T>,
        };
        self.by_name.insert(codec.name, type_id);
        self.by_type.insert(type_id, codec);
    }
}

#[derive(Default)]
pub struct PayloadRegistry {
    factories: RwLock<HashMap<EventType, Factory>>,
    shapes: RwLock<Shapes>,
}

impl PayloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `factory` with every listed event type and register the
    /// payload's concrete shape with the codec.
    ///
    /// The factory is called once up front. Fails without touching the
    /// registry if any event type is empty, already registered, or listed
    /// twice.
    pub fn register_data<T, F, I>(&self, factory: F, event_types: I) -> Result<(), ConfigError>
    where
        T: Payload + Serialize + DeserializeOwned,
        F: Fn() -> T + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<EventType>,
    {
        let sample = factory();
        let shape = type_name::<T>();
        let type_id = TypeId::of::<T>();
        let event_types: Vec<EventType> = event_types.into_iter().map(Into::into).collect();

        // Lock order: factories, then shapes. Both maps change in one critical
        // section so a registered event type always has an encodable shape.
        let mut factories = write(&self.factories);
        let mut shapes = write(&self.shapes);

        for (i, event_type) in event_types.iter().enumerate() {
            if event_type.is_empty() {
                warn!(shape, "rejected payload registration for empty event type");
                return Err(ConfigError::EmptyEventType);
            }
            if factories.contains_key(event_type) || event_types[..i].contains(event_type) {
                warn!(%event_type, shape, "rejected duplicate payload registration");
                return Err(ConfigError::DuplicateEventType(event_type.clone()));
            }
        }
        if let Err(err) = shapes.check_name(shape, type_id) {
            warn!(shape, "rejected payload registration with colliding shape name");
            return Err(err);
        }

        shapes.insert::<T>();
        let boxed: Factory = Arc::new(move || Box::new(factory()) as Box<dyn Payload>);
        for event_type in &event_types {
            factories.insert(event_type.clone(), Arc::clone(&boxed));
        }
        drop(shapes);
        drop(factories);

        debug!(
            shape,
            data_type = %sample.data_type(),
            event_types = ?event_types,
            "registered payload factory"
        );
        Ok(())
    }

    /// Remove the factory for `event_type`. The shape stays registered so
    /// bytes encoded earlier can still be decoded.
    pub fn unregister_data(&self, event_type: impl Into<EventType>) -> Result<(), ConfigError> {
        let event_type = event_type.into();
        if event_type.is_empty() {
            warn!("rejected unregister of empty event type");
            return Err(ConfigError::EmptyEventType);
        }

        if write(&self.factories).remove(&event_type).is_none() {
            warn!(%event_type, "rejected unregister of non-registered event type");
            return Err(ConfigError::NotRegistered(event_type));
        }

        debug!(%event_type, "unregistered payload factory");
        Ok(())
    }

    /// A fresh, empty payload for `event_type`.
    pub fn create_event_data(&self, event_type: impl AsRef<str>) -> Result<Box<dyn Payload>, EventError> {
        let event_type = event_type.as_ref();
        // Clone the factory out so it runs without the lock held.
        let factory = read(&self.factories).get(event_type).cloned();
        match factory {
            Some(factory) => Ok(factory()),
            None => Err(EventError::EventNotRegistered(EventType::from(event_type))),
        }
    }

    pub fn is_registered(&self, event_type: &str) -> bool {
        read(&self.factories).contains_key(event_type)
    }

    /// Registered event types, sorted.
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = read(&self.factories).keys().cloned().collect();
        types.sort();
        types
    }

    pub fn is_shape_registered<T: Payload>(&self) -> bool {
        read(&self.shapes).by_type.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn codec_for(&self, payload: &(dyn Payload + 'static)) -> Result<ShapeCodec, ConfigError> {
        let any: &dyn Any = payload;
        read(&self.shapes)
            .by_type
            .get(&Any::type_id(any))
            .copied()
            .ok_or_else(|| ConfigError::UnregisteredPayload(payload.data_type()))
    }

    pub(crate) fn codec_named(&self, name: &str) -> Result<ShapeCodec, ConfigError> {
        let shapes = read(&self.shapes);
        shapes
            .by_name
            .get(name)
            .and_then(|type_id| shapes.by_type.get(type_id))
            .copied()
            .ok_or_else(|| ConfigError::ShapeNotRegistered(name.to_string()))
    }
}

impl fmt::Debug for PayloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadRegistry")
            .field("event_types", &self.event_types())
            .field("shapes", &read(&self.shapes).by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn encode_shape<T: Payload + Serialize>(payload: &(dyn Payload + 'static)) -> Result<Vec<u8>, ConfigError> {
    let concrete = payload
        .downcast_ref::<T>()
        .ok_or_else(|| ConfigError::UnregisteredPayload(payload.data_type()))?;
    Ok(rmp_serde::to_vec_named(concrete)?)
}

fn decode_shape<T: Payload + DeserializeOwned>(bytes: &[u8]) -> Result<Arc<dyn Payload>, ConfigError> {
    let payload: T = rmp_serde::from_slice(bytes)?;
    Ok(Arc::new(payload))
}

// Writers never leave the maps half-updated, so a poisoned lock is still usable.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_name_held_by_another_type_is_refused() {
        let mut shapes = Shapes::default();
        shapes.by_name.insert("fixture::Shape", TypeId::of::<u8>());

        assert_eq!(
            shapes.check_name("fixture::Shape", TypeId::of::<u16>()),
            Err(ConfigError::ShapeNameCollision("fixture::Shape".to_string()))
        );
        assert_eq!(shapes.check_name("fixture::Shape", TypeId::of::<u8>()), Ok(()));
        assert_eq!(shapes.check_name("fixture::Other", TypeId::of::<u16>()), Ok(()));
    }
}
