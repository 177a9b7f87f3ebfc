//! The payload capability carried by every envelope.

use std::any::Any;
use std::fmt::Debug;

use crate::types::{DataId, DataType};

/// Domain data attached to an event.
///
/// Object safe: envelopes hold payloads as `Arc<dyn Payload>`. To be encoded
/// or decoded, a concrete payload type must also implement `Serialize` and
/// `DeserializeOwned` and be registered with a
/// [`PayloadRegistry`](crate::PayloadRegistry).
pub trait Payload: Any + Debug + Send + Sync {
    /// Instance identifier, e.g. a natural key of the carried domain object.
    fn id(&self) -> DataId;

    /// The payload's own category.
    fn data_type(&self) -> DataType;
}

impl dyn Payload {
    pub fn is<T: Payload>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Recover the concrete shape. Callers own this; the bus never needs it.
    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}
