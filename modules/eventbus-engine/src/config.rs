use serde::{Deserialize, Serialize};

/// How the dispatcher treats several handlers registered for one event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Only the first registered handler runs; its result is returned.
    #[default]
    FirstHandler,
    /// Every handler runs in registration order, stopping at the first error.
    FanOut,
}

/// Dispatcher settings. Deserializable so a host application can embed it
/// in its own config file; every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub delivery: DeliveryPolicy,
}

impl DispatcherConfig {
    pub fn with_delivery(mut self, delivery: DeliveryPolicy) -> Self {
        self.delivery = delivery;
        self
    }
}
