//! Identifier types. Opaque strings with no structure of their own.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Names a category of event. The routing and registration key.
    EventType
);

string_id!(
    /// Names a payload's own category, independent of the event type carrying it.
    DataType
);

string_id!(
    /// Identifies a payload instance, usually a natural key of the domain object.
    DataId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn display_prints_raw_string() {
        assert_eq!(EventType::from("create").to_string(), "create");
        assert_eq!(DataId::new("jeek").to_string(), "jeek");
    }

    #[test]
    fn maps_can_be_queried_by_str() {
        let mut map = HashMap::new();
        map.insert(EventType::from("create"), 1);
        assert_eq!(map.get("create"), Some(&1));
    }

    #[test]
    fn default_is_empty() {
        assert!(EventType::default().is_empty());
        assert!(!DataType::from("data1").is_empty());
    }
}
