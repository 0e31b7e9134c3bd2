//! Newtype IDs for type-safe identifiers.
//!
//! Every identifier is issued by the commerce backend; the client never mints
//! its own. Using newtypes prevents passing a `VariantId` where an
//! `OptionValueId` is expected, which is an easy mistake in the selection code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A server-issued identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(OptionId);
define_id!(OptionValueId);
define_id!(CartId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: VariantId = "pv-456".into();
        assert_eq!(id.as_str(), "pv-456");
    }

    #[test]
    fn test_id_display() {
        let id = OptionValueId::new("ov-789");
        assert_eq!(format!("{}", id), "ov-789");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CartId::new("cart-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cart-1\"");

        let back: CartId = serde_json::from_str("\"cart-1\"").unwrap();
        assert_eq!(back, id);
    }
}
