//! Free-form document fields kept alongside typed record columns.
//!
//! Clients attach descriptive fields to parcels, users, and rider
//! applications (receiver address, parcel weight, rider region, profile
//! photo, and so on). The server neither validates nor interprets them; they
//! are stored and echoed back as submitted. Keys owned by the typed part of a
//! record are removed so a client cannot shadow server-stamped values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client-supplied fields with reserved keys removed.
///
/// # Examples
/// ```
/// use serde_json::{Map, json};
/// use swift_parcel::domain::PassthroughFields;
///
/// let mut raw = Map::new();
/// raw.insert("receiverName".into(), json!("Bea"));
/// raw.insert("createdAt".into(), json!("yesterday"));
/// let fields = PassthroughFields::from_map(raw, &["createdAt"]);
/// assert_eq!(fields.get("receiverName"), Some(&json!("Bea")));
/// assert!(fields.get("createdAt").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassthroughFields(Map<String, Value>);

impl PassthroughFields {
    /// Keep `fields` minus any key listed in `reserved`.
    #[must_use]
    pub fn from_map(mut fields: Map<String, Value>, reserved: &[&str]) -> Self {
        for key in reserved {
            fields.remove(*key);
        }
        Self(fields)
    }

    /// Look up a single field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into a JSON object for storage.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Rebuild from a stored JSON value; non-objects yield no fields.
    #[must_use]
    pub fn from_stored(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
