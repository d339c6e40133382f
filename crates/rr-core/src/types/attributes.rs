//! Attribute storage for resource instances.
//!
//! A remote resource is a bag of named JSON values as received from the
//! server. [`Attributes`] wraps that bag and gives the association layer the
//! one read it needs: `instance[key]`, where an explicit JSON `null` reads the
//! same as a missing key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The attribute values of a single resource instance.
///
/// # Examples
///
/// ```
/// use rr_core::Attributes;
/// use serde_json::json;
///
/// let attrs = Attributes::from_value(json!({
///     "id": 7,
///     "author_id": 3,
///     "editor_id": null,
/// }))
/// .unwrap();
///
/// assert_eq!(attrs.get("author_id"), Some(&json!(3)));
/// assert_eq!(attrs.get("editor_id"), None);
/// assert_eq!(attrs.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    /// Creates an empty attribute set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds attributes from a JSON object. Returns `None` for any other
    /// JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the value stored under `key`, treating `null` as absent.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Returns the value under `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns `true` if a non-null value is stored under `key`.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the number of stored keys, including `null` ones.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no keys are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over every stored key and value.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the attributes as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
