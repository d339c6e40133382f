//! In-memory transport backed by JSON fixtures.
//!
//! Fixtures are keyed by class name, each holding a list of attribute
//! objects:
//!
//! ```json
//! {
//!   "Author":  [{ "id": 7, "name": "Ada" }],
//!   "Company": [{ "id": "c-1", "name": "Acme" }]
//! }
//! ```
//!
//! Records match on the configured primary key. Numbers and strings with the
//! same text match each other (`7` finds `"7"`), because foreign keys
//! frequently arrive as strings. Every request is recorded so callers can
//! check what reached the transport.

use std::cell::RefCell;
use std::fs;
use std::sync::Arc;

use camino::Utf8Path;
use rr_core::{Attributes, ConfigError, FxHashMap};
use serde_json::Value;

use crate::{ReflectionError, Resource, ResourceClass, Transport};

/// Errors returned by [`FixtureTransport`].
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// No fixture record has the requested id.
    #[error("couldn't find {class} with id {id}")]
    NotFound {
        /// Requested class.
        class: String,
        /// Requested id, as text.
        id: String,
    },

    /// The finder failed before reaching the transport.
    #[error(transparent)]
    Reflection(#[from] ReflectionError),
}

/// One `find` call seen by a [`FixtureTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRequest {
    /// Requested class name.
    pub class: String,
    /// Requested id.
    pub id: Value,
}

/// Transport answering `find` from in-memory fixture records.
#[derive(Debug)]
pub struct FixtureTransport {
    records: FxHashMap<String, Vec<Attributes>>,
    primary_key: String,
    requests: RefCell<Vec<FixtureRequest>>,
}

impl FixtureTransport {
    /// Creates an empty transport matching records on `primary_key`.
    #[must_use]
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self {
            records: FxHashMap::default(),
            primary_key: primary_key.into(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Parses a fixture document.
    pub fn from_json_str(json: &str, primary_key: impl Into<String>) -> Result<Self, ConfigError> {
        let records: FxHashMap<String, Vec<Attributes>> = serde_json::from_str(json)?;
        Ok(Self {
            records,
            ..Self::new(primary_key)
        })
    }

    /// Reads and parses a fixture file.
    pub fn from_path(path: &Utf8Path, primary_key: impl Into<String>) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path.as_std_path()).map_err(|e| ConfigError::read(path, e))?;
        Self::from_json_str(&contents, primary_key)
    }

    /// Adds a record for `class`.
    pub fn insert(&mut self, class: impl Into<String>, attributes: Attributes) {
        self.records.entry(class.into()).or_default().push(attributes);
    }

    /// Returns every request made so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<FixtureRequest> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, class: &str, id: &Value) -> Option<&Attributes> {
        self.records.get(class)?.iter().find(|record| {
            record
                .get(&self.primary_key)
                .is_some_and(|candidate| ids_match(candidate, id))
        })
    }
}

impl Transport for FixtureTransport {
    type Error = FixtureError;

    fn find(&self, class: &Arc<ResourceClass>, id: &Value) -> Result<Resource, FixtureError> {
        self.requests.borrow_mut().push(FixtureRequest {
            class: class.name().to_owned(),
            id: id.clone(),
        });

        self.lookup(class.name(), id)
            .map(|attributes| Resource::new(Arc::clone(class), attributes.clone()))
            .ok_or_else(|| FixtureError::NotFound {
                class: class.name().to_owned(),
                id: id_text(id),
            })
    }
}

fn ids_match(a: &Value, b: &Value) -> bool {
    a == b || id_text(a) == id_text(b)
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
