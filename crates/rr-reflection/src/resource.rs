//! Resource instances.

use std::sync::Arc;

use rr_core::Attributes;
use serde_json::Value;

use crate::ResourceClass;

/// One fetched or locally built resource: a class plus its attribute map.
#[derive(Debug, Clone)]
pub struct Resource {
    class: Arc<ResourceClass>,
    attributes: Attributes,
}

impl Resource {
    /// Creates a resource of `class` with the given attributes.
    #[must_use]
    pub const fn new(class: Arc<ResourceClass>, attributes: Attributes) -> Self {
        Self { class, attributes }
    }

    /// Returns the resource's class.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> &Arc<ResourceClass> {
        &self.class
    }

    /// Returns the resource's attributes.
    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a single attribute, treating `null` as absent.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Consumes the resource, returning its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }
}
