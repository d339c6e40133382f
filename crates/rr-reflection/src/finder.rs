//! Related-resource finder.
//!
//! One generic function loads the resource on the other side of any
//! `belongs_to` association, driven by the association's reflection:
//!
//! ```text
//! related_resource(post, author)
//!     │
//!     ├── post["author_id"] absent?        → Ok(None), nothing resolved
//!     ├── embedded object under "author"?  → build Author from it
//!     └── klass(post) → transport.find(Author, post["author_id"])
//! ```
//!
//! The fetch itself belongs to a [`Transport`]. Its errors are returned as
//! they are; the finder only adds the reflection errors it raises itself,
//! which every transport error type can absorb through
//! `From<ReflectionError>`.

use std::sync::Arc;

use rr_core::{Attributes, FinderConfig, MacroKind};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{AssociationReflection, Namespace, ReflectionError, Resource, ResourceClass};

/// Fetches single resources by primary key.
pub trait Transport {
    /// The transport's failure type.
    type Error: From<ReflectionError>;

    /// Fetches the resource of `class` identified by `id`.
    fn find(&self, class: &Arc<ResourceClass>, id: &Value) -> Result<Resource, Self::Error>;
}

/// Loads related resources through a [`Transport`].
#[derive(Debug)]
pub struct Finder<'a, T> {
    namespace: &'a Namespace,
    transport: &'a T,
    config: FinderConfig,
}

impl<'a, T: Transport> Finder<'a, T> {
    /// Creates a finder with the default configuration.
    #[must_use]
    pub fn new(namespace: &'a Namespace, transport: &'a T) -> Self {
        Self {
            namespace,
            transport,
            config: FinderConfig::default(),
        }
    }

    /// Replaces the finder configuration.
    #[must_use]
    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the resource `association` of `resource` points at.
    ///
    /// Fails with [`ReflectionError::UnknownAssociation`] if the resource's
    /// class declares no such association.
    pub fn related(&self, resource: &Resource, association: &str) -> Result<Option<Resource>, T::Error> {
        let reflection = resource
            .class()
            .reflect_on_association(association)
            .ok_or_else(|| ReflectionError::UnknownAssociation {
                class: resource.class().name().to_owned(),
                association: association.to_owned(),
            })?;

        self.related_resource(resource, reflection)
    }

    /// Loads the resource `reflection` points at from `resource`.
    ///
    /// Returns `Ok(None)` without resolving anything when the foreign-key
    /// attribute is absent or `null`, even if an embedded payload is present.
    pub fn related_resource(
        &self,
        resource: &Resource,
        reflection: &AssociationReflection,
    ) -> Result<Option<Resource>, T::Error> {
        if reflection.macro_kind() != MacroKind::BelongsTo {
            return Err(ReflectionError::UnsupportedFinder {
                association: reflection.name().to_owned(),
                macro_kind: reflection.macro_kind(),
            }
            .into());
        }

        let Some(id) = resource.get(reflection.foreign_key()) else {
            trace!(
                association = reflection.name(),
                foreign_key = reflection.foreign_key(),
                "No foreign key value"
            );
            return Ok(None);
        };

        if self.config.use_embedded {
            if let Some(embedded) = self.embedded(resource, reflection)? {
                return Ok(Some(embedded));
            }
        }

        let class = reflection.klass(self.namespace, Some(resource))?;
        debug!(
            association = reflection.name(),
            class = class.name(),
            id = %id,
            "Fetching related resource"
        );

        self.transport.find(&class, id).map(Some)
    }

    fn embedded(
        &self,
        resource: &Resource,
        reflection: &AssociationReflection,
    ) -> Result<Option<Resource>, ReflectionError> {
        let Some(Value::Object(payload)) = resource.get(reflection.name()) else {
            return Ok(None);
        };

        let class = reflection.klass(self.namespace, Some(resource))?;
        trace!(
            association = reflection.name(),
            class = class.name(),
            "Using embedded payload"
        );

        Ok(Some(Resource::new(class, Attributes::from(payload.clone()))))
    }
}
