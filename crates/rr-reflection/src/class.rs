//! Resource classes.
//!
//! A [`ResourceClass`] is the descriptor of one remote resource type: its
//! name, the class it was derived from, and its [`ReflectionRegistry`].
//! Classes are declared while owned (`&mut self`) and then handed to a
//! [`Namespace`](crate::Namespace), after which they are shared read-only
//! behind an [`Arc`].

use std::sync::Arc;

use rr_core::{MacroKind, naming};
use tracing::debug;

use crate::builder::{self, AssociationBuilder, BelongsTo, HasMany, HasOne};
use crate::{
    AssociationOptions, AssociationReflection, BelongsToOptions, BuildError, CommonOptions,
    RawOptions, ReflectionRegistry, ReflectionSummary,
};

/// Descriptor of a remote resource type and its declared associations.
///
/// # Examples
///
/// ```
/// use rr_reflection::{BelongsToOptions, ResourceClass};
///
/// let mut post = ResourceClass::new("Post");
/// post.belongs_to("author", BelongsToOptions::new()).unwrap();
///
/// let reflection = post.reflect_on_association("author").unwrap();
/// assert_eq!(reflection.foreign_key(), "author_id");
/// ```
#[derive(Debug, Clone)]
pub struct ResourceClass {
    name: String,
    superclass: Option<String>,
    reflections: ReflectionRegistry,
}

impl ResourceClass {
    /// Creates a class with an empty registry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            reflections: ReflectionRegistry::new(),
        }
    }

    /// Defines a subclass named `name`.
    ///
    /// The subclass starts with a copy of this class's registry. Declarations
    /// made on either class afterwards are not seen by the other.
    #[must_use]
    pub fn subclass(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(
            class = %name,
            superclass = %self.name,
            inherited = self.reflections.len(),
            "Defined subclass"
        );

        Self {
            name,
            superclass: Some(self.name.clone()),
            reflections: self.reflections.clone(),
        }
    }

    /// Returns the class name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the class this one was derived from.
    #[inline]
    #[must_use]
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Returns the snake-cased, demodulized class name used as the payload
    /// root (`Admin::BlogPost` → `blog_post`).
    #[must_use]
    pub fn element_name(&self) -> String {
        naming::element_name(&self.name)
    }

    /// Returns every declared association.
    #[inline]
    #[must_use]
    pub const fn reflections(&self) -> &ReflectionRegistry {
        &self.reflections
    }

    /// Returns the reflection for the association named `name`.
    #[inline]
    #[must_use]
    pub fn reflect_on_association(&self, name: &str) -> Option<&Arc<AssociationReflection>> {
        self.reflections.get(name)
    }

    /// Creates and registers a reflection without validating the name.
    ///
    /// Prefer the declaration entry points ([`belongs_to`](Self::belongs_to)
    /// and siblings), which validate before registering.
    pub fn create_reflection(
        &mut self,
        name: &str,
        options: AssociationOptions,
    ) -> Arc<AssociationReflection> {
        self.reflections.create_reflection(name, options)
    }

    /// Declares a `belongs_to` association.
    pub fn belongs_to(
        &mut self,
        name: &str,
        options: BelongsToOptions,
    ) -> Result<Arc<AssociationReflection>, BuildError> {
        BelongsTo::build(self, name, options)
    }

    /// Declares a `has_many` association.
    pub fn has_many(
        &mut self,
        name: &str,
        options: CommonOptions,
    ) -> Result<Arc<AssociationReflection>, BuildError> {
        HasMany::build(self, name, options)
    }

    /// Declares a `has_one` association.
    pub fn has_one(
        &mut self,
        name: &str,
        options: CommonOptions,
    ) -> Result<Arc<AssociationReflection>, BuildError> {
        HasOne::build(self, name, options)
    }

    /// Declares an association from an untyped option map.
    ///
    /// Every key is checked against the whitelist of `macro_kind` before
    /// anything is registered. On error the registry is left untouched.
    pub fn declare(
        &mut self,
        macro_kind: MacroKind,
        name: &str,
        options: &RawOptions,
    ) -> Result<Arc<AssociationReflection>, BuildError> {
        builder::build_raw(self, macro_kind, name, options)
    }

    /// Describes every declared association, sorted by name.
    #[must_use]
    pub fn describe(&self) -> Vec<ReflectionSummary> {
        self.reflections
            .sorted()
            .into_iter()
            .map(|reflection| reflection.summary())
            .collect()
    }
}
