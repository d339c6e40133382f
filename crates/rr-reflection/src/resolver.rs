//! Class-name resolution.
//!
//! Reflections derive class *names*; turning a name into a class goes through
//! two lookups, in order:
//!
//! 1. The [`TypeNameResolver`], an explicit name → class map. It is the
//!    escape hatch for names that should not resolve to the class of the
//!    same name (renamed services, test doubles). A miss is not an error.
//! 2. The [`Namespace`] itself, which holds every defined class by name.
//!
//! Only a miss in both is an error ([`ReflectionError::NameResolution`]).
//!
//! The resolver is owned by the namespace and handed to it at construction
//! ([`Namespace::with_resolver`]) or filled from configuration
//! ([`Namespace::apply_overrides`]). There is no process-wide map.

use std::sync::Arc;

use rr_core::{FxHashMap, ResolverConfig, fx_hash_map, fx_hash_map_with_capacity};
use tracing::{debug, trace, warn};

use crate::{BuildError, ReflectionError, ResourceClass};

/// Explicit type-name → class map. Last registration wins.
#[derive(Debug, Clone, Default)]
pub struct TypeNameResolver {
    classes: FxHashMap<String, Arc<ResourceClass>>,
}

impl TypeNameResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: fx_hash_map(),
        }
    }

    /// Maps `name` to `class`, returning the class it was mapped to before.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        class: Arc<ResourceClass>,
    ) -> Option<Arc<ResourceClass>> {
        let name = name.into();
        debug!(name = %name, class = class.name(), "Registered type name");
        self.classes.insert(name, class)
    }

    /// Returns the class registered for `name`, if any.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<ResourceClass>> {
        self.classes.get(name).map(Arc::clone)
    }

    /// Returns the number of registered names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no names are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The set of defined resource classes, plus the resolver consulted first.
///
/// # Examples
///
/// ```
/// use rr_reflection::{BelongsToOptions, Namespace, ResourceClass};
/// use std::sync::Arc;
///
/// let mut namespace = Namespace::new();
/// let person = namespace.define(ResourceClass::new("Person"));
///
/// let mut post = ResourceClass::new("Post");
/// let author = post
///     .belongs_to("author", BelongsToOptions::new().with_class_name("Person"))
///     .unwrap();
/// namespace.define(post);
///
/// let class = author.klass(&namespace, None).unwrap();
/// assert!(Arc::ptr_eq(&class, &person));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    classes: FxHashMap<String, Arc<ResourceClass>>,
    resolver: TypeNameResolver,
}

impl Namespace {
    /// Creates an empty namespace with an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty namespace consulting `resolver` first.
    #[must_use]
    pub fn with_resolver(resolver: TypeNameResolver) -> Self {
        Self {
            classes: fx_hash_map(),
            resolver,
        }
    }

    /// Creates an empty namespace with room for `capacity` classes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            classes: fx_hash_map_with_capacity(capacity),
            resolver: TypeNameResolver::new(),
        }
    }

    /// Returns the explicit type-name map.
    #[inline]
    #[must_use]
    pub const fn resolver(&self) -> &TypeNameResolver {
        &self.resolver
    }

    /// Returns the explicit type-name map for registration.
    #[inline]
    pub const fn resolver_mut(&mut self) -> &mut TypeNameResolver {
        &mut self.resolver
    }

    /// Adds a finished class, replacing any class of the same name.
    pub fn define(&mut self, class: ResourceClass) -> Arc<ResourceClass> {
        let class = Arc::new(class);
        let previous = self
            .classes
            .insert(class.name().to_owned(), Arc::clone(&class));

        if previous.is_some() {
            warn!(class = class.name(), "Redefined resource class");
        } else {
            debug!(
                class = class.name(),
                associations = class.reflections().len(),
                "Defined resource class"
            );
        }

        class
    }

    /// Returns the class defined under `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceClass>> {
        self.classes.get(name)
    }

    /// Returns `true` if a class named `name` is defined.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns the number of defined classes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is defined.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns every defined class, sorted by name.
    #[must_use]
    pub fn classes(&self) -> Vec<&Arc<ResourceClass>> {
        let mut classes: Vec<_> = self.classes.values().collect();
        classes.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        classes
    }

    /// Looks up a fully qualified class name among the defined classes.
    ///
    /// A leading `::` is ignored. The explicit type-name map is not
    /// consulted.
    pub fn constantize(&self, name: &str) -> Result<Arc<ResourceClass>, ReflectionError> {
        let qualified = name.strip_prefix("::").unwrap_or(name);
        self.classes
            .get(qualified)
            .map(Arc::clone)
            .ok_or_else(|| ReflectionError::name_resolution(name))
    }

    /// Resolves a derived class name: explicit type-name map first, then the
    /// defined classes.
    pub fn resolve(&self, class_name: &str) -> Result<Arc<ResourceClass>, ReflectionError> {
        if let Some(class) = self.resolver.find(class_name) {
            trace!(name = class_name, class = class.name(), "Resolved through type map");
            return Ok(class);
        }

        let class = self.constantize(class_name)?;
        trace!(name = class_name, "Resolved through namespace");
        Ok(class)
    }

    /// Registers the configured type-name overrides.
    ///
    /// Each override maps a derived name to the name of a defined class.
    /// Fails on the first override whose target is not defined.
    pub fn apply_overrides(&mut self, config: &ResolverConfig) -> Result<(), BuildError> {
        for (alias, target) in &config.type_overrides {
            let class = self
                .classes
                .get(target)
                .map(Arc::clone)
                .ok_or_else(|| BuildError::UnknownOverrideTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                })?;
            self.resolver.register(alias.as_str(), class);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BelongsToOptions;

    #[test]
    fn test_resolver_miss_is_none() {
        let resolver = TypeNameResolver::new();
        assert!(resolver.find("Writer").is_none());
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_resolver_last_write_wins() {
        let person = Arc::new(ResourceClass::new("Person"));
        let company = Arc::new(ResourceClass::new("Company"));

        let mut resolver = TypeNameResolver::new();
        assert!(resolver.register("Owner", Arc::clone(&person)).is_none());
        let previous = resolver.register("Owner", Arc::clone(&company)).unwrap();

        assert!(Arc::ptr_eq(&previous, &person));
        assert!(Arc::ptr_eq(&resolver.find("Owner").unwrap(), &company));
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_resolve_prefers_type_map() {
        let mut namespace = Namespace::new();
        let writer = namespace.define(ResourceClass::new("Writer"));
        let person = namespace.define(ResourceClass::new("Person"));
        namespace.resolver_mut().register("Writer", Arc::clone(&person));

        assert!(Arc::ptr_eq(&namespace.resolve("Writer").unwrap(), &person));
        assert!(Arc::ptr_eq(&namespace.constantize("Writer").unwrap(), &writer));
    }

    #[test]
    fn test_resolve_falls_through_to_namespace() {
        let mut namespace = Namespace::new();
        let author = namespace.define(ResourceClass::new("Author"));

        assert!(Arc::ptr_eq(&namespace.resolve("Author").unwrap(), &author));
        assert!(Arc::ptr_eq(&namespace.resolve("::Author").unwrap(), &author));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let namespace = Namespace::new();
        assert_eq!(
            namespace.resolve("Writer").unwrap_err(),
            ReflectionError::name_resolution("Writer")
        );
    }

    #[test]
    fn test_injected_resolver() {
        let test_double = Arc::new(ResourceClass::new("FakeAuthor"));
        let mut resolver = TypeNameResolver::new();
        resolver.register("Author", Arc::clone(&test_double));

        let namespace = Namespace::with_resolver(resolver);
        assert!(Arc::ptr_eq(&namespace.resolve("Author").unwrap(), &test_double));
    }

    #[test]
    fn test_class_name_override_resolves_writer() {
        let mut namespace = Namespace::new();
        let writer = namespace.define(ResourceClass::new("Writer"));

        let mut post = ResourceClass::new("Post");
        let author = post
            .belongs_to("author", BelongsToOptions::new().with_class_name("Writer"))
            .unwrap();
        namespace.define(post);

        assert!(Arc::ptr_eq(&author.klass(&namespace, None).unwrap(), &writer));
    }

    #[test]
    fn test_apply_overrides() {
        let mut namespace = Namespace::new();
        let person = namespace.define(ResourceClass::new("Person"));

        let mut config = ResolverConfig::default();
        config
            .type_overrides
            .insert("Author".to_owned(), "Person".to_owned());
        namespace.apply_overrides(&config).unwrap();

        assert!(Arc::ptr_eq(&namespace.resolve("Author").unwrap(), &person));
    }

    #[test]
    fn test_apply_overrides_unknown_target() {
        let mut namespace = Namespace::new();
        let mut config = ResolverConfig::default();
        config
            .type_overrides
            .insert("Author".to_owned(), "Person".to_owned());

        let err = namespace.apply_overrides(&config).unwrap_err();
        assert!(matches!(err, BuildError::UnknownOverrideTarget { ref target, .. } if target == "Person"));
    }

    #[test]
    fn test_classes_sorted() {
        let mut namespace = Namespace::new();
        namespace.define(ResourceClass::new("Post"));
        namespace.define(ResourceClass::new("Author"));

        let names: Vec<_> = namespace.classes().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Author", "Post"]);
        assert_eq!(namespace.len(), 2);
        assert!(namespace.contains("Post"));
    }
}
