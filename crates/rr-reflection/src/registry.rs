//! Per-class reflection registry.
//!
//! A [`ReflectionRegistry`] maps association names to their
//! [`AssociationReflection`]s. Every [`ResourceClass`](crate::ResourceClass)
//! owns one. Subclasses receive a copy of their parent's registry at
//! definition time, so later declarations on either side stay invisible to
//! the other.
//!
//! Reflections are shared behind [`Arc`], which makes copying a registry a
//! shallow operation: both registries point at the same reflection objects
//! until one of them redeclares a name.

use std::sync::Arc;

use rr_core::{FxHashMap, fx_hash_map};
use tracing::{debug, warn};

use crate::{AssociationOptions, AssociationReflection};

/// Association name to reflection map.
///
/// # Examples
///
/// ```
/// use rr_reflection::{BelongsToOptions, ReflectionRegistry};
/// use std::sync::Arc;
///
/// let mut registry = ReflectionRegistry::new();
/// let created = registry.create_reflection("author", BelongsToOptions::new().into());
///
/// let found = registry.get("author").unwrap();
/// assert!(Arc::ptr_eq(&created, found));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReflectionRegistry {
    reflections: FxHashMap<String, Arc<AssociationReflection>>,
}

impl ReflectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reflections: fx_hash_map(),
        }
    }

    /// Creates a reflection for `name` and stores it, replacing any earlier
    /// reflection with the same name.
    ///
    /// The macro is taken from the options variant. The returned handle is
    /// the same object later lookups return.
    pub fn create_reflection(
        &mut self,
        name: &str,
        options: AssociationOptions,
    ) -> Arc<AssociationReflection> {
        let reflection = Arc::new(AssociationReflection::new(name, options));

        let previous = self
            .reflections
            .insert(name.to_owned(), Arc::clone(&reflection));

        if let Some(previous) = previous {
            warn!(
                association = name,
                previous = %previous.macro_kind(),
                current = %reflection.macro_kind(),
                "Replacing association reflection"
            );
        } else {
            debug!(
                association = name,
                macro_kind = %reflection.macro_kind(),
                "Created association reflection"
            );
        }

        reflection
    }

    /// Returns the reflection declared under `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AssociationReflection>> {
        self.reflections.get(name)
    }

    /// Returns `true` if an association named `name` is declared.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.reflections.contains_key(name)
    }

    /// Returns the number of declared associations.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    /// Returns `true` if nothing is declared.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    /// Iterates over the reflections in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AssociationReflection>> {
        self.reflections.values()
    }

    /// Returns the declared association names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.reflections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the reflections sorted by association name.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Arc<AssociationReflection>> {
        let mut reflections: Vec<_> = self.reflections.values().collect();
        reflections.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        reflections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BelongsToOptions, CommonOptions};
    use rr_core::MacroKind;

    #[test]
    fn test_create_and_lookup_share_identity() {
        let mut registry = ReflectionRegistry::new();
        let created = registry.create_reflection("author", BelongsToOptions::new().into());

        assert!(Arc::ptr_eq(&created, registry.get("author").unwrap()));
        assert!(Arc::ptr_eq(
            registry.get("author").unwrap(),
            registry.get("author").unwrap()
        ));
        assert!(registry.contains("author"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_name() {
        let registry = ReflectionRegistry::new();
        assert!(registry.get("author").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_redeclaration_replaces() {
        let mut registry = ReflectionRegistry::new();
        let first = registry.create_reflection("author", BelongsToOptions::new().into());
        let second = registry.create_reflection(
            "author",
            AssociationOptions::HasOne(CommonOptions::new()),
        );

        assert_eq!(registry.len(), 1);
        assert!(!Arc::ptr_eq(&first, registry.get("author").unwrap()));
        assert!(Arc::ptr_eq(&second, registry.get("author").unwrap()));
        assert_eq!(
            registry.get("author").unwrap().macro_kind(),
            MacroKind::HasOne
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut parent = ReflectionRegistry::new();
        parent.create_reflection("author", BelongsToOptions::new().into());

        let mut child = parent.clone();
        child.create_reflection("editor", BelongsToOptions::new().into());
        parent.create_reflection("reviewer", BelongsToOptions::new().into());

        assert_eq!(parent.names(), vec!["author", "reviewer"]);
        assert_eq!(child.names(), vec!["author", "editor"]);
        assert!(Arc::ptr_eq(
            parent.get("author").unwrap(),
            child.get("author").unwrap()
        ));
    }

    #[test]
    fn test_sorted() {
        let mut registry = ReflectionRegistry::new();
        registry.create_reflection("owner", BelongsToOptions::new().into());
        registry.create_reflection("author", BelongsToOptions::new().into());

        let names: Vec<_> = registry.sorted().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["author", "owner"]);
    }
}
