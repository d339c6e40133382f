//! Association reflections.
//!
//! An [`AssociationReflection`] describes one declared association: its
//! macro, its name, and the options it was declared with. From those it
//! derives, once, the facts the finder needs:
//!
//! | Fact             | Explicit option | Convention for `author`    |
//! |------------------|-----------------|----------------------------|
//! | class name       | `class_name`    | `Author` (classified name) |
//! | foreign key      | `foreign_key`   | `author_id`                |
//! | foreign type     |                 | `author_type`              |
//!
//! Polymorphic associations read the class name from the foreign-type
//! attribute of a concrete resource instead. That value differs per
//! resource, so it is never cached.
//!
//! The target class itself is not cached. [`AssociationReflection::klass`]
//! looks the cached name up in whichever [`Namespace`] it is handed, so a
//! namespace with its own type-name map, or one that redefined the class,
//! always answers for itself.

use std::sync::{Arc, OnceLock};

use rr_core::{MacroKind, naming};
use serde::Serialize;

use crate::{AssociationOptions, Namespace, ReflectionError, Resource, ResourceClass};

/// Metadata for one declared association.
///
/// Reflections are created by [`ReflectionRegistry::create_reflection`]
/// and shared behind an [`Arc`]; nothing mutates them afterwards except the
/// write-once caches of derived names.
///
/// [`ReflectionRegistry::create_reflection`]: crate::ReflectionRegistry::create_reflection
///
/// # Examples
///
/// ```
/// use rr_reflection::{AssociationReflection, BelongsToOptions};
///
/// let reflection = AssociationReflection::new("author", BelongsToOptions::new().into());
///
/// assert_eq!(reflection.class_name(None).unwrap(), "Author");
/// assert_eq!(reflection.foreign_key(), "author_id");
/// assert_eq!(reflection.foreign_type(), "author_type");
/// ```
#[derive(Debug)]
pub struct AssociationReflection {
    name: String,
    options: AssociationOptions,

    /// Derived class name; only filled for non-polymorphic associations.
    class_name: OnceLock<String>,
    foreign_key: OnceLock<String>,
    foreign_type: OnceLock<String>,
}

impl AssociationReflection {
    /// Creates a reflection from a name and its declaration options.
    #[must_use]
    pub fn new(name: impl Into<String>, options: AssociationOptions) -> Self {
        Self {
            name: name.into(),
            options,
            class_name: OnceLock::new(),
            foreign_key: OnceLock::new(),
            foreign_type: OnceLock::new(),
        }
    }

    /// Returns the association name (`belongs_to :author` returns `author`).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the macro the association was declared with.
    #[inline]
    #[must_use]
    pub const fn macro_kind(&self) -> MacroKind {
        self.options.macro_kind()
    }

    /// Returns the options the association was declared with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &AssociationOptions {
        &self.options
    }

    /// Returns `true` if the target class is read from each resource.
    #[inline]
    #[must_use]
    pub const fn is_polymorphic(&self) -> bool {
        self.options.is_polymorphic()
    }

    /// Returns the name of the target class.
    ///
    /// An explicit `class_name` option wins. Otherwise a polymorphic
    /// association reads the foreign-type attribute of `resource`, and any
    /// other association classifies its own name.
    ///
    /// # Errors
    ///
    /// - [`ReflectionError::MissingPolymorphicContext`] if the association is
    ///   polymorphic and `resource` is `None`.
    /// - [`ReflectionError::MissingForeignType`] if the resource has no
    ///   string in its foreign-type attribute.
    pub fn class_name(&self, resource: Option<&Resource>) -> Result<String, ReflectionError> {
        if let Some(explicit) = self.options.class_name() {
            return Ok(self
                .class_name
                .get_or_init(|| naming::camelize(explicit))
                .clone());
        }

        if self.is_polymorphic() {
            return self.polymorphic_class_name(resource);
        }

        Ok(self
            .class_name
            .get_or_init(|| naming::classify(&self.name))
            .clone())
    }

    fn polymorphic_class_name(&self, resource: Option<&Resource>) -> Result<String, ReflectionError> {
        let resource = resource.ok_or_else(|| ReflectionError::MissingPolymorphicContext {
            association: self.name.clone(),
        })?;

        let field = self.foreign_type();
        resource
            .attributes()
            .get_str(field)
            .map(str::to_owned)
            .ok_or_else(|| ReflectionError::MissingForeignType {
                association: self.name.clone(),
                field: field.to_owned(),
            })
    }

    /// Returns the attribute holding the related resource's id.
    pub fn foreign_key(&self) -> &str {
        self.foreign_key.get_or_init(|| {
            self.options
                .foreign_key()
                .map_or_else(|| naming::foreign_key(&self.name), str::to_owned)
        })
    }

    /// Returns the attribute holding the related resource's class name.
    ///
    /// Always `<name>_type`; `belongs_to` accepts no override for it.
    pub fn foreign_type(&self) -> &str {
        self.foreign_type.get_or_init(|| naming::foreign_type(&self.name))
    }

    /// Resolves the target class in `namespace`.
    ///
    /// The class name is looked up in the namespace's explicit type-name map
    /// first, then among its defined classes. Only the class name is cached,
    /// so each call answers from the namespace it is given.
    ///
    /// # Errors
    ///
    /// The errors of [`class_name`](Self::class_name), and
    /// [`ReflectionError::NameResolution`] if `namespace` knows no class of
    /// that name.
    pub fn klass(
        &self,
        namespace: &Namespace,
        resource: Option<&Resource>,
    ) -> Result<Arc<ResourceClass>, ReflectionError> {
        let class_name = self.class_name(resource)?;
        namespace.resolve(&class_name)
    }

    /// Returns a serializable description of this reflection.
    #[must_use]
    pub fn summary(&self) -> ReflectionSummary {
        ReflectionSummary {
            name: self.name.clone(),
            macro_kind: self.macro_kind(),
            class_name: self.class_name(None).ok(),
            polymorphic: self.is_polymorphic(),
            foreign_key: self.foreign_key().to_owned(),
            foreign_type: self.foreign_type().to_owned(),
        }
    }
}

/// Serializable description of a reflection, for introspection tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectionSummary {
    /// Association name.
    pub name: String,

    /// Declaring macro.
    #[serde(rename = "macro")]
    pub macro_kind: MacroKind,

    /// Target class name; `None` when it depends on each resource.
    pub class_name: Option<String>,

    /// Whether the association is polymorphic.
    pub polymorphic: bool,

    /// Foreign-key attribute.
    pub foreign_key: String,

    /// Foreign-type attribute.
    pub foreign_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BelongsToOptions, CommonOptions, TypeNameResolver};
    use rr_core::Attributes;
    use serde_json::json;

    fn belongs_to(name: &str, options: BelongsToOptions) -> AssociationReflection {
        AssociationReflection::new(name, options.into())
    }

    fn resource(class: &str, attrs: serde_json::Value) -> Resource {
        Resource::new(
            Arc::new(ResourceClass::new(class)),
            Attributes::from_value(attrs).unwrap_or_default(),
        )
    }

    #[test]
    fn test_conventions() {
        let reflection = belongs_to("author", BelongsToOptions::new());
        assert_eq!(reflection.name(), "author");
        assert_eq!(reflection.macro_kind(), MacroKind::BelongsTo);
        assert_eq!(reflection.foreign_key(), "author_id");
        assert_eq!(reflection.foreign_type(), "author_type");
        assert_eq!(reflection.class_name(None).unwrap(), "Author");
    }

    #[test]
    fn test_conventions_lowercase_foreign_names() {
        let reflection = belongs_to("Owner", BelongsToOptions::new());
        assert_eq!(reflection.foreign_key(), "owner_id");
        assert_eq!(reflection.foreign_type(), "owner_type");
        assert_eq!(reflection.class_name(None).unwrap(), "Owner");
    }

    #[test]
    fn test_classifies_plural_names() {
        let reflection = AssociationReflection::new(
            "comments",
            AssociationOptions::HasMany(CommonOptions::new()),
        );
        assert_eq!(reflection.class_name(None).unwrap(), "Comment");
    }

    #[test]
    fn test_class_name_override() {
        let reflection = belongs_to("author", BelongsToOptions::new().with_class_name("Writer"));
        assert_eq!(reflection.class_name(None).unwrap(), "Writer");

        let reflection = belongs_to("author", BelongsToOptions::new().with_class_name("people"));
        assert_eq!(reflection.class_name(None).unwrap(), "People");

        let reflection =
            belongs_to("author", BelongsToOptions::new().with_class_name("admin/writer"));
        assert_eq!(reflection.class_name(None).unwrap(), "Admin::Writer");
    }

    #[test]
    fn test_class_name_override_beats_polymorphic() {
        let reflection = belongs_to(
            "owner",
            BelongsToOptions::new().polymorphic().with_class_name("Company"),
        );
        assert_eq!(reflection.class_name(None).unwrap(), "Company");
    }

    #[test]
    fn test_foreign_key_override() {
        let reflection = belongs_to(
            "owner",
            BelongsToOptions::new().polymorphic().with_foreign_key("owned_by"),
        );
        assert_eq!(reflection.foreign_key(), "owned_by");
        assert_eq!(reflection.foreign_type(), "owner_type");
    }

    #[test]
    fn test_polymorphic_reads_instance() {
        let reflection = belongs_to("owner", BelongsToOptions::new().polymorphic());
        let owned = resource("Asset", json!({"owner_id": 1, "owner_type": "Company"}));
        assert_eq!(reflection.class_name(Some(&owned)).unwrap(), "Company");
    }

    #[test]
    fn test_polymorphic_without_instance() {
        let reflection = belongs_to("owner", BelongsToOptions::new().polymorphic());
        let err = reflection.class_name(None).unwrap_err();
        assert_eq!(
            err,
            ReflectionError::MissingPolymorphicContext {
                association: "owner".to_owned()
            }
        );
    }

    #[test]
    fn test_polymorphic_is_resolved_per_instance() {
        let reflection = belongs_to("owner", BelongsToOptions::new().polymorphic());
        let first = resource("Asset", json!({"owner_type": "Company"}));
        let second = resource("Asset", json!({"owner_type": "Person"}));

        assert_eq!(reflection.class_name(Some(&first)).unwrap(), "Company");
        assert_eq!(reflection.class_name(Some(&second)).unwrap(), "Person");
    }

    #[test]
    fn test_polymorphic_missing_type_value() {
        let reflection = belongs_to("owner", BelongsToOptions::new().polymorphic());
        let orphan = resource("Asset", json!({"owner_id": 1, "owner_type": null}));
        assert!(matches!(
            reflection.class_name(Some(&orphan)),
            Err(ReflectionError::MissingForeignType { ref field, .. }) if field == "owner_type"
        ));
    }

    #[test]
    fn test_foreign_key_is_stable_snapshot() {
        let mut options = BelongsToOptions::new().with_foreign_key("written_by");
        let reflection = belongs_to("author", options.clone());

        options.foreign_key = Some("edited_by".to_owned());
        assert_eq!(options.foreign_key.as_deref(), Some("edited_by"));

        let first = reflection.foreign_key();
        let second = reflection.foreign_key();
        assert_eq!(first, "written_by");
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_klass_answers_per_namespace() {
        let reflection = belongs_to("author", BelongsToOptions::new());

        let mut first = Namespace::new();
        let author = first.define(ResourceClass::new("Author"));

        let fake_author = Arc::new(ResourceClass::new("FakeAuthor"));
        let mut resolver = TypeNameResolver::new();
        resolver.register("Author", Arc::clone(&fake_author));
        let second = Namespace::with_resolver(resolver);

        assert!(Arc::ptr_eq(&reflection.klass(&first, None).unwrap(), &author));
        assert!(Arc::ptr_eq(&reflection.klass(&second, None).unwrap(), &fake_author));
        assert!(Arc::ptr_eq(&reflection.klass(&first, None).unwrap(), &author));
    }

    #[test]
    fn test_klass_follows_redefinition() {
        let reflection = belongs_to("author", BelongsToOptions::new());

        let mut namespace = Namespace::new();
        let old = namespace.define(ResourceClass::new("Author"));
        assert!(Arc::ptr_eq(&reflection.klass(&namespace, None).unwrap(), &old));

        let new = namespace.define(ResourceClass::new("Author"));
        let resolved = reflection.klass(&namespace, None).unwrap();
        assert!(Arc::ptr_eq(&resolved, &new));
        assert!(!Arc::ptr_eq(&resolved, &old));
    }

    #[test]
    fn test_summary() {
        let summary = belongs_to("owner", BelongsToOptions::new().polymorphic()).summary();
        assert_eq!(summary.class_name, None);
        assert!(summary.polymorphic);
        assert_eq!(summary.foreign_type, "owner_type");

        let summary = belongs_to("author", BelongsToOptions::new()).summary();
        assert_eq!(summary.class_name.as_deref(), Some("Author"));
    }
}
