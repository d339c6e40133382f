//! Association builders.
//!
//! Each association macro has a builder type implementing
//! [`AssociationBuilder`]. A builder turns a declaration into a registered
//! reflection:
//!
//! 1. Check the name and the option values.
//! 2. Create the reflection in the owner's registry, replacing any earlier
//!    declaration of the same name.
//! 3. Return the reflection.
//!
//! The key whitelist is enforced by the typed options themselves:
//! [`BelongsToOptions`] has no field for a key `belongs_to` does not accept.
//! Untyped declarations go through [`build_raw`], which checks every key
//! before registering anything.
//!
//! Builders do not generate per-association accessors. Related resources are
//! loaded through the generic [`Finder`](crate::Finder), driven by the
//! reflection.

use std::sync::Arc;

use rr_core::{MacroKind, OptionKey};

use crate::{
    AssociationOptions, AssociationReflection, BelongsToOptions, BuildError, CommonOptions,
    RawOptions, ResourceClass,
};

/// Declaration contract shared by every association macro.
pub trait AssociationBuilder {
    /// The macro this builder declares.
    const MACRO: MacroKind;

    /// The typed options the macro accepts.
    type Options;

    /// Tags the typed options with this builder's macro.
    fn into_options(options: Self::Options) -> AssociationOptions;

    /// Validates the declaration and registers it on `owner`.
    ///
    /// On error, `owner` is left unchanged.
    fn build(
        owner: &mut ResourceClass,
        name: &str,
        options: Self::Options,
    ) -> Result<Arc<AssociationReflection>, BuildError> {
        register(owner, name, Self::into_options(options))
    }
}

/// Builder for `belongs_to`.
#[derive(Debug, Clone, Copy)]
pub struct BelongsTo;

impl AssociationBuilder for BelongsTo {
    const MACRO: MacroKind = MacroKind::BelongsTo;
    type Options = BelongsToOptions;

    fn into_options(options: Self::Options) -> AssociationOptions {
        AssociationOptions::BelongsTo(options)
    }
}

/// Builder for `has_many`.
#[derive(Debug, Clone, Copy)]
pub struct HasMany;

impl AssociationBuilder for HasMany {
    const MACRO: MacroKind = MacroKind::HasMany;
    type Options = CommonOptions;

    fn into_options(options: Self::Options) -> AssociationOptions {
        AssociationOptions::HasMany(options)
    }
}

/// Builder for `has_one`.
#[derive(Debug, Clone, Copy)]
pub struct HasOne;

impl AssociationBuilder for HasOne {
    const MACRO: MacroKind = MacroKind::HasOne;
    type Options = CommonOptions;

    fn into_options(options: Self::Options) -> AssociationOptions {
        AssociationOptions::HasOne(options)
    }
}

/// Declares an association from an untyped option map.
///
/// Fails with [`BuildError::InvalidOption`] naming the first key outside the
/// whitelist of `macro_kind`.
pub fn build_raw(
    owner: &mut ResourceClass,
    macro_kind: MacroKind,
    name: &str,
    options: &RawOptions,
) -> Result<Arc<AssociationReflection>, BuildError> {
    let options = AssociationOptions::from_raw(macro_kind, options)?;
    register(owner, name, options)
}

fn register(
    owner: &mut ResourceClass,
    name: &str,
    options: AssociationOptions,
) -> Result<Arc<AssociationReflection>, BuildError> {
    validate_name(name)?;
    validate_values(&options)?;
    Ok(owner.create_reflection(name, options))
}

/// Rejects empty names and names containing whitespace.
fn validate_name(name: &str) -> Result<(), BuildError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(BuildError::InvalidName {
            kind: "association",
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn validate_values(options: &AssociationOptions) -> Result<(), BuildError> {
    let strings = [
        (OptionKey::ClassName, options.class_name()),
        (OptionKey::ForeignKey, options.foreign_key()),
    ];

    for (key, value) in strings {
        if value.is_some_and(|value| value.trim().is_empty()) {
            return Err(BuildError::InvalidOptionValue {
                key,
                expected: "a non-empty string",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_macros() {
        assert_eq!(BelongsTo::MACRO, MacroKind::BelongsTo);
        assert_eq!(HasMany::MACRO, MacroKind::HasMany);
        assert_eq!(HasOne::MACRO, MacroKind::HasOne);
        assert_eq!(
            HasOne::into_options(CommonOptions::new()).macro_kind(),
            HasOne::MACRO
        );
    }

    #[test]
    fn test_build_returns_registered_reflection() {
        let mut post = ResourceClass::new("Post");
        let reflection = BelongsTo::build(&mut post, "author", BelongsToOptions::new()).unwrap();

        assert_eq!(reflection.macro_kind(), MacroKind::BelongsTo);
        assert!(Arc::ptr_eq(
            &reflection,
            post.reflect_on_association("author").unwrap()
        ));
    }

    #[test]
    fn test_build_rejects_blank_values() {
        let mut post = ResourceClass::new("Post");
        let err = BelongsTo::build(
            &mut post,
            "author",
            BelongsToOptions::new().with_foreign_key(" "),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            BuildError::InvalidOptionValue {
                key: OptionKey::ForeignKey,
                ..
            }
        ));
        assert!(post.reflections().is_empty());
    }

    #[test]
    fn test_build_raw_rejects_foreign_key_on_has_many() {
        let mut post = ResourceClass::new("Post");
        let mut options = RawOptions::new();
        options.insert("foreign_key".to_owned(), "post_id".into());

        let err = build_raw(&mut post, MacroKind::HasMany, "comments", &options).unwrap_err();
        assert!(err.is_option_error());
        assert!(post.reflections().is_empty());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("author").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("blog post").is_err());
    }
}
