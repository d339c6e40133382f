//! Error types for the rr-reflection crate.
//!
//! Two error types split failures by when they happen:
//!
//! - [`BuildError`] - raised while a class is being declared (invalid option
//!   keys, malformed manifests). Fatal to the declaration.
//! - [`ReflectionError`] - raised while an association is being resolved
//!   against a namespace or a concrete resource.
//!
//! Failures of the transport layer are neither: they pass through the
//! finder untouched (see [`Transport`](crate::Transport)).

use rr_core::{MacroKind, OptionKey};
use smallvec::SmallVec;

/// Errors raised while declaring associations.
///
/// # Examples
///
/// ```
/// use rr_reflection::{BuildError, RawOptions, ResourceClass};
/// use rr_core::MacroKind;
/// use serde_json::json;
///
/// let mut post = ResourceClass::new("Post");
/// let mut options = RawOptions::new();
/// options.insert("dependent".to_owned(), json!("destroy"));
///
/// let err = post.declare(MacroKind::BelongsTo, "author", &options).unwrap_err();
/// assert!(matches!(err, BuildError::InvalidOption { ref key, .. } if key == "dependent"));
/// assert!(post.reflections().is_empty());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An option key is outside the macro's whitelist.
    #[error(
        "unknown option '{key}' for {macro_kind} (valid options: {})",
        join_keys(.valid)
    )]
    InvalidOption {
        /// The macro being declared.
        macro_kind: MacroKind,
        /// The offending key, as written.
        key: String,
        /// The keys the macro accepts.
        valid: SmallVec<[OptionKey; 3]>,
    },

    /// An option key is valid but its value has the wrong shape.
    #[error("option '{key}' must be {expected}")]
    InvalidOptionValue {
        /// The option whose value was rejected.
        key: OptionKey,
        /// Description of the accepted values.
        expected: &'static str,
    },

    /// An association or class name is empty or contains whitespace.
    #[error("invalid {kind} name '{name}'")]
    InvalidName {
        /// What was being named (`association` or `class`).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A manifest class extends a class that has not been defined before it.
    #[error("class '{class}' extends undefined class '{superclass}'")]
    UnknownSuperclass {
        /// The class being defined.
        class: String,
        /// The missing superclass.
        superclass: String,
    },

    /// A manifest defines the same class twice.
    #[error("class '{class}' is defined more than once")]
    DuplicateClass {
        /// The duplicated class name.
        class: String,
    },

    /// A type-name override points at a class that is not defined.
    #[error("type override '{alias}' targets undefined class '{target}'")]
    UnknownOverrideTarget {
        /// The overridden type name.
        alias: String,
        /// The missing target class.
        target: String,
    },

    /// A declaration inside a manifest failed.
    #[error("{class}.{association}: {source}")]
    Declaration {
        /// The class holding the declaration.
        class: String,
        /// The association being declared.
        association: String,
        /// What went wrong.
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Creates a new [`BuildError::InvalidOption`] for `key` under `macro_kind`.
    #[must_use]
    pub fn invalid_option(macro_kind: MacroKind, key: impl Into<String>) -> Self {
        Self::InvalidOption {
            macro_kind,
            key: key.into(),
            valid: macro_kind.valid_options(),
        }
    }

    /// Wraps `source` with the class and association it was raised for.
    #[must_use]
    pub fn declaration(
        class: impl Into<String>,
        association: impl Into<String>,
        source: Self,
    ) -> Self {
        Self::Declaration {
            class: class.into(),
            association: association.into(),
            source: Box::new(source),
        }
    }

    /// Returns the innermost error, skipping declaration context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Declaration { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` if the error concerns the options of a declaration.
    #[must_use]
    pub fn is_option_error(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidOption { .. } | Self::InvalidOptionValue { .. }
        )
    }
}

fn join_keys(keys: &[OptionKey]) -> String {
    keys.iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while resolving an association.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReflectionError {
    /// The derived class name matches no registered class.
    #[error("uninitialized constant {name}")]
    NameResolution {
        /// The class name that could not be resolved.
        name: String,
    },

    /// A polymorphic class name was requested without a resource to read the
    /// foreign type from.
    #[error("polymorphic association '{association}' needs a resource to resolve its class")]
    MissingPolymorphicContext {
        /// The polymorphic association.
        association: String,
    },

    /// The resource carries no value in the foreign-type attribute.
    #[error("polymorphic association '{association}' has no value in '{field}'")]
    MissingForeignType {
        /// The polymorphic association.
        association: String,
        /// The foreign-type attribute that was empty.
        field: String,
    },

    /// The class declares no association with this name.
    #[error("{class} has no association named '{association}'")]
    UnknownAssociation {
        /// The class that was asked.
        class: String,
        /// The requested association.
        association: String,
    },

    /// The association's macro has no finder.
    #[error("no finder for {macro_kind} association '{association}'")]
    UnsupportedFinder {
        /// The association.
        association: String,
        /// Its macro.
        macro_kind: MacroKind,
    },
}

impl ReflectionError {
    /// Creates a new [`ReflectionError::NameResolution`] error.
    #[inline]
    pub fn name_resolution(name: impl Into<String>) -> Self {
        Self::NameResolution { name: name.into() }
    }

    /// Returns `true` if the error comes from calling the API the wrong way
    /// rather than from the data being resolved.
    #[inline]
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::MissingPolymorphicContext { .. }
                | Self::UnknownAssociation { .. }
                | Self::UnsupportedFinder { .. }
        )
    }
}
