//! Declaration options for association macros.
//!
//! Each macro has its own closed options structure: [`BelongsToOptions`] for
//! `belongs_to`, [`CommonOptions`] for the macros that only accept the base
//! keys. A typed declaration cannot name a key its macro does not accept.
//!
//! Declarations that arrive as data (manifests, tooling) use
//! [`AssociationOptions::from_raw`], which enforces the same whitelist at
//! runtime and reports the first offending key.
//!
//! # Examples
//!
//! ```
//! use rr_reflection::{AssociationOptions, BelongsToOptions, RawOptions};
//! use rr_core::MacroKind;
//! use serde_json::json;
//!
//! let typed = BelongsToOptions::new().polymorphic();
//!
//! let mut raw = RawOptions::new();
//! raw.insert("polymorphic".to_owned(), json!(true));
//! let parsed = AssociationOptions::from_raw(MacroKind::BelongsTo, &raw).unwrap();
//!
//! assert_eq!(parsed, AssociationOptions::BelongsTo(typed));
//! ```

use rr_core::{MacroKind, OptionKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use crate::BuildError;

/// An untyped option map, keyed by wire option names.
pub type RawOptions = serde_json::Map<String, Value>;

/// Options accepted by every macro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonOptions {
    /// Overrides the class name derived from the association name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl CommonOptions {
    /// Creates empty options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit class name.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// Options accepted by `belongs_to`.
///
/// # Examples
///
/// ```
/// use rr_reflection::BelongsToOptions;
///
/// let options = BelongsToOptions::new()
///     .with_class_name("Person")
///     .with_foreign_key("written_by");
///
/// assert_eq!(options.class_name.as_deref(), Some("Person"));
/// assert!(!options.polymorphic);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BelongsToOptions {
    /// Overrides the class name derived from the association name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Overrides the `<name>_id` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    /// Reads the target class from the foreign-type attribute of each
    /// resource.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub polymorphic: bool,
}

impl BelongsToOptions {
    /// Creates empty options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit class name.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the foreign-key attribute.
    #[must_use]
    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    /// Marks the association as polymorphic.
    #[must_use]
    pub const fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }
}

/// The options of one declaration, tagged with the macro they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "macro", content = "options", rename_all = "snake_case")]
pub enum AssociationOptions {
    /// `belongs_to` options.
    BelongsTo(BelongsToOptions),

    /// `has_many` options.
    HasMany(CommonOptions),

    /// `has_one` options.
    HasOne(CommonOptions),
}

impl AssociationOptions {
    /// Returns the macro these options were declared for.
    #[inline]
    #[must_use]
    pub const fn macro_kind(&self) -> MacroKind {
        match self {
            Self::BelongsTo(_) => MacroKind::BelongsTo,
            Self::HasMany(_) => MacroKind::HasMany,
            Self::HasOne(_) => MacroKind::HasOne,
        }
    }

    /// Returns the explicit class name, if one was given.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::BelongsTo(options) => options.class_name.as_deref(),
            Self::HasMany(options) | Self::HasOne(options) => options.class_name.as_deref(),
        }
    }

    /// Returns the explicit foreign-key attribute, if one was given.
    #[must_use]
    pub fn foreign_key(&self) -> Option<&str> {
        match self {
            Self::BelongsTo(options) => options.foreign_key.as_deref(),
            Self::HasMany(_) | Self::HasOne(_) => None,
        }
    }

    /// Returns `true` for polymorphic `belongs_to` options.
    #[must_use]
    pub const fn is_polymorphic(&self) -> bool {
        matches!(self, Self::BelongsTo(options) if options.polymorphic)
    }

    /// Returns the keys that are set, in declaration order.
    #[must_use]
    pub fn keys(&self) -> SmallVec<[OptionKey; 3]> {
        let mut keys = SmallVec::new();
        if self.class_name().is_some() {
            keys.push(OptionKey::ClassName);
        }
        if self.foreign_key().is_some() {
            keys.push(OptionKey::ForeignKey);
        }
        if self.is_polymorphic() {
            keys.push(OptionKey::Polymorphic);
        }
        keys
    }

    /// Parses an untyped option map for `macro_kind`.
    ///
    /// Every key is checked against the macro's whitelist before any value is
    /// read, so an unknown key is reported even when other values are also
    /// malformed. `null` values read as unset.
    pub fn from_raw(macro_kind: MacroKind, raw: &RawOptions) -> Result<Self, BuildError> {
        let mut keys = SmallVec::<[(OptionKey, &Value); 3]>::new();
        for (name, value) in raw {
            match OptionKey::from_name(name) {
                Some(key) if macro_kind.accepts(key) => keys.push((key, value)),
                _ => return Err(BuildError::invalid_option(macro_kind, name.as_str())),
            }
        }

        let mut options = BelongsToOptions::default();
        for (key, value) in keys {
            match key {
                OptionKey::ClassName => options.class_name = string_value(key, value)?,
                OptionKey::ForeignKey => options.foreign_key = string_value(key, value)?,
                OptionKey::Polymorphic => {
                    options.polymorphic = match value {
                        Value::Bool(flag) => *flag,
                        Value::Null => false,
                        _ => {
                            return Err(BuildError::InvalidOptionValue {
                                key,
                                expected: "a boolean",
                            });
                        }
                    };
                }
            }
        }

        let common = CommonOptions {
            class_name: options.class_name.clone(),
        };
        Ok(match macro_kind {
            MacroKind::BelongsTo => Self::BelongsTo(options),
            MacroKind::HasMany => Self::HasMany(common),
            MacroKind::HasOne => Self::HasOne(common),
        })
    }
}

impl From<BelongsToOptions> for AssociationOptions {
    fn from(options: BelongsToOptions) -> Self {
        Self::BelongsTo(options)
    }
}

fn string_value(key: OptionKey, value: &Value) -> Result<Option<String>, BuildError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        _ => Err(BuildError::InvalidOptionValue {
            key,
            expected: "a non-empty string",
        }),
    }
}
