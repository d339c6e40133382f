//! Association vocabulary shared by every crate in the workspace.
//!
//! This module names the kinds of associations a resource class can declare
//! ([`MacroKind`]) and the option keys a declaration may carry
//! ([`OptionKey`]). Each macro kind owns a closed whitelist of option keys:
//! the base set every macro accepts, plus the keys that macro adds.
//!
//! # Examples
//!
//! ```
//! use rr_core::{MacroKind, OptionKey};
//!
//! assert!(MacroKind::BelongsTo.accepts(OptionKey::Polymorphic));
//! assert!(!MacroKind::HasMany.accepts(OptionKey::Polymorphic));
//! assert_eq!(OptionKey::from_name("foreign_key"), Some(OptionKey::ForeignKey));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Option keys accepted by every association macro.
pub const BASE_OPTIONS: &[OptionKey] = &[OptionKey::ClassName];

/// Option keys `belongs_to` accepts on top of [`BASE_OPTIONS`].
const BELONGS_TO_OPTIONS: &[OptionKey] = &[OptionKey::ForeignKey, OptionKey::Polymorphic];

/// The kind of a declared association.
///
/// # Examples
///
/// ```
/// use rr_core::MacroKind;
///
/// assert_eq!(MacroKind::BelongsTo.label(), "belongs_to");
/// assert_eq!(MacroKind::HasOne.to_string(), "has_one");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroKind {
    /// The owning resource stores the foreign key of the related resource.
    BelongsTo,

    /// The related resources store the owner's key.
    HasMany,

    /// A single related resource stores the owner's key.
    HasOne,
}

impl MacroKind {
    /// Returns the declaration name of this macro (e.g. `belongs_to`).
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongs_to",
            Self::HasMany => "has_many",
            Self::HasOne => "has_one",
        }
    }

    /// Returns the keys this macro adds on top of [`BASE_OPTIONS`].
    #[inline]
    #[must_use]
    pub const fn extra_options(self) -> &'static [OptionKey] {
        match self {
            Self::BelongsTo => BELONGS_TO_OPTIONS,
            Self::HasMany | Self::HasOne => &[],
        }
    }

    /// Returns the complete whitelist of option keys for this macro.
    ///
    /// # Examples
    ///
    /// ```
    /// use rr_core::{MacroKind, OptionKey};
    ///
    /// let keys = MacroKind::BelongsTo.valid_options();
    /// assert_eq!(keys.first(), Some(&OptionKey::ClassName));
    /// assert_eq!(keys.len(), 3);
    /// assert_eq!(MacroKind::HasMany.valid_options().len(), 1);
    /// ```
    #[must_use]
    pub fn valid_options(self) -> SmallVec<[OptionKey; 3]> {
        let mut keys = SmallVec::new();
        keys.extend_from_slice(BASE_OPTIONS);
        keys.extend_from_slice(self.extra_options());
        keys
    }

    /// Returns `true` if `key` is in this macro's whitelist.
    #[inline]
    #[must_use]
    pub fn accepts(self, key: OptionKey) -> bool {
        BASE_OPTIONS.contains(&key) || self.extra_options().contains(&key)
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recognized association option key.
///
/// Keys are spelled in `snake_case` on the wire (manifests, raw option maps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKey {
    /// Overrides the derived target class name.
    ClassName,

    /// Overrides the `<name>_id` foreign-key attribute.
    ForeignKey,

    /// Marks the association as polymorphic.
    Polymorphic,
}

impl OptionKey {
    /// Every known option key, in declaration order.
    pub const ALL: [Self; 3] = [Self::ClassName, Self::ForeignKey, Self::Polymorphic];

    /// Returns the wire spelling of this key.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClassName => "class_name",
            Self::ForeignKey => "foreign_key",
            Self::Polymorphic => "polymorphic",
        }
    }

    /// Parses a wire key. Returns `None` for keys no macro recognizes.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
