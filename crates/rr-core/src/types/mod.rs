//! Domain types for the rr workspace.
//!
//! # Module Organization
//!
//! - [`association`] - Association macro kinds and option keys
//! - [`attributes`] - Attribute storage for resource instances
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use rr_core::{Attributes, MacroKind, OptionKey};
//! ```

pub mod association;
pub mod attributes;

pub use association::{BASE_OPTIONS, MacroKind, OptionKey};
pub use attributes::Attributes;
