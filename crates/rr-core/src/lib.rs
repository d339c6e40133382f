//! Core vocabulary, naming conventions, and configuration for rr.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - Association vocabulary ([`MacroKind`], [`OptionKey`]) and the per-macro
//!   option whitelists
//! - Naming conventions ([`naming`]) that derive class names, foreign keys,
//!   and foreign types from association names
//! - Resource attribute storage ([`Attributes`])
//! - Configuration structures ([`Config`]) and their [`ConfigError`]
//! - `FxHashMap` alias and constructors

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod naming;
pub mod types;

pub use config::{Config, FinderConfig, ResolverConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, fx_hash_map, fx_hash_map_with_capacity};
pub use types::{Attributes, BASE_OPTIONS, MacroKind, OptionKey};
