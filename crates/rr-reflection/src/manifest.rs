//! Declaration manifests.
//!
//! A manifest declares resource classes and their associations as data:
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Author" },
//!     {
//!       "name": "Post",
//!       "associations": [
//!         { "macro": "belongs_to", "name": "author" },
//!         { "macro": "has_many", "name": "comments" }
//!       ]
//!     },
//!     {
//!       "name": "Article",
//!       "extends": "Post",
//!       "associations": [
//!         { "macro": "belongs_to", "name": "editor", "options": { "class_name": "Author" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Classes are defined in order. A class that `extends` another starts from
//! a copy of that class's associations, so the superclass must come first.
//! Every declaration goes through the same whitelist as the typed API.

use std::fs;

use camino::Utf8Path;
use rr_core::{ConfigError, MacroKind, ResolverConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{BuildError, Namespace, RawOptions, ResourceClass};

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Class declarations, in definition order.
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

/// One class in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDeclaration {
    /// Class name.
    pub name: String,

    /// Name of an earlier class whose associations this one inherits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Association declarations, in order.
    #[serde(default)]
    pub associations: Vec<AssociationDeclaration>,
}

/// One association declaration in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationDeclaration {
    /// Declaring macro.
    #[serde(rename = "macro")]
    pub macro_kind: MacroKind,

    /// Association name.
    pub name: String,

    /// Untyped options, checked against the macro's whitelist on load.
    #[serde(default)]
    pub options: RawOptions,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a manifest file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path.as_std_path()).map_err(|e| ConfigError::read(path, e))?;
        Self::from_json_str(&contents)
    }

    /// Defines every class and registers the type-name overrides.
    ///
    /// Fails on the first invalid class or declaration. Declaration errors
    /// are wrapped in [`BuildError::Declaration`] naming the class and
    /// association.
    pub fn load(&self, resolver: &ResolverConfig) -> Result<Namespace, BuildError> {
        let mut namespace = Namespace::with_capacity(self.classes.len());
        let mut associations = 0;

        for declaration in &self.classes {
            let class = declaration.define(&namespace)?;
            associations += declaration.associations.len();
            namespace.define(class);
        }

        namespace.apply_overrides(resolver)?;

        info!(
            classes = namespace.len(),
            associations,
            overrides = namespace.resolver().len(),
            "Loaded manifest"
        );

        Ok(namespace)
    }
}

impl ClassDeclaration {
    fn define(&self, namespace: &Namespace) -> Result<ResourceClass, BuildError> {
        if self.name.is_empty() || self.name.chars().any(char::is_whitespace) {
            return Err(BuildError::InvalidName {
                kind: "class",
                name: self.name.clone(),
            });
        }

        if namespace.contains(&self.name) {
            return Err(BuildError::DuplicateClass {
                class: self.name.clone(),
            });
        }

        let mut class = match &self.extends {
            Some(superclass) => namespace
                .get(superclass)
                .ok_or_else(|| BuildError::UnknownSuperclass {
                    class: self.name.clone(),
                    superclass: superclass.clone(),
                })?
                .subclass(self.name.as_str()),
            None => ResourceClass::new(self.name.as_str()),
        };

        for association in &self.associations {
            class
                .declare(association.macro_kind, &association.name, &association.options)
                .map_err(|source| BuildError::declaration(&self.name, &association.name, source))?;
        }

        Ok(class)
    }
}
