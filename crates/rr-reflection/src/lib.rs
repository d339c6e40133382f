//! Association reflections for remote resource classes.
//!
//! This crate records which resource classes point at which, and derives
//! from each declaration the names needed to follow the pointer: the target
//! class, the foreign-key attribute and, for polymorphic associations, the
//! foreign-type attribute.
//!
//! # Overview
//!
//! - [`ResourceClass`]: a resource type and its [`ReflectionRegistry`]
//! - [`AssociationReflection`]: one declared association plus its memoized
//!   derived names
//! - [`AssociationBuilder`]: per-macro declaration (`belongs_to`,
//!   `has_many`, `has_one`) with option validation
//! - [`Namespace`] and [`TypeNameResolver`]: class-name to class resolution
//! - [`Finder`]: generic loader for the resource a `belongs_to` points at,
//!   over any [`Transport`]
//! - [`Manifest`]: declarations as JSON data
//!
//! # Example
//!
//! ```
//! use rr_core::Attributes;
//! use rr_reflection::{
//!     BelongsToOptions, Finder, FixtureTransport, Namespace, Resource, ResourceClass,
//! };
//! use serde_json::json;
//!
//! let mut namespace = Namespace::new();
//! namespace.define(ResourceClass::new("Author"));
//!
//! let mut post = ResourceClass::new("Post");
//! post.belongs_to("author", BelongsToOptions::new()).unwrap();
//! let post = namespace.define(post);
//!
//! let transport =
//!     FixtureTransport::from_json_str(r#"{"Author": [{"id": 7, "name": "Ada"}]}"#, "id").unwrap();
//! let finder = Finder::new(&namespace, &transport);
//!
//! let record = Resource::new(post, Attributes::from_value(json!({"author_id": 7})).unwrap());
//! let author = finder.related(&record, "author").unwrap().unwrap();
//! assert_eq!(author.attributes().get_str("name"), Some("Ada"));
//! ```
//!
//! # Architecture
//!
//! ```text
//! Manifest / typed declarations
//!     │
//!     ├── AssociationBuilder (validate, register)
//!     │       │
//!     │       └── ReflectionRegistry (per ResourceClass, copied on subclass)
//!     │
//!     └── Namespace (defined classes)
//!             │
//!             └── TypeNameResolver (explicit overrides, consulted first)
//!
//! Finder
//!     │
//!     ├── AssociationReflection (class name, foreign key, foreign type)
//!     └── Transport (find by id)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod builder;
pub mod class;
pub mod error;
pub mod finder;
pub mod fixture;
pub mod manifest;
pub mod options;
pub mod reflection;
pub mod registry;
pub mod resolver;
pub mod resource;

pub use builder::{AssociationBuilder, BelongsTo, HasMany, HasOne};
pub use class::ResourceClass;
pub use error::{BuildError, ReflectionError};
pub use finder::{Finder, Transport};
pub use fixture::{FixtureError, FixtureRequest, FixtureTransport};
pub use manifest::{AssociationDeclaration, ClassDeclaration, Manifest};
pub use options::{AssociationOptions, BelongsToOptions, CommonOptions, RawOptions};
pub use reflection::{AssociationReflection, ReflectionSummary};
pub use registry::ReflectionRegistry;
pub use resolver::{Namespace, TypeNameResolver};
pub use resource::Resource;
