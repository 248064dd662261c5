// src/descriptor/mod.rs

//! Ivy descriptors.
//!
//! - [`model`] holds the immutable structured form of an `ivy.xml`.
//! - [`parse`] turns raw bytes into that form.
//! - [`revision`] decides whether a revision satisfies a declared constraint.

pub mod model;
pub mod parse;
pub mod revision;

pub use model::{DEFAULT_BRANCH, DEFAULT_STATUS, DependencyDeclaration, Descriptor, DescriptorIdentity};
pub use parse::parse;
pub use revision::matches;
