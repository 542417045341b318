//! Entity registries, relationships, and consistency rules for Trattoria.
//!
//! This crate provides:
//! - [`Registry`] - Identity-keyed, insertion-ordered extent of one entity kind
//! - [`RelationStore`] - Bidirectional association indices
//! - [`Composition`] - Whole/part ownership with cascading delete
//! - [`ConditionalValidator`] - Discriminant-gated attribute rules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod composition;
pub mod registry;
pub mod relationship;
pub mod schema;
pub mod validate;

pub use composition::{Composition, ExtentSet, delete_whole};
pub use registry::{Record, Registry, Snapshot};
pub use relationship::{Guard, RelationName, RelationStore};
pub use schema::{Cardinality, OnDelete, OnViolation, RelationSchema};
pub use validate::{ConditionalValidator, Discriminated};
