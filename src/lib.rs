//! Trattoria - Restaurant entity model
//!
//! This crate re-exports all layers of the Trattoria system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: trattoria_runtime    - MessagePack persistence, one file per extent
//! Layer 2: trattoria_model      - Restaurant entities, relation catalogue, Model
//! Layer 1: trattoria_storage    - Registries, associations, compositions, validation
//! Layer 0: trattoria_foundation - Core types (EntityId, Money, Error)
//! ```

pub use trattoria_foundation as foundation;
pub use trattoria_model as model;
pub use trattoria_runtime as runtime;
pub use trattoria_storage as storage;
