//! Core types for Trattoria.
//!
//! This crate provides:
//! - [`EntityId`] - Caller-supplied identity, unique within one extent
//! - [`EntityRef`] - An identity qualified by its entity kind
//! - [`Money`] - Fixed-point currency amounts
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod money;

pub use entity::{EntityId, EntityRef};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use money::Money;
