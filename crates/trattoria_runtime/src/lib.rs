//! Persistence for Trattoria.
//!
//! This crate provides:
//! - [`to_bytes`] / [`from_bytes`] - `MessagePack` encoding of stored records
//! - [`Archive`] - One blob per entity kind, saved from and loaded into a [`Model`]
//! - [`save_to_dir`] / [`load_from_dir`] - One file per entity kind
//! - [`StoreConfig`] - Where the files live
//!
//! [`Model`]: trattoria_model::Model

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod serialize;
pub mod store;

pub use config::StoreConfig;
pub use serialize::{Archive, from_bytes, to_bytes};
pub use store::{LoadStatus, Loaded, load_from_dir, save_to_dir, try_load_from_dir};
