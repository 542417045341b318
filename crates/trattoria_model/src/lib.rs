//! Restaurant entities and the Trattoria model aggregate.
//!
//! This crate provides:
//! - Entity records: [`Staff`], [`Restaurant`], [`Table`], [`Menu`], [`Shift`],
//!   [`MenuItem`], [`Ingredient`], [`Customer`], [`Order`], [`Quantity`],
//!   [`Payment`], [`Delivery`]
//! - [`Rel`] - The relation catalogue linking them
//! - [`Model`] - Registries plus links, with every graph-changing operation
//! - [`Notifier`] - Sink for business action messages
//! - [`Rebuild`] - Two-pass reconstruction from stored records

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Implements [`trattoria_storage::Record`] for a type with an `id` field.
macro_rules! impl_record {
    ($ty:ty, $kind:literal) => {
        impl trattoria_storage::Record for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> trattoria_foundation::EntityId {
                self.id
            }
        }
    };
}

mod check;
pub mod extents;
pub mod menu;
pub mod model;
pub mod notify;
pub mod orders;
pub mod persist;
pub mod rel;
pub mod staff;
pub mod status;
pub mod venue;

pub use extents::{Extents, HasExtent};
pub use menu::{BeverageCategory, FoodCategory, Ingredient, ItemKind, MenuItem};
pub use model::Model;
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use orders::{Address, Customer, Delivery, DeliveryMethod, Order, Payment, PaymentMethod, Quantity};
pub use persist::{KindVisitor, Persisted, Rebuild, StoredLink, StoredRecord};
pub use rel::Rel;
pub use staff::{Contract, ContractTag, ManagerLevel, Role, RoleTag, ShiftPattern, Staff, StaffDraft};
pub use status::{DeliveryStatus, OrderStatus, PaymentStatus, Status};
pub use venue::{Menu, Restaurant, Shift, ShiftType, Table};
