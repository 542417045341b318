//! The relation catalogue.
//!
//! Every edge runs from the dependent side to the side it depends on: a
//! part points at its whole, a subordinate at their manager, an order line
//! at the item it orders.

use serde::{Deserialize, Serialize};
use trattoria_storage::{
    Cardinality, Composition, OnDelete, Record, RelationSchema, RelationStore,
};

use crate::menu::{Ingredient, MenuItem};
use crate::orders::{Customer, Delivery, Order, Payment, Quantity};
use crate::staff::Staff;
use crate::venue::{Menu, Restaurant, Shift, Table};

/// Named relations between restaurant entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rel {
    /// Staff -> manager. Gated by rank.
    ManagedBy,
    /// Table -> restaurant (composition, at most 100 per restaurant).
    TableOf,
    /// Menu -> restaurant (composition).
    MenuOf,
    /// Shift -> restaurant (composition).
    ShiftAt,
    /// Shift -> staff member working it. Deleted with the staff member.
    ShiftOf,
    /// Menu item -> menu.
    OnMenu,
    /// Menu item -> ingredient.
    Uses,
    /// Menu item <-> menu item, symmetric.
    RelatedTo,
    /// Order -> customer (composition).
    PlacedBy,
    /// Order line -> order (composition, an order keeps at least one line).
    LineOf,
    /// Order line -> menu item. Items cannot be deleted while ordered.
    LineItem,
    /// Payment -> order (composition).
    PaidFor,
    /// Delivery -> order (composition, one per order).
    DeliveryFor,
}

impl Rel {
    /// Every relation, in catalogue order.
    pub const ALL: [Rel; 13] = [
        Rel::ManagedBy,
        Rel::TableOf,
        Rel::MenuOf,
        Rel::ShiftAt,
        Rel::ShiftOf,
        Rel::OnMenu,
        Rel::Uses,
        Rel::RelatedTo,
        Rel::PlacedBy,
        Rel::LineOf,
        Rel::LineItem,
        Rel::PaidFor,
        Rel::DeliveryFor,
    ];

    /// Kind of the entity on the source side.
    #[must_use]
    pub fn source_kind(self) -> &'static str {
        match self {
            Rel::ManagedBy => Staff::KIND,
            Rel::TableOf => Table::KIND,
            Rel::MenuOf => Menu::KIND,
            Rel::ShiftAt | Rel::ShiftOf => Shift::KIND,
            Rel::OnMenu | Rel::Uses | Rel::RelatedTo => MenuItem::KIND,
            Rel::PlacedBy => Order::KIND,
            Rel::LineOf | Rel::LineItem => Quantity::KIND,
            Rel::PaidFor => Payment::KIND,
            Rel::DeliveryFor => Delivery::KIND,
        }
    }

    /// Kind of the entity on the target side.
    #[must_use]
    pub fn target_kind(self) -> &'static str {
        match self {
            Rel::ManagedBy | Rel::ShiftOf => Staff::KIND,
            Rel::TableOf | Rel::MenuOf | Rel::ShiftAt => Restaurant::KIND,
            Rel::OnMenu => Menu::KIND,
            Rel::Uses => Ingredient::KIND,
            Rel::RelatedTo | Rel::LineItem => MenuItem::KIND,
            Rel::PlacedBy => Customer::KIND,
            Rel::LineOf | Rel::PaidFor | Rel::DeliveryFor => Order::KIND,
        }
    }

    /// Returns the schema for this relation.
    #[must_use]
    pub fn schema(self) -> RelationSchema<Rel> {
        match self {
            Rel::ManagedBy => RelationSchema::new(self)
                .with_cardinality(Cardinality::ManyToOne)
                .reflexive(),
            Rel::TableOf => {
                RelationSchema::composition(self).with_max_sources(Restaurant::MAX_TABLES)
            }
            Rel::MenuOf | Rel::ShiftAt | Rel::PlacedBy | Rel::PaidFor => {
                RelationSchema::composition(self)
            }
            Rel::ShiftOf => RelationSchema::new(self)
                .with_cardinality(Cardinality::ManyToOne)
                .with_on_delete(OnDelete::Cascade),
            Rel::OnMenu | Rel::Uses => RelationSchema::new(self),
            Rel::RelatedTo => RelationSchema::new(self).symmetric(),
            Rel::LineOf => RelationSchema::composition(self).with_min_sources(1),
            Rel::LineItem => RelationSchema::new(self)
                .with_cardinality(Cardinality::ManyToOne)
                .with_on_delete(OnDelete::Restrict),
            Rel::DeliveryFor => {
                RelationSchema::composition(self).with_cardinality(Cardinality::OneToOne)
            }
        }
    }

    /// Returns true if every source must hold a target.
    #[must_use]
    pub fn is_required(self) -> bool {
        self.schema().composition || matches!(self, Rel::ShiftOf | Rel::LineItem)
    }

    /// Returns the composition view of this relation, if it is one.
    #[must_use]
    pub fn composition(self) -> Option<Composition<Rel>> {
        self.schema().composition.then_some(Composition::new(self))
    }
}

/// Tables of a restaurant.
pub const TABLES: Composition<Rel> = Composition::new(Rel::TableOf);
/// Menus of a restaurant.
pub const MENUS: Composition<Rel> = Composition::new(Rel::MenuOf);
/// Shifts at a restaurant.
pub const SHIFTS: Composition<Rel> = Composition::new(Rel::ShiftAt);
/// Orders of a customer.
pub const ORDERS: Composition<Rel> = Composition::new(Rel::PlacedBy);
/// Lines of an order.
pub const LINES: Composition<Rel> = Composition::new(Rel::LineOf);
/// Payments of an order.
pub const PAYMENTS: Composition<Rel> = Composition::new(Rel::PaidFor);
/// Delivery of an order.
pub const DELIVERIES: Composition<Rel> = Composition::new(Rel::DeliveryFor);

/// Builds an empty link store with every relation registered.
#[must_use]
pub fn catalogue() -> RelationStore<Rel> {
    Rel::ALL.into_iter().map(Rel::schema).collect()
}
