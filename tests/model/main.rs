//! Integration tests for the restaurant model
//!
//! Tests the manager hierarchy, venue compositions, the kitchen catalogue,
//! and the order lifecycle through the public [`Model`] API.

mod staffing;

use std::sync::Arc;

use chrono::Utc;
use trattoria_foundation::{EntityId, Money};
use trattoria_model::{
    Customer, FoodCategory, ItemKind, ManagerLevel, MenuItem, Model, Order, Quantity,
    RecordingNotifier, ShiftPattern, StaffDraft,
};

pub fn id(raw: u64) -> EntityId {
    EntityId::new(raw)
}

pub fn recording() -> (Model, Arc<RecordingNotifier>) {
    let recorder = Arc::new(RecordingNotifier::new());
    (Model::with_notifier(recorder.clone()), recorder)
}

pub fn staff(raw: u64, last_name: &str) -> StaffDraft {
    StaffDraft::new(id(raw), "Luca", last_name, "Floor")
        .full_time(ShiftPattern::Evening, Money::from_units(2200))
}

pub fn manager(model: &mut Model, raw: u64, level: ManagerLevel) -> EntityId {
    model
        .hire(staff(raw, "Bianchi").manager(level))
        .unwrap()
}

pub fn pasta(raw: u64, price: i64) -> MenuItem {
    let kind = ItemKind::Food {
        spicy: false,
        vegetarian: true,
        calories: 650,
        prep_minutes: 12,
        category: FoodCategory::MainCourse,
    };
    MenuItem::new(id(raw), format!("Pasta {raw}"), Money::from_units(price), kind).unwrap()
}

/// Customer 1 with order 10, whose single line 100 is two of item 1000.
pub fn seeded_order(model: &mut Model) {
    model.add_menu_item(pasta(1000, 12)).unwrap();
    model
        .register_customer(Customer::new(id(1), "Marta", "Ferri").unwrap())
        .unwrap();
    model
        .place_order(
            id(1),
            Order::new(id(10), Utc::now(), false).unwrap(),
            Quantity::new(id(100), 2).unwrap(),
            id(1000),
        )
        .unwrap();
}
