//! Restaurants and the things they own: tables, menus, and shifts.

use serde::{Deserialize, Serialize};
use trattoria_foundation::{EntityId, Result};

use crate::check;

/// A restaurant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Identity.
    pub id: EntityId,
    /// Name.
    pub name: String,
    /// Opening hours, free text (e.g. `"10:00-22:00"`).
    pub opening_hours: String,
}

impl_record!(Restaurant, "restaurant");

impl Restaurant {
    /// Maximum number of tables a restaurant can hold.
    pub const MAX_TABLES: usize = 100;

    /// Creates a restaurant.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or blank text.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        opening_hours: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            name: check::non_blank("name", name)?,
            opening_hours: check::non_blank("opening_hours", opening_hours)?,
        })
    }
}

/// A table, part of a restaurant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Identity.
    pub id: EntityId,
    /// Number shown to guests.
    pub number: u32,
    /// Whether guests are seated at it.
    pub occupied: bool,
}

impl_record!(Table, "table");

impl Table {
    /// Creates a free table.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or number.
    pub fn new(id: EntityId, number: u32) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            number: check::positive("number", number)?,
            occupied: false,
        })
    }
}

/// A menu, part of a restaurant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Identity.
    pub id: EntityId,
    /// Name.
    pub name: String,
    /// Version label.
    pub version: String,
    /// Whether the menu is in service.
    pub active: bool,
}

impl_record!(Menu, "menu");

impl Menu {
    /// Creates an active menu.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or blank text.
    pub fn new(id: EntityId, name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            name: check::non_blank("name", name)?,
            version: check::non_blank("version", version)?,
            active: true,
        })
    }
}

/// Time of day a shift covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    /// Morning.
    Morning,
    /// Afternoon.
    Afternoon,
    /// Evening.
    Evening,
    /// Night.
    Night,
}

/// A staff member working at a restaurant.
///
/// One staff member may hold several shifts at the same restaurant. The
/// shift belongs to the restaurant and lasts only as long as the staff
/// member does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Identity.
    pub id: EntityId,
    /// Shift as scheduled.
    pub scheduled: ShiftType,
    /// Shift after the latest change.
    pub current: ShiftType,
}

impl_record!(Shift, "shift");

impl Shift {
    /// Creates a shift.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id.
    pub fn new(id: EntityId, kind: ShiftType) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            scheduled: kind,
            current: kind,
        })
    }
}
