use trattoria_foundation::{EntityId, Result};
use trattoria_storage::Registry;

use super::Model;
use crate::rel::{MENUS, Rel, SHIFTS, TABLES};
use crate::staff::Staff;
use crate::venue::{Menu, Restaurant, Shift, ShiftType, Table};

impl Model {
    /// Adds a restaurant.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` if the identity is taken.
    pub fn open_restaurant(&mut self, restaurant: Restaurant) -> Result<EntityId> {
        self.insert(restaurant)
    }

    /// Deletes a restaurant with its tables, menus, and shifts.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the restaurant is not live.
    pub fn close_restaurant(&mut self, restaurant: EntityId) -> Result<usize> {
        self.delete::<Restaurant>(restaurant)
    }

    /// Creates a table in a restaurant.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown restaurant, a validation
    /// error for a bad table, `IdentityConflict` if the table identity is
    /// taken, or an association error once the restaurant is full.
    pub fn add_table(&mut self, restaurant: EntityId, table: EntityId, number: u32) -> Result<EntityId> {
        let whole = self.live::<Restaurant>(restaurant)?;
        TABLES.add_part(&mut self.links, &mut self.extents.tables, whole, || {
            Table::new(table, number)
        })
    }

    /// Removes a table from a restaurant and deletes it.
    ///
    /// Returns `false` if the restaurant does not own the table.
    ///
    /// # Errors
    ///
    /// Returns an association error if the table cannot be detached.
    pub fn remove_table(&mut self, restaurant: EntityId, table: EntityId) -> Result<bool> {
        TABLES.remove_part(
            &mut self.links,
            &mut self.extents,
            Registry::<Restaurant>::node(restaurant),
            Registry::<Table>::node(table),
        )
    }

    /// Returns the tables of a restaurant, in the order they were added.
    #[must_use]
    pub fn tables(&self, restaurant: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Restaurant>::node(restaurant), Rel::TableOf)
    }

    /// Adds a menu to a restaurant.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown restaurant, or
    /// `IdentityConflict` if the menu identity is taken.
    pub fn add_menu(&mut self, restaurant: EntityId, menu: Menu) -> Result<EntityId> {
        let whole = self.live::<Restaurant>(restaurant)?;
        MENUS.add_part(&mut self.links, &mut self.extents.menus, whole, || Ok(menu))
    }

    /// Removes a menu from a restaurant and deletes it.
    ///
    /// Returns `false` if the restaurant does not own the menu.
    ///
    /// # Errors
    ///
    /// Returns an association error if the menu cannot be detached.
    pub fn remove_menu(&mut self, restaurant: EntityId, menu: EntityId) -> Result<bool> {
        MENUS.remove_part(
            &mut self.links,
            &mut self.extents,
            Registry::<Restaurant>::node(restaurant),
            Registry::<Menu>::node(menu),
        )
    }

    /// Returns the menus of a restaurant.
    #[must_use]
    pub fn menus(&self, restaurant: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Restaurant>::node(restaurant), Rel::MenuOf)
    }

    /// Schedules a staff member for a shift at a restaurant.
    ///
    /// A staff member may hold any number of shifts at the same restaurant.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown staff member or restaurant,
    /// or `IdentityConflict` if the shift identity is taken.
    pub fn schedule_shift(
        &mut self,
        staff: EntityId,
        restaurant: EntityId,
        shift: EntityId,
        kind: ShiftType,
    ) -> Result<EntityId> {
        let worker = self.live::<Staff>(staff)?;
        let whole = self.live::<Restaurant>(restaurant)?;

        let id = SHIFTS.add_part(&mut self.links, &mut self.extents.shifts, whole, || {
            Shift::new(shift, kind)
        })?;
        let node = Registry::<Shift>::node(id);
        if let Err(err) = self.links.link(node, Rel::ShiftOf, worker) {
            self.links.on_entity_destroyed(node);
            self.extents.shifts.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Changes the current type of a shift; the scheduled type is kept.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown shift.
    pub fn change_shift(&mut self, shift: EntityId, kind: ShiftType) -> Result<()> {
        self.modify(shift, |s: &mut Shift| {
            s.current = kind;
            Ok(())
        })
    }

    /// Cancels a shift.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown shift.
    pub fn cancel_shift(&mut self, shift: EntityId) -> Result<()> {
        self.delete::<Shift>(shift).map(|_| ())
    }

    /// Returns the shifts held by a staff member.
    #[must_use]
    pub fn shifts_of(&self, staff: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Staff>::node(staff), Rel::ShiftOf)
    }

    /// Returns the shifts at a restaurant.
    #[must_use]
    pub fn shifts_at(&self, restaurant: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Restaurant>::node(restaurant), Rel::ShiftAt)
    }
}
