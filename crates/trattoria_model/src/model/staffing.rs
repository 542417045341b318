use chrono::Utc;
use trattoria_foundation::{EntityId, EntityRef, Error, Result};
use trattoria_storage::{Guard, Registry};

use super::Model;
use crate::menu::Ingredient;
use crate::orders::Payment;
use crate::rel::Rel;
use crate::staff::{RoleTag, Staff, StaffDraft};
use crate::status::{PaymentStatus, Status};
use crate::venue::Table;

impl Model {
    /// Validates a draft and adds the staff member.
    ///
    /// # Errors
    ///
    /// Returns a validation error from [`StaffDraft::build`], or
    /// `IdentityConflict` if the identity is taken.
    pub fn hire(&mut self, draft: StaffDraft) -> Result<EntityId> {
        let staff = draft.build()?;
        self.insert(staff)
    }

    /// Edits a staff member through their draft form.
    ///
    /// The edited draft is validated again. The change is refused if it
    /// would break the manager hierarchy: the staff member must still be
    /// able to manage everyone they manage, and their own manager must
    /// still be able to manage them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid draft or a changed
    /// identity, or an association error for a broken hierarchy.
    pub fn update_staff(&mut self, id: EntityId, edit: impl FnOnce(&mut StaffDraft)) -> Result<()> {
        let mut draft = self.require::<Staff>(id)?.draft();
        edit(&mut draft);
        let updated = draft.build()?;
        if updated.id != id {
            return Err(Error::validation("id", "identity cannot change"));
        }

        let node = Registry::<Staff>::node(id);
        for subordinate in self.links.sources(node, Rel::ManagedBy) {
            updated.ensure_manages(self.require::<Staff>(subordinate.id)?)?;
        }
        if let Some(manager) = self.links.target(node, Rel::ManagedBy) {
            self.require::<Staff>(manager.id)?.ensure_manages(&updated)?;
        }

        self.modify(id, |staff: &mut Staff| {
            *staff = updated;
            Ok(())
        })
    }

    /// Makes `manager` the manager of `subordinate`.
    ///
    /// A previous manager is replaced. If the manager's rank does not allow
    /// it nothing changes; if the new link fails for another reason the
    /// subordinate is left without a manager.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown staff member, or an
    /// association error naming who "cannot manage" whom, a self-relation,
    /// or an existing identical link.
    pub fn add_managed_staff(&mut self, manager: EntityId, subordinate: EntityId) -> Result<()> {
        let manager_node = self.live::<Staff>(manager)?;
        let subordinate_node = self.live::<Staff>(subordinate)?;

        let staff = &self.extents.staff;
        let rank = |source: EntityRef, target: EntityRef| -> Result<()> {
            staff.require(target.id)?.ensure_manages(staff.require(source.id)?)
        };

        // Rank failures keep the current manager in place.
        if manager != subordinate {
            rank(subordinate_node, manager_node)?;
        }
        let guard: Guard<'_> = &rank;
        self.links
            .reassign(subordinate_node, Rel::ManagedBy, manager_node, Some(guard))
    }

    /// Detaches `subordinate` from `manager`.
    ///
    /// # Errors
    ///
    /// Returns an association error if `manager` does not manage `subordinate`.
    pub fn remove_managed_staff(&mut self, manager: EntityId, subordinate: EntityId) -> Result<()> {
        self.links.unlink(
            Registry::<Staff>::node(subordinate),
            Rel::ManagedBy,
            Registry::<Staff>::node(manager),
        )
    }

    /// Returns the manager of a staff member.
    #[must_use]
    pub fn manager_of(&self, staff: EntityId) -> Option<EntityId> {
        self.links
            .target(Registry::<Staff>::node(staff), Rel::ManagedBy)
            .map(|node| node.id)
    }

    /// Returns the staff managed by `manager`, in the order they were added.
    #[must_use]
    pub fn managed_staff(&self, manager: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Staff>::node(manager), Rel::ManagedBy)
    }

    /// A manager hires a new staff member.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `manager` is not a manager, or any
    /// error from [`Model::hire`].
    pub fn hire_staff(&mut self, manager: EntityId, draft: StaffDraft) -> Result<EntityId> {
        let name = self.staff_in_role(manager, RoleTag::Manager)?.last_name.clone();
        let hired = self.hire(draft)?;
        self.notify(&format!("Manager {name} is hiring staff."));
        Ok(hired)
    }

    /// A manager lets a staff member go, deleting them and their shifts.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `manager` is not a manager, an
    /// association error if a manager tries to fire themselves, or
    /// `EntityNotFound` for an unknown staff member.
    pub fn fire_staff(&mut self, manager: EntityId, staff: EntityId) -> Result<()> {
        let name = self.staff_in_role(manager, RoleTag::Manager)?.last_name.clone();
        if manager == staff {
            return Err(Error::association(format!(
                "manager {name} cannot fire themselves"
            )));
        }
        self.delete::<Staff>(staff)?;
        self.notify(&format!("Manager {name} is firing staff."));
        Ok(())
    }

    /// A cashier settles a pending payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `cashier` is not a cashier or the
    /// payment is no longer pending.
    pub fn receive_payment(&mut self, cashier: EntityId, payment: EntityId) -> Result<()> {
        let name = self.staff_in_role(cashier, RoleTag::Cashier)?.last_name.clone();
        self.modify(payment, |p: &mut Payment| {
            p.status = p.status.advance(PaymentStatus::Completed)?;
            p.paid_at = Some(Utc::now());
            Ok(())
        })?;
        self.notify(&format!("Cashier {name} is receiving payment."));
        Ok(())
    }

    /// A cashier refunds a pending payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `cashier` is not a cashier or the
    /// payment is no longer pending.
    pub fn issue_refund(&mut self, cashier: EntityId, payment: EntityId) -> Result<()> {
        let name = self.staff_in_role(cashier, RoleTag::Cashier)?.last_name.clone();
        self.modify(payment, |p: &mut Payment| {
            p.status = p.status.advance(PaymentStatus::Refunded)?;
            Ok(())
        })?;
        self.notify(&format!("Cashier {name} is issuing a refund."));
        Ok(())
    }

    /// The head chef draws on an ingredient from the inventory.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `head_chef` is not a head chef, or
    /// `EntityNotFound` for an unknown ingredient.
    pub fn manage_inventory(&mut self, head_chef: EntityId, ingredient: EntityId) -> Result<()> {
        let name = self.staff_in_role(head_chef, RoleTag::HeadChef)?.last_name.clone();
        self.modify(ingredient, |i: &mut Ingredient| {
            i.times_used = i.times_used.saturating_add(1);
            Ok(())
        })?;
        self.notify(&format!("Head Chef {name} is managing inventory."));
        Ok(())
    }

    /// A waiter seats a customer at a table.
    ///
    /// Returns `false` and leaves the table alone if it is already occupied.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `waiter` is not a waiter, or
    /// `EntityNotFound` for an unknown table.
    pub fn seat_customer(&mut self, waiter: EntityId, table: EntityId) -> Result<bool> {
        self.staff_in_role(waiter, RoleTag::Waiter)?;
        let number = self.require::<Table>(table)?.number;
        if self.require::<Table>(table)?.occupied {
            self.notify(&format!("Table {number} is occupied."));
            return Ok(false);
        }
        self.modify(table, |t: &mut Table| {
            t.occupied = true;
            Ok(())
        })?;
        self.notify(&format!("Customer seated at table {number}."));
        Ok(true)
    }

    fn staff_in_role(&self, id: EntityId, role: RoleTag) -> Result<&Staff> {
        let staff = self.require::<Staff>(id)?;
        if staff.role.tag() == role {
            Ok(staff)
        } else {
            Err(Error::validation(
                "role",
                format!("{} is not a {role}", staff.describe()),
            ))
        }
    }
}
