use chrono::{DateTime, Duration, Utc};
use trattoria_foundation::{EntityId, EntityRef, Error, Money, Result};
use trattoria_storage::{Record, Registry};

use super::Model;
use crate::menu::MenuItem;
use crate::orders::{Customer, Delivery, Order, Payment, Quantity};
use crate::rel::{DELIVERIES, LINES, ORDERS, PAYMENTS, Rel};
use crate::status::{DeliveryStatus, OrderStatus, PaymentStatus, Status};

impl Model {
    /// Adds a customer.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` if the identity is taken.
    pub fn register_customer(&mut self, customer: Customer) -> Result<EntityId> {
        self.insert(customer)
    }

    /// Places an order for a customer together with its first line.
    ///
    /// An order never exists without a line, so both are created or
    /// neither is.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown customer or item, or
    /// `IdentityConflict` if the order or line identity is taken.
    pub fn place_order(
        &mut self,
        customer: EntityId,
        order: Order,
        line: Quantity,
        item: EntityId,
    ) -> Result<EntityId> {
        let owner = self.live::<Customer>(customer)?;
        let item = self.live::<MenuItem>(item)?;
        if self.extents.quantities.contains(line.id) {
            return Err(Error::identity_conflict(Quantity::KIND, line.id));
        }

        let id = ORDERS.add_part(&mut self.links, &mut self.extents.orders, owner, || Ok(order))?;
        let node = Registry::<Order>::node(id);
        if let Err(err) = self.attach_line(node, line, item) {
            self.links.on_entity_destroyed(node);
            self.extents.orders.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Adds a line for `item` to an order.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order or item, or
    /// `IdentityConflict` if the line identity is taken.
    pub fn add_line(&mut self, order: EntityId, line: Quantity, item: EntityId) -> Result<EntityId> {
        let order = self.live::<Order>(order)?;
        let item = self.live::<MenuItem>(item)?;
        self.attach_line(order, line, item)
    }

    /// Removes a line from an order and deletes it.
    ///
    /// Returns `false` if the order does not hold the line.
    ///
    /// # Errors
    ///
    /// Returns an association error for the order's last line.
    pub fn remove_line(&mut self, order: EntityId, line: EntityId) -> Result<bool> {
        LINES.remove_part(
            &mut self.links,
            &mut self.extents,
            Registry::<Order>::node(order),
            Registry::<Quantity>::node(line),
        )
    }

    /// Changes the amount on a line.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown line, or a validation error
    /// for a zero amount.
    pub fn set_line_amount(&mut self, line: EntityId, amount: u32) -> Result<()> {
        self.modify(line, |q: &mut Quantity| {
            *q = Quantity::new(q.id, amount)?;
            Ok(())
        })
    }

    /// Returns the lines of an order.
    #[must_use]
    pub fn lines(&self, order: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Order>::node(order), Rel::LineOf)
    }

    /// Returns the item a line orders.
    #[must_use]
    pub fn item_of_line(&self, line: EntityId) -> Option<EntityId> {
        self.links
            .target(Registry::<Quantity>::node(line), Rel::LineItem)
            .map(|node| node.id)
    }

    /// Returns the lines ordering an item.
    #[must_use]
    pub fn lines_for_item(&self, item: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<MenuItem>::node(item), Rel::LineItem)
    }

    /// Returns the orders of a customer.
    #[must_use]
    pub fn orders_of(&self, customer: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Customer>::node(customer), Rel::PlacedBy)
    }

    /// Returns the customer who placed an order.
    #[must_use]
    pub fn customer_of(&self, order: EntityId) -> Option<EntityId> {
        ORDERS
            .whole_of(&self.links, Registry::<Order>::node(order))
            .map(|node| node.id)
    }

    /// Records a payment towards an order.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order, or `IdentityConflict`
    /// if the payment identity is taken.
    pub fn add_payment(&mut self, order: EntityId, payment: Payment) -> Result<EntityId> {
        let whole = self.live::<Order>(order)?;
        PAYMENTS.add_part(&mut self.links, &mut self.extents.payments, whole, || Ok(payment))
    }

    /// Returns the payments of an order.
    #[must_use]
    pub fn payments(&self, order: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Order>::node(order), Rel::PaidFor)
    }

    /// Arranges the delivery of an order.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order, `IdentityConflict` if
    /// the delivery identity is taken, or an association error if the order
    /// already has a delivery.
    pub fn add_delivery(&mut self, order: EntityId, delivery: Delivery) -> Result<EntityId> {
        let whole = self.live::<Order>(order)?;
        DELIVERIES.add_part(&mut self.links, &mut self.extents.deliveries, whole, || {
            Ok(delivery)
        })
    }

    /// Returns the delivery of an order.
    #[must_use]
    pub fn delivery_of(&self, order: EntityId) -> Option<EntityId> {
        self.sources(Registry::<Order>::node(order), Rel::DeliveryFor)
            .into_iter()
            .next()
    }

    /// Moves an order to its next kitchen state.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order, or a validation error
    /// for a transition that is not allowed.
    pub fn set_order_status(&mut self, order: EntityId, status: OrderStatus) -> Result<()> {
        self.modify(order, |o: &mut Order| {
            o.status = o.status.advance(status)?;
            Ok(())
        })
    }

    /// Moves a payment to its next state. Completion stamps `paid_at`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown payment, or a validation
    /// error for a transition that is not allowed.
    pub fn set_payment_status(&mut self, payment: EntityId, status: PaymentStatus) -> Result<()> {
        self.modify(payment, |p: &mut Payment| {
            p.status = p.status.advance(status)?;
            if status == PaymentStatus::Completed {
                p.paid_at = Some(Utc::now());
            }
            Ok(())
        })
    }

    /// Moves a delivery to its next state. Hand-over stamps `delivered_at`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown delivery, or a validation
    /// error for a transition that is not allowed.
    pub fn set_delivery_status(&mut self, delivery: EntityId, status: DeliveryStatus) -> Result<()> {
        self.modify(delivery, |d: &mut Delivery| {
            d.status = d.status.advance(status)?;
            if status == DeliveryStatus::Delivered {
                d.delivered_at = Some(Utc::now());
            }
            Ok(())
        })
    }

    /// Sums price times amount over the lines of an order.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order and a validation error on
    /// `total` when the sum does not fit in a [`Money`].
    pub fn order_total(&self, order: EntityId) -> Result<Money> {
        self.require::<Order>(order)?;
        let mut total = Money::ZERO;
        for line in self.lines(order) {
            let amount = self.require::<Quantity>(line)?.amount;
            let item = self
                .item_of_line(line)
                .ok_or_else(|| Error::association(format!("line {line} orders no item")))?;
            let price = self.require::<MenuItem>(item)?.price;
            total = price
                .checked_mul(amount)
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or_else(|| Error::validation("total", "overflows the currency range"))?;
        }
        Ok(total)
    }

    /// Time an order has spent since it was placed, as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown order.
    pub fn order_age(&self, order: EntityId, now: DateTime<Utc>) -> Result<Duration> {
        Ok(now - self.require::<Order>(order)?.placed_at)
    }

    fn attach_line(&mut self, order: EntityRef, line: Quantity, item: EntityRef) -> Result<EntityId> {
        let id = LINES.add_part(&mut self.links, &mut self.extents.quantities, order, || Ok(line))?;
        let node = Registry::<Quantity>::node(id);
        if let Err(err) = self.links.link(node, Rel::LineItem, item) {
            self.links.on_entity_destroyed(node);
            self.extents.quantities.remove(id);
            return Err(err);
        }
        Ok(id)
    }
}
