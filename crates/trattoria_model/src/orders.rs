//! Customers and what they order, pay, and have delivered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trattoria_foundation::{EntityId, Error, Money, Result};

use crate::check;
use crate::status::{DeliveryStatus, OrderStatus, PaymentStatus};

/// A customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Identity.
    pub id: EntityId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl_record!(Customer, "customer");

impl Customer {
    /// Creates a customer without contact details.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or a blank name.
    pub fn new(
        id: EntityId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            first_name: check::non_blank("first_name", first_name)?,
            last_name: check::non_blank("last_name", last_name)?,
            phone: None,
            email: None,
        })
    }

    /// Sets contact details.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text.
    pub fn with_contact(mut self, phone: Option<String>, email: Option<String>) -> Result<Self> {
        self.phone = check::optional_non_blank("phone", phone)?;
        self.email = check::optional_non_blank("email", email)?;
        Ok(self)
    }
}

/// An order, part of the customer who placed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identity.
    pub id: EntityId,
    /// When it was placed; never in the future.
    pub placed_at: DateTime<Utc>,
    /// Whether it is taken away.
    pub take_away: bool,
    /// Kitchen progress.
    pub status: OrderStatus,
}

impl_record!(Order, "order");

impl Order {
    /// Creates an order in the preparing state.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or a future timestamp.
    pub fn new(id: EntityId, placed_at: DateTime<Utc>, take_away: bool) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            placed_at: check::not_future("placed_at", placed_at)?,
            take_away,
            status: OrderStatus::Preparing,
        })
    }
}

/// An order line: an amount of one menu item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// Identity.
    pub id: EntityId,
    /// How many; always positive.
    pub amount: u32,
}

impl_record!(Quantity, "quantity");

impl Quantity {
    /// Creates a line.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or amount.
    pub fn new(id: EntityId, amount: u32) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            amount: check::positive("amount", amount)?,
        })
    }
}

/// How a payment is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Card.
    Card,
    /// Online.
    Online,
}

/// A payment towards an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Identity.
    pub id: EntityId,
    /// Amount paid.
    pub amount: Money,
    /// Method.
    pub method: PaymentMethod,
    /// Settlement.
    pub status: PaymentStatus,
    /// When it completed.
    pub paid_at: Option<DateTime<Utc>>,
}

impl_record!(Payment, "payment");

impl Payment {
    /// Creates a pending payment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or a negative amount.
    pub fn new(id: EntityId, amount: Money, method: PaymentMethod) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            amount: check::non_negative("amount", amount)?,
            method,
            status: PaymentStatus::Pending,
            paid_at: None,
        })
    }
}

/// How an order reaches the customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Brought by a courier.
    Courier,
    /// Served at a table.
    InRestaurant,
    /// Collected by the customer.
    Pickup,
}

/// A street address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// Postal code, at least four characters.
    pub zip_code: String,
}

impl Address {
    /// Creates an address.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a short zip code.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Result<Self> {
        let zip_code = check::non_blank("zip_code", zip_code)?;
        if zip_code.chars().count() < 4 {
            return Err(Error::validation("zip_code", "must be at least 4 characters"));
        }
        Ok(Self {
            street: check::non_blank("street", street)?,
            city: check::non_blank("city", city)?,
            zip_code,
        })
    }
}

/// The delivery of an order; an order has at most one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Identity.
    pub id: EntityId,
    /// Method.
    pub method: DeliveryMethod,
    /// Destination.
    pub address: Address,
    /// Planned time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Time of hand-over.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Fee charged.
    pub fee: Money,
    /// Progress.
    pub status: DeliveryStatus,
}

impl_record!(Delivery, "delivery");

impl Delivery {
    /// Creates a scheduled delivery.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id or a negative fee.
    pub fn new(
        id: EntityId,
        method: DeliveryMethod,
        address: Address,
        scheduled_at: Option<DateTime<Utc>>,
        fee: Money,
    ) -> Result<Self> {
        Ok(Self {
            id: check::identity(id)?,
            method,
            address,
            scheduled_at,
            delivered_at: None,
            fee: check::non_negative("fee", fee)?,
            status: DeliveryStatus::Scheduled,
        })
    }
}
