//! Order, payment, and delivery status machines.
//!
//! Only the listed transitions are allowed; every other move, including
//! one out of a terminal state, is a validation error.

use std::fmt;

use serde::{Deserialize, Serialize};
use trattoria_foundation::{Error, Result};

/// A status with a fixed set of allowed successors.
pub trait Status: Copy + PartialEq + fmt::Debug + 'static {
    /// Attribute name used in validation errors.
    const FIELD: &'static str;

    /// States reachable in one step.
    fn successors(self) -> &'static [Self];

    /// Returns true if no transition leaves this state.
    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Checks a transition and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `next` is not a successor.
    fn advance(self, next: Self) -> Result<Self> {
        if self.successors().contains(&next) {
            Ok(next)
        } else {
            Err(Error::validation(
                Self::FIELD,
                format!("cannot change from {self:?} to {next:?}"),
            ))
        }
    }
}

/// Kitchen progress of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Being cooked.
    #[default]
    Preparing,
    /// Ready.
    Prepared,
    /// Could not be prepared.
    NotPrepared,
}

impl Status for OrderStatus {
    const FIELD: &'static str = "order status";

    fn successors(self) -> &'static [Self] {
        match self {
            OrderStatus::Preparing => &[OrderStatus::Prepared, OrderStatus::NotPrepared],
            OrderStatus::Prepared | OrderStatus::NotPrepared => &[],
        }
    }
}

/// Settlement of a payment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Awaiting settlement.
    #[default]
    Pending,
    /// Settled.
    Completed,
    /// Declined or errored.
    Failed,
    /// Returned to the customer.
    Refunded,
}

impl Status for PaymentStatus {
    const FIELD: &'static str = "payment status";

    fn successors(self) -> &'static [Self] {
        match self {
            PaymentStatus::Pending => &[
                PaymentStatus::Completed,
                PaymentStatus::Failed,
                PaymentStatus::Refunded,
            ],
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Refunded => &[],
        }
    }
}

/// Progress of a delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Planned.
    #[default]
    Scheduled,
    /// Under way.
    OnRoute,
    /// Handed over.
    Delivered,
    /// Called off.
    Cancelled,
}

impl Status for DeliveryStatus {
    const FIELD: &'static str = "delivery status";

    fn successors(self) -> &'static [Self] {
        match self {
            DeliveryStatus::Scheduled => &[DeliveryStatus::OnRoute],
            DeliveryStatus::OnRoute => &[DeliveryStatus::Delivered, DeliveryStatus::Cancelled],
            DeliveryStatus::Delivered | DeliveryStatus::Cancelled => &[],
        }
    }
}
