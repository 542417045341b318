//! Integration tests for Layer 1: Storage
//!
//! Tests for registries, relationship stores, compositions, and conditional
//! attribute validation.

mod composition;
mod validation;

use trattoria_foundation::EntityId;
use trattoria_storage::Record;

/// A minimal record kind for exercising the storage layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Dish {
    pub id: EntityId,
    pub name: String,
}

impl Record for Dish {
    const KIND: &'static str = "dish";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// A second kind, owned by a [`Dish`] in composition tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub id: EntityId,
}

impl Record for Step {
    const KIND: &'static str = "step";

    fn id(&self) -> EntityId {
        self.id
    }
}

pub fn dish(raw: u64, name: &str) -> Dish {
    Dish {
        id: EntityId::new(raw),
        name: name.to_string(),
    }
}
