//! Menu items and ingredients.

use serde::{Deserialize, Serialize};
use trattoria_foundation::{EntityId, Error, Money, Result};

use crate::check;

/// Course a food item is served as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodCategory {
    /// Starter.
    Starter,
    /// Main course.
    MainCourse,
    /// Dessert.
    Dessert,
}

/// Kind of beverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeverageCategory {
    /// Contains alcohol.
    Alcoholic,
    /// Cold, non-alcoholic.
    Soft,
    /// Served hot.
    Hot,
}

/// Food or beverage specifics of a menu item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A dish.
    Food {
        /// Spicy.
        spicy: bool,
        /// Vegetarian.
        vegetarian: bool,
        /// Energy content, always positive.
        calories: u32,
        /// Preparation time in minutes.
        prep_minutes: u32,
        /// Course.
        category: FoodCategory,
    },
    /// A drink.
    Beverage {
        /// Serving size: 500 or 1000 ml.
        volume_ml: u32,
        /// Kind of drink.
        category: BeverageCategory,
    },
}

impl ItemKind {
    fn validate(&self) -> Result<()> {
        match self {
            ItemKind::Food { calories, .. } => {
                check::positive("calories", *calories)?;
            }
            ItemKind::Beverage { volume_ml, .. } => {
                if !matches!(volume_ml, 500 | 1000) {
                    return Err(Error::validation("volume_ml", "must be 500 or 1000"));
                }
            }
        }
        Ok(())
    }
}

/// Something that can be ordered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Identity.
    pub id: EntityId,
    /// Name.
    pub name: String,
    /// Price.
    pub price: Money,
    /// Whether it can be ordered right now.
    pub available: bool,
    /// Description.
    pub description: Option<String>,
    /// Allergens, trimmed and without repeats.
    pub allergens: Vec<String>,
    /// Food or beverage specifics.
    pub kind: ItemKind,
}

impl_record!(MenuItem, "menu_item");

impl MenuItem {
    /// Creates an available item without description or allergens.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id, blank name, negative price,
    /// or invalid food or beverage attributes.
    pub fn new(id: EntityId, name: impl Into<String>, price: Money, kind: ItemKind) -> Result<Self> {
        kind.validate()?;
        Ok(Self {
            id: check::identity(id)?,
            name: check::non_blank("name", name)?,
            price: check::non_negative("price", price)?,
            available: true,
            description: None,
            allergens: Vec::new(),
            kind,
        })
    }

    /// Sets the description.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text.
    pub fn with_description(mut self, description: impl Into<String>) -> Result<Self> {
        self.description = Some(check::non_blank("description", description)?);
        Ok(self)
    }

    /// Sets the allergens.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank entry.
    pub fn with_allergens<I, S>(mut self, allergens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = check::allergens(allergens)?;
        Ok(self)
    }
}

/// An ingredient used by menu items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Identity.
    pub id: EntityId,
    /// Name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Allergens, trimmed and without repeats.
    pub allergens: Vec<String>,
    /// How many times it has been used in the kitchen.
    pub times_used: u32,
}

impl_record!(Ingredient, "ingredient");

impl Ingredient {
    /// Creates an unused ingredient.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero id, blank text, or a blank
    /// allergen.
    pub fn new<I, S>(
        id: EntityId,
        name: impl Into<String>,
        unit: impl Into<String>,
        allergens: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            id: check::identity(id)?,
            name: check::non_blank("name", name)?,
            unit: check::non_blank("unit", unit)?,
            allergens: check::allergens(allergens)?,
            times_used: 0,
        })
    }
}
