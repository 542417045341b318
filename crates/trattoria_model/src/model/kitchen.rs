use trattoria_foundation::{EntityId, Result};
use trattoria_storage::Registry;

use super::Model;
use crate::menu::{Ingredient, MenuItem};
use crate::rel::Rel;
use crate::venue::Menu;

impl Model {
    /// Adds a menu item.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` if the identity is taken.
    pub fn add_menu_item(&mut self, item: MenuItem) -> Result<EntityId> {
        self.insert(item)
    }

    /// Adds an ingredient.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` if the identity is taken.
    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> Result<EntityId> {
        self.insert(ingredient)
    }

    /// Marks an item as orderable or not.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown item.
    pub fn set_item_available(&mut self, item: EntityId, available: bool) -> Result<()> {
        self.modify(item, |i: &mut MenuItem| {
            i.available = available;
            Ok(())
        })
    }

    /// Puts an item on a menu.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown item or menu, or an
    /// association error if the item is already on the menu.
    pub fn add_item_to_menu(&mut self, menu: EntityId, item: EntityId) -> Result<()> {
        let menu = self.live::<Menu>(menu)?;
        let item = self.live::<MenuItem>(item)?;
        self.links.link(item, Rel::OnMenu, menu)
    }

    /// Takes an item off a menu.
    ///
    /// # Errors
    ///
    /// Returns an association error if the item is not on the menu.
    pub fn remove_item_from_menu(&mut self, menu: EntityId, item: EntityId) -> Result<()> {
        self.links.unlink(
            Registry::<MenuItem>::node(item),
            Rel::OnMenu,
            Registry::<Menu>::node(menu),
        )
    }

    /// Returns the items on a menu.
    #[must_use]
    pub fn items_on_menu(&self, menu: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Menu>::node(menu), Rel::OnMenu)
    }

    /// Returns the menus listing an item.
    #[must_use]
    pub fn menus_of_item(&self, item: EntityId) -> Vec<EntityId> {
        self.targets(Registry::<MenuItem>::node(item), Rel::OnMenu)
    }

    /// Records that an item is made with an ingredient.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown item or ingredient, or an
    /// association error if the item already uses it.
    pub fn add_ingredient_to_item(&mut self, item: EntityId, ingredient: EntityId) -> Result<()> {
        let item = self.live::<MenuItem>(item)?;
        let ingredient = self.live::<Ingredient>(ingredient)?;
        self.links.link(item, Rel::Uses, ingredient)
    }

    /// Removes an ingredient from an item's recipe.
    ///
    /// # Errors
    ///
    /// Returns an association error if the item does not use it.
    pub fn remove_ingredient_from_item(&mut self, item: EntityId, ingredient: EntityId) -> Result<()> {
        self.links.unlink(
            Registry::<MenuItem>::node(item),
            Rel::Uses,
            Registry::<Ingredient>::node(ingredient),
        )
    }

    /// Returns the ingredients of an item.
    #[must_use]
    pub fn ingredients_of(&self, item: EntityId) -> Vec<EntityId> {
        self.targets(Registry::<MenuItem>::node(item), Rel::Uses)
    }

    /// Returns the items made with an ingredient.
    #[must_use]
    pub fn items_using(&self, ingredient: EntityId) -> Vec<EntityId> {
        self.sources(Registry::<Ingredient>::node(ingredient), Rel::Uses)
    }

    /// Relates two items, e.g. a dish and a wine that goes with it.
    ///
    /// The relation is mutual: each item lists the other.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for an unknown item, or an association
    /// error for a self-relation or an existing link.
    pub fn add_related_item(&mut self, item: EntityId, related: EntityId) -> Result<()> {
        let item = self.live::<MenuItem>(item)?;
        let related = self.live::<MenuItem>(related)?;
        self.links.link(item, Rel::RelatedTo, related)
    }

    /// Unrelates two items, from either side.
    ///
    /// # Errors
    ///
    /// Returns an association error if they are not related.
    pub fn remove_related_item(&mut self, item: EntityId, related: EntityId) -> Result<()> {
        self.links.unlink(
            Registry::<MenuItem>::node(item),
            Rel::RelatedTo,
            Registry::<MenuItem>::node(related),
        )
    }

    /// Returns the items related to an item.
    #[must_use]
    pub fn related_items(&self, item: EntityId) -> Vec<EntityId> {
        self.targets(Registry::<MenuItem>::node(item), Rel::RelatedTo)
    }
}
