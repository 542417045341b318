//! The model aggregate.
//!
//! [`Model`] owns one registry per entity kind plus the link store that
//! relates them. Every operation that changes the graph is a method here;
//! callers only ever see records through shared references and snapshots.
//!
//! Operations are grouped by area:
//! - `staffing` - hiring, the manager hierarchy, role-gated actions
//! - `venue` - restaurants, tables, menus, shifts
//! - `kitchen` - menu items, ingredients, related items
//! - `ordering` - customers, orders, lines, payments, deliveries

mod kitchen;
mod ordering;
mod staffing;
mod venue;

use std::fmt;
use std::sync::Arc;

use trattoria_foundation::{EntityId, EntityRef, Result};
use trattoria_storage::{Record, Registry, RelationStore, Snapshot, delete_whole};

use crate::extents::{Extents, HasExtent};
use crate::notify::{Notifier, TracingNotifier};
use crate::rel::{Rel, catalogue};

/// Registries and links for one restaurant business.
#[derive(Clone)]
pub struct Model {
    extents: Extents,
    links: RelationStore<Rel>,
    notifier: Arc<dyn Notifier>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("extents", &self.extents)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Creates an empty model that reports business actions through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(TracingNotifier))
    }

    /// Creates an empty model with the given notifier.
    #[must_use]
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            extents: Extents::default(),
            links: catalogue(),
            notifier,
        }
    }

    pub(crate) fn from_parts(extents: Extents, links: RelationStore<Rel>) -> Self {
        Self {
            extents,
            links,
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Replaces the notifier.
    pub fn set_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = notifier;
    }

    /// Returns every registry.
    #[must_use]
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Returns the link store.
    #[must_use]
    pub fn links(&self) -> &RelationStore<Rel> {
        &self.links
    }

    /// Returns a snapshot of the extent of `T`.
    #[must_use]
    pub fn all<T: Record>(&self) -> Snapshot<T>
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent().snapshot()
    }

    /// Gets a record by identity.
    #[must_use]
    pub fn get<T: Record>(&self, id: EntityId) -> Option<&T>
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent().get(id)
    }

    /// Gets a record, failing when it is not live.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no record of `T` has this identity.
    pub fn require<T: Record>(&self, id: EntityId) -> Result<&T>
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent().require(id)
    }

    /// Returns the number of live records of `T`.
    #[must_use]
    pub fn count<T: Record>(&self) -> usize
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent().len()
    }

    /// Deletes a record together with everything composed into it.
    ///
    /// Every link touching a deleted entity is detached.
    /// Returns the number of entities removed.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the record is not live, or an association
    /// error if a restricting link still points into the cascade or a whole
    /// outside it would be left without its required parts.
    pub fn delete<T: Record>(&mut self, id: EntityId) -> Result<usize>
    where
        Extents: HasExtent<T>,
    {
        self.delete_node(Registry::<T>::node(id))
    }

    /// Deletes an entity by reference. See [`Model::delete`].
    ///
    /// # Errors
    ///
    /// As for [`Model::delete`].
    pub fn delete_node(&mut self, entity: EntityRef) -> Result<usize> {
        delete_whole(&mut self.links, &mut self.extents, entity)
    }

    /// Empties every extent and drops every link.
    pub fn clear(&mut self) {
        self.extents.clear();
        self.links.clear();
    }

    /// Returns true if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Inserts a record into its extent, with no links.
    fn insert<T: Record>(&mut self, record: T) -> Result<EntityId>
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent_mut().register(record)
    }

    /// Applies a fallible change to a record; see [`Registry::update`].
    fn modify<T: Record>(&mut self, id: EntityId, f: impl FnOnce(&mut T) -> Result<()>) -> Result<()>
    where
        Extents: HasExtent<T>,
    {
        self.extents.extent_mut().update(id, f)
    }

    /// Returns the node of a live record.
    fn live<T: Record>(&self, id: EntityId) -> Result<EntityRef>
    where
        Extents: HasExtent<T>,
    {
        self.require::<T>(id).map(Record::entity_ref)
    }

    fn targets(&self, source: EntityRef, rel: Rel) -> Vec<EntityId> {
        self.links.targets(source, rel).map(|node| node.id).collect()
    }

    fn sources(&self, target: EntityRef, rel: Rel) -> Vec<EntityId> {
        self.links.sources(target, rel).map(|node| node.id).collect()
    }

    fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }
}
