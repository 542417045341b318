//! Per-kind entity extents.
//!
//! A [`Registry`] owns the canonical set of live instances of one entity
//! kind. Identity is unique within the registry and insertion order is
//! preserved. Storage uses persistent collections, so [`Registry::snapshot`]
//! is O(1) and a snapshot never observes later mutation.

use std::fmt;

use trattoria_foundation::{EntityId, EntityRef, Error, Result};

/// An entity type that lives in a [`Registry`].
pub trait Record: Clone {
    /// Kind name of the extent (e.g. `"table"`).
    const KIND: &'static str;

    /// Returns this record's identity.
    fn id(&self) -> EntityId;

    /// Returns this record as a graph node.
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.id())
    }
}

/// Identity-keyed, insertion-ordered extent of one entity kind.
#[derive(Clone)]
pub struct Registry<T: Record> {
    /// Identities in insertion order.
    order: im::Vector<EntityId>,
    /// Records by identity.
    records: im::HashMap<EntityId, T>,
}

impl<T: Record> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &T::KIND)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Record> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: im::Vector::new(),
            records: im::HashMap::new(),
        }
    }

    /// Returns the node for an identity of this kind.
    #[must_use]
    pub fn node(id: EntityId) -> EntityRef {
        EntityRef::new(T::KIND, id)
    }

    /// Registers a record.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` if a record with the same identity exists.
    pub fn register(&mut self, record: T) -> Result<EntityId> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(Error::identity_conflict(T::KIND, id));
        }
        self.order.push_back(id);
        self.records.insert(id, record);
        Ok(id)
    }

    /// Removes a record, returning it if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let removed = self.records.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }

    /// Returns true if a record with this identity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Gets a record by identity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.records.get(&id)
    }

    /// Gets a record, failing with `EntityNotFound` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if no record has this identity.
    pub fn require(&self, id: EntityId) -> Result<&T> {
        self.get(id)
            .ok_or_else(|| Error::entity_not_found(T::KIND, id))
    }

    /// Applies a fallible change to a record.
    ///
    /// The closure works on a copy; the stored record is replaced only if
    /// the closure succeeds, so a failed update leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is absent, the closure fails, or the
    /// closure changed the record's identity.
    pub fn update<F>(&mut self, id: EntityId, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let mut record = self.require(id)?.clone();
        f(&mut record)?;
        if record.id() != id {
            return Err(Error::validation("id", "identity cannot change"));
        }
        self.records.insert(id, record);
        Ok(())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Iterates identities in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Returns a read-only view of the current extent.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            order: self.order.clone(),
            records: self.records.clone(),
        }
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }

    /// Returns all records in insertion order, for persistence.
    #[must_use]
    pub fn records(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Replaces the extent with the given records.
    ///
    /// The registry is cleared first. If any identity repeats, the registry
    /// is left empty.
    ///
    /// # Errors
    ///
    /// Returns `IdentityConflict` on the first repeated identity.
    pub fn restore(&mut self, records: impl IntoIterator<Item = T>) -> Result<()> {
        self.clear();
        for record in records {
            if let Err(err) = self.register(record) {
                self.clear();
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Read-only, insertion-ordered view of a registry at one point in time.
#[derive(Clone)]
pub struct Snapshot<T: Record> {
    order: im::Vector<EntityId>,
    records: im::HashMap<EntityId, T>,
}

impl<T: Record> Snapshot<T> {
    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if a record with this identity was present.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Gets a record by identity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.records.get(&id)
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }
}
