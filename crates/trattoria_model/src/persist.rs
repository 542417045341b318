//! Record export and two-pass rebuild.
//!
//! Each kind is stored as a list of [`StoredRecord`]s: the record itself
//! plus the identities it links to through relations whose source side is
//! that kind. Links are rebuilt only after every extent is back, so the
//! order in which kinds are restored does not matter.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use trattoria_foundation::{EntityId, EntityRef, Error, Result};
use trattoria_storage::{ExtentSet, Guard, Record, RelationStore};

use crate::extents::{Extents, HasExtent};
use crate::menu::{Ingredient, MenuItem};
use crate::model::Model;
use crate::orders::{Customer, Delivery, Order, Payment, Quantity};
use crate::rel::{Rel, catalogue};
use crate::staff::{Staff, StaffDraft};
use crate::venue::{Menu, Restaurant, Shift, Table};

/// Outgoing links of one record under one relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLink {
    /// Relation, with the record on the source side.
    pub relation: Rel,
    /// Target identities, in link order.
    pub peers: Vec<EntityId>,
}

/// A record in stored form with its outgoing links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord<S> {
    /// The stored form of the record.
    pub record: S,
    /// Outgoing links, one entry per non-empty relation.
    pub links: Vec<StoredLink>,
}

/// A record kind that can be written out and read back.
pub trait Persisted: Record {
    /// Form written to storage.
    type Stored: Serialize + DeserializeOwned;

    /// Converts to stored form.
    fn store(&self) -> Self::Stored;

    /// Converts back from stored form.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the stored form is not a valid record.
    fn load(stored: Self::Stored) -> Result<Self>;
}

/// Staff are stored in their flat draft form and validated on the way in.
impl Persisted for Staff {
    type Stored = StaffDraft;

    fn store(&self) -> StaffDraft {
        self.draft()
    }

    fn load(stored: StaffDraft) -> Result<Self> {
        stored.build()
    }
}

macro_rules! persisted_as_is {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Persisted for $ty {
                type Stored = Self;

                fn store(&self) -> Self {
                    self.clone()
                }

                fn load(stored: Self) -> Result<Self> {
                    Ok(stored)
                }
            }
        )*
    };
}

persisted_as_is!(
    Restaurant, Table, Menu, Shift, MenuItem, Ingredient, Customer, Order, Quantity, Payment,
    Delivery,
);

/// Per-kind callback, driven by [`Extents::visit`].
pub trait KindVisitor {
    /// Called once for each record kind.
    ///
    /// # Errors
    ///
    /// Any error aborts the visit.
    fn visit<T>(&mut self) -> Result<()>
    where
        T: Persisted,
        Extents: HasExtent<T>;
}

impl Model {
    /// Exports the extent of `T` with each record's outgoing links.
    #[must_use]
    pub fn export<T>(&self) -> Vec<StoredRecord<T::Stored>>
    where
        T: Persisted,
        Extents: HasExtent<T>,
    {
        self.extents()
            .extent()
            .iter()
            .map(|record| StoredRecord {
                record: record.store(),
                links: stored_links(self.links(), record.entity_ref()),
            })
            .collect()
    }
}

fn stored_links(links: &RelationStore<Rel>, source: EntityRef) -> Vec<StoredLink> {
    Rel::ALL
        .into_iter()
        .filter(|relation| relation.source_kind() == source.kind)
        .filter_map(|relation| {
            let peers: Vec<_> = links.targets(source, relation).map(|t| t.id).collect();
            (!peers.is_empty()).then_some(StoredLink { relation, peers })
        })
        .collect()
}

/// Rebuilds a [`Model`] from stored records.
///
/// Pass one ([`Rebuild::restore`], once per kind) repopulates the extents
/// and checks identities. Pass two ([`Rebuild::finish`]) recreates every
/// link by identity and checks that the graph is complete.
#[derive(Debug, Default)]
pub struct Rebuild {
    extents: Extents,
    pending: Vec<(EntityRef, Vec<StoredLink>)>,
    restored: Vec<&'static str>,
}

impl Rebuild {
    /// Starts an empty rebuild.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the extent of `T`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid record, `IdentityConflict`
    /// for a repeated identity, or `CorruptData` if `T` was already restored.
    pub fn restore<T>(&mut self, stored: Vec<StoredRecord<T::Stored>>) -> Result<()>
    where
        T: Persisted,
        Extents: HasExtent<T>,
    {
        if self.restored.contains(&T::KIND) {
            return Err(Error::corrupt(format!("{} restored twice", T::KIND)));
        }
        self.restored.push(T::KIND);

        let mut records = Vec::with_capacity(stored.len());
        for StoredRecord { record, links } in stored {
            let record = T::load(record)?;
            self.pending.push((record.entity_ref(), links));
            records.push(record);
        }
        tracing::debug!(kind = T::KIND, count = records.len(), "restored extent");
        self.extents.extent_mut().restore(records)
    }

    /// Relinks everything and returns the model.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` naming the relation, the record, and the peer
    /// when a link names a record that does not exist or cannot be made
    /// (including a manager link the ranks do not allow), or when a record
    /// lacks a link it must have.
    pub fn finish(self) -> Result<Model> {
        let Rebuild {
            extents, pending, ..
        } = self;
        let mut links = catalogue();
        let staff = HasExtent::<Staff>::extent(&extents);
        let rank = |source: EntityRef, target: EntityRef| -> Result<()> {
            staff.require(target.id)?.ensure_manages(staff.require(source.id)?)
        };

        for (source, stored) in pending {
            for StoredLink { relation, peers } in stored {
                if relation.source_kind() != source.kind {
                    return Err(Error::corrupt(format!(
                        "{source} cannot hold a {relation:?} link"
                    )));
                }
                for peer in peers {
                    let target = EntityRef::new(relation.target_kind(), peer);
                    if !ExtentSet::contains(&extents, target) {
                        return Err(Error::corrupt(format!(
                            "{relation:?} link of {source} names missing {target}"
                        )));
                    }
                    let symmetric = links.schema(relation).is_some_and(|s| s.symmetric);
                    if symmetric && links.has_edge(source, relation, target) {
                        continue;
                    }
                    let guard: Option<Guard<'_>> =
                        (relation == Rel::ManagedBy).then_some(&rank as Guard<'_>);
                    links.link_guarded(source, relation, target, guard).map_err(|err| {
                        Error::corrupt(format!(
                            "{relation:?} link of {source} to {target}: {err}"
                        ))
                    })?;
                }
            }
        }

        check_complete(&extents, &links)?;
        Ok(Model::from_parts(extents, links))
    }
}

fn check_complete(extents: &Extents, links: &RelationStore<Rel>) -> Result<()> {
    for relation in Rel::ALL {
        if relation.is_required() {
            for id in extents.ids(relation.source_kind()) {
                let source = EntityRef::new(relation.source_kind(), id);
                if links.target(source, relation).is_none() {
                    return Err(Error::corrupt(format!("{source} has no {relation:?} link")));
                }
            }
        }

        let min = links.schema(relation).map_or(0, |s| s.min_sources);
        if min > 0 {
            for id in extents.ids(relation.target_kind()) {
                let target = EntityRef::new(relation.target_kind(), id);
                if links.count_sources(target, relation) < min {
                    return Err(Error::corrupt(format!(
                        "{target} needs at least {min} {relation:?} link(s)"
                    )));
                }
            }
        }
    }
    Ok(())
}
