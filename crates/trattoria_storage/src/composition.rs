//! Whole/part ownership with cascading deletion.
//!
//! A composition is a relationship whose source is a part and whose target
//! is the whole that owns it. Parts are created under a whole, can be
//! removed from it individually, and are deleted with it.

use trattoria_foundation::{EntityId, EntityRef, Error, Result};

use crate::registry::{Record, Registry};
use crate::relationship::{RelationName, RelationStore};

/// Removes entities of any kind by reference.
///
/// Cascading deletion crosses extents, so it needs a uniform view of every
/// registry that can hold a part.
pub trait ExtentSet {
    /// Returns true if the entity is live.
    fn contains(&self, entity: EntityRef) -> bool;

    /// Removes the entity from its extent, returning whether it was present.
    fn remove(&mut self, entity: EntityRef) -> bool;
}

/// A composition relationship between a part kind and a whole kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Composition<R> {
    relation: R,
}

impl<R: RelationName> Composition<R> {
    /// Wraps a relationship registered with [`crate::RelationSchema::composition`].
    #[must_use]
    pub const fn new(relation: R) -> Self {
        Self { relation }
    }

    /// Returns the underlying relationship name.
    #[must_use]
    pub const fn relation(&self) -> R {
        self.relation
    }

    /// Builds a part and attaches it to `whole`.
    ///
    /// The part is registered and linked together: if linking fails the
    /// registration is undone.
    ///
    /// # Errors
    ///
    /// Returns the factory's error, an association error if the part already
    /// sits under `whole`, `IdentityConflict` if the part's identity is taken,
    /// or any error from creating the link.
    pub fn add_part<T, F>(
        &self,
        links: &mut RelationStore<R>,
        parts: &mut Registry<T>,
        whole: EntityRef,
        factory: F,
    ) -> Result<EntityId>
    where
        T: Record,
        F: FnOnce() -> Result<T>,
    {
        let part = factory()?;
        let node = part.entity_ref();

        if links.has_edge(node, self.relation, whole) {
            return Err(Error::association(format!(
                "{node} already exists under {whole}"
            )));
        }

        let id = parts.register(part)?;
        if let Err(err) = links.link(node, self.relation, whole) {
            parts.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Detaches `part` from `whole` and deletes it.
    ///
    /// Anything composed into the part goes with it. Returns `false` when
    /// `whole` does not own `part`.
    ///
    /// # Errors
    ///
    /// Returns an association error if the whole would drop below its
    /// minimum number of parts, or if the part is held by a restricting
    /// relationship.
    pub fn remove_part(
        &self,
        links: &mut RelationStore<R>,
        extents: &mut impl ExtentSet,
        whole: EntityRef,
        part: EntityRef,
    ) -> Result<bool> {
        if !links.has_edge(part, self.relation, whole) {
            return Ok(false);
        }

        let closure = plan_delete(links, extents, part)?;
        links.unlink(part, self.relation, whole)?;
        erase(links, extents, &closure);
        Ok(true)
    }

    /// Returns the parts owned by `whole`, in attachment order.
    #[must_use]
    pub fn parts(&self, links: &RelationStore<R>, whole: EntityRef) -> Vec<EntityRef> {
        links.sources(whole, self.relation).collect()
    }

    /// Returns the whole that owns `part`.
    #[must_use]
    pub fn whole_of(&self, links: &RelationStore<R>, part: EntityRef) -> Option<EntityRef> {
        links.target(part, self.relation)
    }
}

/// Deletes an entity together with everything composed into it.
///
/// The whole cascade is worked out first. If anything in it is still the
/// target of a restricting relationship from outside the cascade, or an
/// entity outside the cascade would drop below the minimum number of
/// sources its relationship requires, nothing is deleted. Otherwise every entity in the cascade is detached from all
/// of its relationships and removed from its extent.
///
/// Returns the number of entities removed.
///
/// # Errors
///
/// Returns `EntityNotFound` if `whole` is not live (including a second
/// call for the same whole), or an association error for a restriction.
pub fn delete_whole<R: RelationName>(
    links: &mut RelationStore<R>,
    extents: &mut impl ExtentSet,
    whole: EntityRef,
) -> Result<usize> {
    let closure = plan_delete(links, extents, whole)?;
    erase(links, extents, &closure);
    Ok(closure.len())
}

fn plan_delete<R: RelationName>(
    links: &RelationStore<R>,
    extents: &impl ExtentSet,
    root: EntityRef,
) -> Result<Vec<EntityRef>> {
    if !extents.contains(root) {
        return Err(Error::entity_not_found(root.kind, root.id));
    }

    let closure = links.dependents(root);
    for entity in &closure {
        for (relationship, source) in links.restrictions(*entity) {
            if !closure.contains(&source) {
                return Err(Error::association(format!(
                    "cannot delete {root}: {entity} is still referenced by {source} via {relationship:?}"
                )));
            }
        }
        for (relationship, target, is_source) in links.relationships_for(*entity) {
            if !is_source || closure.contains(&target) {
                continue;
            }
            let min = links.schema(relationship).map_or(0, |schema| schema.min_sources);
            if min == 0 {
                continue;
            }
            let leaving = closure
                .iter()
                .filter(|member| links.has_edge(**member, relationship, target))
                .count();
            if links.count_sources(target, relationship).saturating_sub(leaving) < min {
                return Err(Error::association(format!(
                    "cannot delete {root}: {target} must keep at least {min} {relationship:?} link(s)"
                )));
            }
        }
    }
    Ok(closure)
}

fn erase<R: RelationName>(
    links: &mut RelationStore<R>,
    extents: &mut impl ExtentSet,
    closure: &[EntityRef],
) {
    for entity in closure {
        links.on_entity_destroyed(*entity);
        extents.remove(*entity);
    }
    if let Some(root) = closure.first() {
        tracing::debug!(%root, removed = closure.len(), "cascade delete");
    }
}
