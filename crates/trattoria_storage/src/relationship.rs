//! Relationship storage with bidirectional indices.
//!
//! Relationships connect entities with typed, directed edges. The forward
//! index records each source's targets and the reverse index each target's
//! sources, so both peers' views of a link are updated by the same call and
//! can never disagree. Peer lists keep insertion order and never contain
//! the same peer twice.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use trattoria_foundation::{EntityRef, Error, Result};

use crate::schema::{OnDelete, OnViolation, RelationSchema};

/// Relationship name bound: any small copyable key.
pub trait RelationName: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> RelationName for T {}

/// A caller-supplied predicate gating link creation.
///
/// It receives `(source, target)` and runs after the structural checks but
/// before any mutation.
pub type Guard<'a> = &'a dyn Fn(EntityRef, EntityRef) -> Result<()>;

type Index<R> = HashMap<EntityRef, HashMap<R, Vec<EntityRef>>>;

/// Stores relationship edges between entities.
///
/// Maintains bidirectional indices for efficient traversal:
/// - Forward: source -> relationship -> targets
/// - Reverse: target -> relationship -> sources
#[derive(Clone, Debug)]
pub struct RelationStore<R: RelationName> {
    /// Registered schemas by relationship name.
    schemas: HashMap<R, RelationSchema<R>>,
    /// Forward index: source -> relationship -> ordered targets.
    forward: Index<R>,
    /// Reverse index: target -> relationship -> ordered sources.
    reverse: Index<R>,
}

impl<R: RelationName> Default for RelationStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a store from a catalogue of schemas. A later schema with the same
/// name replaces an earlier one.
impl<R: RelationName> FromIterator<RelationSchema<R>> for RelationStore<R> {
    fn from_iter<I: IntoIterator<Item = RelationSchema<R>>>(schemas: I) -> Self {
        Self {
            schemas: schemas.into_iter().map(|s| (s.name, s)).collect(),
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }
}

impl<R: RelationName> RelationStore<R> {
    /// Creates a new empty relationship store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Registers a relationship schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema with the same name is already registered.
    pub fn register_schema(&mut self, schema: RelationSchema<R>) -> Result<()> {
        if self.schemas.contains_key(&schema.name) {
            return Err(Error::internal(format!(
                "relationship schema already registered: {:?}",
                schema.name
            )));
        }
        self.schemas.insert(schema.name, schema);
        Ok(())
    }

    /// Gets the schema for a relationship type.
    #[must_use]
    pub fn schema(&self, relationship: R) -> Option<&RelationSchema<R>> {
        self.schemas.get(&relationship)
    }

    fn require_schema(&self, relationship: R) -> Result<RelationSchema<R>> {
        self.schemas
            .get(&relationship)
            .cloned()
            .ok_or_else(|| Error::internal(format!("unknown relationship: {relationship:?}")))
    }

    /// Creates a relationship edge.
    ///
    /// # Errors
    ///
    /// See [`RelationStore::link_guarded`].
    pub fn link(&mut self, source: EntityRef, relationship: R, target: EntityRef) -> Result<()> {
        self.link_guarded(source, relationship, target, None)
    }

    /// Creates a relationship edge, consulting an optional guard.
    ///
    /// Checks run in order: self-reference (reflexive relations), duplicate
    /// link, the guard, then cardinality and capacity. Nothing is mutated
    /// unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns an association error if any check fails, or an internal
    /// error if the relationship is not registered.
    pub fn link_guarded(
        &mut self,
        source: EntityRef,
        relationship: R,
        target: EntityRef,
        guard: Option<Guard<'_>>,
    ) -> Result<()> {
        let schema = self.require_schema(relationship)?;

        if schema.reflexive && source == target {
            return Err(Error::association(format!(
                "self-relation is not allowed: {source} cannot be linked to itself via {relationship:?}"
            )));
        }

        if self.has_edge(source, relationship, target) {
            return Err(Error::association(format!(
                "{source} is already linked to {target} via {relationship:?}"
            )));
        }

        if let Some(guard) = guard {
            guard(source, target)?;
        }

        let detach = self.plan_cardinality(&schema, source, target)?;

        for (old_source, old_target) in detach {
            self.remove_edge(old_source, relationship, old_target);
        }
        self.insert_edge(source, relationship, target);
        if schema.symmetric {
            self.insert_edge(target, relationship, source);
        }

        Ok(())
    }

    /// Works out which existing edges a new `source -> target` edge would
    /// displace, or fails if the schema forbids the displacement.
    fn plan_cardinality(
        &self,
        schema: &RelationSchema<R>,
        source: EntityRef,
        target: EntityRef,
    ) -> Result<Vec<(EntityRef, EntityRef)>> {
        let relationship = schema.name;
        let mut detach = Vec::new();

        if schema.single_target() {
            for old_target in self.targets(source, relationship) {
                if schema.on_violation == OnViolation::Error {
                    return Err(Error::association(format!(
                        "cardinality violation: {source} already has a {relationship:?} link to {old_target}"
                    )));
                }
                detach.push((source, old_target));
            }
        }

        if schema.single_source() {
            for old_source in self.sources(target, relationship) {
                if schema.on_violation == OnViolation::Error {
                    return Err(Error::association(format!(
                        "cardinality violation: {target} already has a {relationship:?} link from {old_source}"
                    )));
                }
                detach.push((old_source, target));
            }
        }

        if let Some(max) = schema.max_sources {
            let released = detach.iter().filter(|(_, t)| *t == target).count();
            let remaining = self.count_sources(target, relationship) - released;
            if remaining >= max {
                return Err(Error::association(format!(
                    "{target} has reached its limit of {max} {relationship:?} links"
                )));
            }
        }

        for (old_source, old_target) in &detach {
            if *old_target != target
                && self.count_sources(*old_target, relationship) <= schema.min_sources
            {
                return Err(Error::association(format!(
                    "cannot move {old_source}: {old_target} must keep at least {} {relationship:?} links",
                    schema.min_sources
                )));
            }
        }

        Ok(detach)
    }

    /// Removes a relationship edge.
    ///
    /// # Errors
    ///
    /// Returns an association error if the edge does not exist, or if
    /// removing it would leave the target below the schema's minimum.
    pub fn unlink(&mut self, source: EntityRef, relationship: R, target: EntityRef) -> Result<()> {
        let schema = self.require_schema(relationship)?;

        if !self.has_edge(source, relationship, target) {
            return Err(Error::association(format!(
                "{source} is not linked to {target} via {relationship:?}"
            )));
        }

        if schema.min_sources > 0
            && self.count_sources(target, relationship) <= schema.min_sources
        {
            return Err(Error::association(format!(
                "{target} must keep at least {} {relationship:?} link(s)",
                schema.min_sources
            )));
        }

        self.remove_edge(source, relationship, target);
        if schema.symmetric {
            self.remove_edge(target, relationship, source);
        }
        Ok(())
    }

    /// Moves a singular slot from its current target to `new_target`.
    ///
    /// The current target, if any, is detached first; an empty slot is not
    /// an error. The new link is then created under the usual checks. If
    /// creation fails the source stays detached: it is not rolled back to
    /// its previous target.
    ///
    /// # Errors
    ///
    /// Returns an association error if the slot is not singular, if the
    /// source is already linked to `new_target`, if the old link cannot be
    /// removed, or if the new link cannot be created.
    pub fn reassign(
        &mut self,
        source: EntityRef,
        relationship: R,
        new_target: EntityRef,
        guard: Option<Guard<'_>>,
    ) -> Result<()> {
        let schema = self.require_schema(relationship)?;
        if !schema.single_target() {
            return Err(Error::association(format!(
                "{relationship:?} is not a singular relationship"
            )));
        }

        if self.has_edge(source, relationship, new_target) {
            return Err(Error::association(format!(
                "{source} is already linked to {new_target} via {relationship:?}"
            )));
        }

        let previous: Vec<_> = self.targets(source, relationship).collect();
        for old_target in previous {
            self.unlink(source, relationship, old_target)?;
        }

        self.link_guarded(source, relationship, new_target, guard)
            .inspect_err(|err| {
                tracing::debug!(%source, ?relationship, %new_target, %err, "reassignment left source detached");
            })
    }

    fn insert_edge(&mut self, source: EntityRef, relationship: R, target: EntityRef) {
        let targets = self
            .forward
            .entry(source)
            .or_default()
            .entry(relationship)
            .or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
        let sources = self
            .reverse
            .entry(target)
            .or_default()
            .entry(relationship)
            .or_default();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }

    fn remove_edge(&mut self, source: EntityRef, relationship: R, target: EntityRef) {
        if let Some(targets) = self
            .forward
            .get_mut(&source)
            .and_then(|rels| rels.get_mut(&relationship))
        {
            targets.retain(|t| *t != target);
        }
        if let Some(sources) = self
            .reverse
            .get_mut(&target)
            .and_then(|rels| rels.get_mut(&relationship))
        {
            sources.retain(|s| *s != source);
        }
    }

    /// Gets targets of a relationship from a source (forward traversal).
    pub fn targets(
        &self,
        source: EntityRef,
        relationship: R,
    ) -> impl Iterator<Item = EntityRef> + '_ {
        self.forward
            .get(&source)
            .and_then(|m| m.get(&relationship))
            .into_iter()
            .flat_map(|peers| peers.iter().copied())
    }

    /// Gets sources pointing to a target (reverse traversal).
    pub fn sources(
        &self,
        target: EntityRef,
        relationship: R,
    ) -> impl Iterator<Item = EntityRef> + '_ {
        self.reverse
            .get(&target)
            .and_then(|m| m.get(&relationship))
            .into_iter()
            .flat_map(|peers| peers.iter().copied())
    }

    /// Gets the single target of a singular slot.
    #[must_use]
    pub fn target(&self, source: EntityRef, relationship: R) -> Option<EntityRef> {
        self.targets(source, relationship).next()
    }

    /// Counts the sources pointing to a target.
    #[must_use]
    pub fn count_sources(&self, target: EntityRef, relationship: R) -> usize {
        self.reverse
            .get(&target)
            .and_then(|m| m.get(&relationship))
            .map_or(0, Vec::len)
    }

    /// Checks if a specific edge exists.
    #[must_use]
    pub fn has_edge(&self, source: EntityRef, relationship: R, target: EntityRef) -> bool {
        self.forward
            .get(&source)
            .and_then(|m| m.get(&relationship))
            .is_some_and(|peers| peers.contains(&target))
    }

    /// Collects every entity whose existence depends on `entity`.
    ///
    /// Follows cascade relationships transitively; `entity` itself comes
    /// first and each dependent appears once, before its own dependents.
    #[must_use]
    pub fn dependents(&self, entity: EntityRef) -> Vec<EntityRef> {
        let mut closure = vec![entity];
        let mut cursor = 0;
        while cursor < closure.len() {
            let current = closure[cursor];
            cursor += 1;
            let Some(reverse_rels) = self.reverse.get(&current) else {
                continue;
            };
            for (rel, sources) in reverse_rels {
                let cascades = self
                    .schemas
                    .get(rel)
                    .is_some_and(|s| s.on_target_delete == OnDelete::Cascade);
                if !cascades {
                    continue;
                }
                for source in sources {
                    if !closure.contains(source) {
                        closure.push(*source);
                    }
                }
            }
        }
        closure
    }

    /// Returns the restricting edges `(relationship, source)` that point at
    /// `entity` and forbid its deletion.
    #[must_use]
    pub fn restrictions(&self, entity: EntityRef) -> Vec<(R, EntityRef)> {
        let mut result = Vec::new();
        if let Some(reverse_rels) = self.reverse.get(&entity) {
            for (rel, sources) in reverse_rels {
                let restricts = self
                    .schemas
                    .get(rel)
                    .is_some_and(|s| s.on_target_delete == OnDelete::Restrict);
                if restricts {
                    result.extend(sources.iter().map(|source| (*rel, *source)));
                }
            }
        }
        result
    }

    /// Detaches every edge touching a destroyed entity, in either role.
    ///
    /// Minimum cardinalities are not consulted: the entity is gone.
    /// Returns the sources that should be cascade-deleted.
    pub fn on_entity_destroyed(&mut self, entity: EntityRef) -> Vec<EntityRef> {
        let mut cascade_victims = Vec::new();

        // Edges where this entity is the target
        if let Some(reverse_rels) = self.reverse.remove(&entity) {
            for (rel, sources) in reverse_rels {
                let cascades = self
                    .schemas
                    .get(&rel)
                    .is_some_and(|s| s.on_target_delete == OnDelete::Cascade);
                for source in sources {
                    if let Some(targets) = self
                        .forward
                        .get_mut(&source)
                        .and_then(|fwd| fwd.get_mut(&rel))
                    {
                        targets.retain(|t| *t != entity);
                    }
                    if cascades && source != entity && !cascade_victims.contains(&source) {
                        cascade_victims.push(source);
                    }
                }
            }
        }

        // Edges where this entity is the source
        if let Some(forward_rels) = self.forward.remove(&entity) {
            for (rel, targets) in forward_rels {
                for target in targets {
                    if let Some(sources) = self
                        .reverse
                        .get_mut(&target)
                        .and_then(|rev| rev.get_mut(&rel))
                    {
                        sources.retain(|s| *s != entity);
                    }
                }
            }
        }

        cascade_victims
    }

    /// Returns all relationships involving an entity.
    ///
    /// The flag is `true` when the entity is the source of the edge.
    #[must_use]
    pub fn relationships_for(&self, entity: EntityRef) -> Vec<(R, EntityRef, bool)> {
        let mut result = Vec::new();

        if let Some(fwd) = self.forward.get(&entity) {
            for (rel, targets) in fwd {
                for target in targets {
                    result.push((*rel, *target, true));
                }
            }
        }

        if let Some(rev) = self.reverse.get(&entity) {
            for (rel, sources) in rev {
                for source in sources {
                    result.push((*rel, *source, false));
                }
            }
        }

        result
    }

    /// Returns true if `entity` appears in any edge.
    #[must_use]
    pub fn is_referenced(&self, entity: EntityRef) -> bool {
        let touches = |index: &Index<R>| {
            index
                .get(&entity)
                .is_some_and(|rels| rels.values().any(|peers| !peers.is_empty()))
        };
        touches(&self.forward) || touches(&self.reverse)
    }

    /// Removes every edge, keeping registered schemas.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Verifies that the forward and reverse indices mirror each other and
    /// hold no duplicate peers.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mirrored = |from: &Index<R>, to: &Index<R>| {
            from.iter().all(|(node, rels)| {
                rels.iter().all(|(rel, peers)| {
                    let mut seen = Vec::with_capacity(peers.len());
                    peers.iter().all(|peer| {
                        let unique = !seen.contains(peer);
                        seen.push(*peer);
                        unique
                            && to
                                .get(peer)
                                .and_then(|m| m.get(rel))
                                .is_some_and(|back| back.contains(node))
                    })
                })
            })
        };
        mirrored(&self.forward, &self.reverse) && mirrored(&self.reverse, &self.forward)
    }
}
