//! Schema definitions for relationships.
//!
//! A relationship schema states how two kinds of entity may be linked:
//! cardinality, what deleting the target does, self-link rules, and the
//! minimum and maximum number of sources a target must keep.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Schema definition for a relationship type.
///
/// Edges are directed from a source to a target. A composition is a
/// relationship from part (source) to whole (target).
#[derive(Clone, Debug, PartialEq)]
pub struct RelationSchema<R> {
    /// Relationship name.
    pub name: R,
    /// Cardinality constraint.
    pub cardinality: Cardinality,
    /// What happens to sources when the target entity is deleted.
    pub on_target_delete: OnDelete,
    /// What happens when cardinality would be violated.
    pub on_violation: OnViolation,
    /// Both ends are the same kind and an entity may not link to itself.
    pub reflexive: bool,
    /// Both ends share one collection: linking a to b also links b to a.
    pub symmetric: bool,
    /// A target keeps at least this many sources once it has reached it.
    pub min_sources: usize,
    /// A target may have at most this many sources.
    pub max_sources: Option<usize>,
    /// The source is a part owned by the target.
    pub composition: bool,
}

impl<R> RelationSchema<R> {
    /// Creates a new relationship schema with default settings.
    #[must_use]
    pub fn new(name: R) -> Self {
        Self {
            name,
            cardinality: Cardinality::ManyToMany,
            on_target_delete: OnDelete::Remove,
            on_violation: OnViolation::Error,
            reflexive: false,
            symmetric: false,
            min_sources: 0,
            max_sources: None,
            composition: false,
        }
    }

    /// Creates a part-to-whole composition schema.
    ///
    /// Each part has exactly one whole and is deleted with it.
    #[must_use]
    pub fn composition(name: R) -> Self {
        Self {
            cardinality: Cardinality::ManyToOne,
            on_target_delete: OnDelete::Cascade,
            composition: true,
            ..Self::new(name)
        }
    }

    /// Sets the cardinality.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Sets the on-delete behavior.
    #[must_use]
    pub fn with_on_delete(mut self, on_delete: OnDelete) -> Self {
        self.on_target_delete = on_delete;
        self
    }

    /// Sets the on-violation behavior.
    #[must_use]
    pub fn with_on_violation(mut self, on_violation: OnViolation) -> Self {
        self.on_violation = on_violation;
        self
    }

    /// Marks the relationship as reflexive (self-links are rejected).
    #[must_use]
    pub fn reflexive(mut self) -> Self {
        self.reflexive = true;
        self
    }

    /// Marks the relationship as reflexive and symmetric.
    #[must_use]
    pub fn symmetric(mut self) -> Self {
        self.reflexive = true;
        self.symmetric = true;
        self.cardinality = Cardinality::ManyToMany;
        self
    }

    /// Sets the minimum number of sources a target keeps.
    #[must_use]
    pub fn with_min_sources(mut self, min: usize) -> Self {
        self.min_sources = min;
        self
    }

    /// Sets the maximum number of sources a target may have.
    #[must_use]
    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = Some(max);
        self
    }

    /// Returns true if a source holds at most one target.
    #[must_use]
    pub fn single_target(&self) -> bool {
        matches!(
            self.cardinality,
            Cardinality::OneToOne | Cardinality::ManyToOne
        )
    }

    /// Returns true if a target holds at most one source.
    #[must_use]
    pub fn single_source(&self) -> bool {
        matches!(
            self.cardinality,
            Cardinality::OneToOne | Cardinality::OneToMany
        )
    }
}

/// Cardinality constraint for relationships.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cardinality {
    /// Each source has at most one target, each target has at most one source.
    OneToOne,
    /// Each source has at most one target, targets can have many sources.
    ManyToOne,
    /// Each source can have many targets, each target has at most one source.
    OneToMany,
    /// No cardinality constraints.
    ManyToMany,
}

/// What happens when the target of a relationship is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnDelete {
    /// Remove the relationship edge.
    Remove,
    /// Delete the source entity as well (cascade).
    Cascade,
    /// Refuse to delete the target while sources remain.
    Restrict,
}

/// What happens when a cardinality constraint would be violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnViolation {
    /// Return an error.
    Error,
    /// Replace the existing relationship.
    Replace,
}
