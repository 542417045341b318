//! Integration tests for compositions
//!
//! Tests part creation under a whole, part removal, and cascading delete
//! guarded by restricting relationships.

use trattoria_foundation::{EntityId, EntityRef, ErrorKind};
use trattoria_storage::{
    Composition, ExtentSet, OnDelete, Record, RelationSchema, RelationStore, Registry,
    delete_whole,
};

use crate::{Dish, Step, dish};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Rel {
    StepOf,
    Follows,
}

const STEPS: Composition<Rel> = Composition::new(Rel::StepOf);

#[derive(Default)]
struct Kitchen {
    dishes: Registry<Dish>,
    steps: Registry<Step>,
}

impl ExtentSet for Kitchen {
    fn contains(&self, entity: EntityRef) -> bool {
        match entity.kind {
            Dish::KIND => self.dishes.contains(entity.id),
            Step::KIND => self.steps.contains(entity.id),
            _ => false,
        }
    }

    fn remove(&mut self, entity: EntityRef) -> bool {
        match entity.kind {
            Dish::KIND => self.dishes.remove(entity.id).is_some(),
            Step::KIND => self.steps.remove(entity.id).is_some(),
            _ => false,
        }
    }
}

fn setup() -> (RelationStore<Rel>, Kitchen, EntityRef) {
    let links = [
        RelationSchema::composition(Rel::StepOf),
        RelationSchema::new(Rel::Follows).with_on_delete(OnDelete::Restrict),
    ]
    .into_iter()
    .collect();
    let mut kitchen = Kitchen::default();
    let id = kitchen.dishes.register(dish(1, "Risotto")).unwrap();
    (links, kitchen, Registry::<Dish>::node(id))
}

fn step(raw: u64) -> Step {
    Step {
        id: EntityId::new(raw),
    }
}

fn add_steps(links: &mut RelationStore<Rel>, kitchen: &mut Kitchen, whole: EntityRef, raws: &[u64]) {
    for raw in raws {
        STEPS
            .add_part(links, &mut kitchen.steps, whole, || Ok(step(*raw)))
            .unwrap();
    }
}

// =============================================================================
// Parts
// =============================================================================

#[test]
fn parts_listed_in_attachment_order() {
    let (mut links, mut kitchen, risotto) = setup();
    add_steps(&mut links, &mut kitchen, risotto, &[3, 1, 2]);

    let ids: Vec<_> = STEPS
        .parts(&links, risotto)
        .into_iter()
        .map(|part| part.id.value())
        .collect();

    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn part_identity_reusable_after_removal() {
    let (mut links, mut kitchen, risotto) = setup();
    add_steps(&mut links, &mut kitchen, risotto, &[101]);
    let part = Registry::<Step>::node(EntityId::new(101));

    assert!(STEPS.remove_part(&mut links, &mut kitchen, risotto, part).unwrap());
    assert!(!kitchen.steps.contains(part.id));

    add_steps(&mut links, &mut kitchen, risotto, &[101]);
    assert_eq!(STEPS.whole_of(&links, part), Some(risotto));
}

#[test]
fn removing_part_of_other_whole_is_noop() {
    let (mut links, mut kitchen, risotto) = setup();
    let other = Registry::<Dish>::node(kitchen.dishes.register(dish(2, "Ossobuco")).unwrap());
    add_steps(&mut links, &mut kitchen, other, &[5]);
    let part = Registry::<Step>::node(EntityId::new(5));

    assert!(!STEPS.remove_part(&mut links, &mut kitchen, risotto, part).unwrap());
    assert!(kitchen.steps.contains(part.id));
}

// =============================================================================
// Cascading Delete
// =============================================================================

#[test]
fn deleting_whole_removes_parts() {
    let (mut links, mut kitchen, risotto) = setup();
    add_steps(&mut links, &mut kitchen, risotto, &[1, 2]);

    let removed = delete_whole(&mut links, &mut kitchen, risotto).unwrap();

    assert_eq!(removed, 3);
    assert!(kitchen.dishes.is_empty());
    assert!(kitchen.steps.is_empty());
    assert!(links.is_consistent());
}

#[test]
fn second_delete_is_not_found() {
    let (mut links, mut kitchen, risotto) = setup();
    delete_whole(&mut links, &mut kitchen, risotto).unwrap();

    let err = delete_whole(&mut links, &mut kitchen, risotto).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::EntityNotFound { .. }));
}

#[test]
fn outside_restriction_blocks_delete() {
    let (mut links, mut kitchen, risotto) = setup();
    add_steps(&mut links, &mut kitchen, risotto, &[1]);
    let other = Registry::<Dish>::node(kitchen.dishes.register(dish(2, "Ossobuco")).unwrap());
    links
        .link(other, Rel::Follows, Registry::<Step>::node(EntityId::new(1)))
        .unwrap();

    let err = delete_whole(&mut links, &mut kitchen, risotto).unwrap_err();

    assert!(err.is_association());
    assert_eq!(kitchen.dishes.len(), 2);
    assert_eq!(kitchen.steps.len(), 1);
}

#[test]
fn restriction_inside_cascade_does_not_block() {
    let (mut links, mut kitchen, risotto) = setup();
    add_steps(&mut links, &mut kitchen, risotto, &[1, 2]);
    links
        .link(
            Registry::<Step>::node(EntityId::new(2)),
            Rel::Follows,
            Registry::<Step>::node(EntityId::new(1)),
        )
        .unwrap();

    assert_eq!(delete_whole(&mut links, &mut kitchen, risotto).unwrap(), 3);
}
