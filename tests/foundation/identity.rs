//! Integration tests for entity identities
//!
//! Tests raw identities and kind-qualified references.

use std::collections::HashSet;

use trattoria_foundation::{EntityId, EntityRef};

// =============================================================================
// EntityId
// =============================================================================

#[test]
fn entity_id_round_trips_raw_value() {
    let id = EntityId::new(42);
    assert_eq!(id.value(), 42);
    assert_eq!(EntityId::from(42), id);
}

#[test]
fn entity_id_display_is_bare_number() {
    assert_eq!(format!("{}", EntityId::new(7)), "7");
    assert_eq!(format!("{:?}", EntityId::new(7)), "EntityId(7)");
}

// =============================================================================
// EntityRef
// =============================================================================

#[test]
fn same_id_in_different_kinds_is_different_node() {
    let table = EntityRef::new("table", EntityId::new(1));
    let menu = EntityRef::new("menu", EntityId::new(1));

    let nodes: HashSet<_> = [table, menu, table].into_iter().collect();

    assert_eq!(nodes.len(), 2);
    assert_ne!(table, menu);
}

#[test]
fn entity_ref_display_names_kind() {
    let node = EntityRef::new("order", EntityId::new(10));
    assert_eq!(node.to_string(), "order#10");
}
