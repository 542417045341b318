//! Integration tests for persistence
//!
//! Tests extent round trips through archives and directories, and how
//! loading degrades when files are missing or damaged.

use std::fs;

use chrono::Utc;
use trattoria_foundation::{EntityId, ErrorKind, Money};
use trattoria_model::{
    Customer, FoodCategory, ItemKind, ManagerLevel, MenuItem, Model, Order, Quantity, Restaurant,
    ShiftPattern, ShiftType, Staff, StaffDraft, Table,
};
use trattoria_runtime::{
    Archive, LoadStatus, StoreConfig, from_bytes, load_from_dir, save_to_dir, to_bytes,
    try_load_from_dir,
};

fn id(raw: u64) -> EntityId {
    EntityId::new(raw)
}

fn two_customers() -> Model {
    let mut model = Model::new();
    model
        .register_customer(Customer::new(id(1), "Marta", "Ferri").unwrap())
        .unwrap();
    model
        .register_customer(Customer::new(id(2), "Paolo", "Greco").unwrap())
        .unwrap();
    model
}

fn names(model: &Model) -> Vec<(u64, String, String)> {
    model
        .all::<Customer>()
        .iter()
        .map(|c| (c.id.value(), c.first_name.clone(), c.last_name.clone()))
        .collect()
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn customers_survive_blob_round_trip() {
    let mut model = two_customers();
    let before = names(&model);
    let blob = Archive::save_extent(&model, "customer").unwrap();

    model.clear();
    assert_eq!(model.count::<Customer>(), 0);

    let mut archive = Archive::new();
    archive.insert("customer", blob);
    let restored = archive.load().unwrap();

    assert_eq!(restored.count::<Customer>(), 2);
    assert_eq!(names(&restored), before);
}

#[test]
fn customers_survive_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    let mut model = two_customers();
    let before = names(&model);

    save_to_dir(&model, &config).unwrap();
    model.clear();
    let loaded = load_from_dir(&config);

    assert_eq!(loaded.status, LoadStatus::Loaded);
    assert_eq!(loaded.model.count::<Customer>(), 2);
    assert_eq!(names(&loaded.model), before);
}

#[test]
fn whole_graph_survives_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("nested")).with_extension("bin");
    let mut model = two_customers();
    let kind = ItemKind::Food {
        spicy: true,
        vegetarian: false,
        calories: 900,
        prep_minutes: 20,
        category: FoodCategory::MainCourse,
    };
    model
        .add_menu_item(MenuItem::new(id(7), "Lasagne", Money::from_units(14), kind).unwrap())
        .unwrap();
    model
        .place_order(
            id(2),
            Order::new(id(20), Utc::now(), false).unwrap(),
            Quantity::new(id(21), 2).unwrap(),
            id(7),
        )
        .unwrap();
    let boss = model
        .hire(
            StaffDraft::new(id(30), "Gina", "Rossi", "Floor")
                .manager(ManagerLevel::Senior)
                .full_time(ShiftPattern::Morning, Money::from_units(3000)),
        )
        .unwrap();
    let cook = model
        .hire(
            StaffDraft::new(id(31), "Enzo", "Riva", "Kitchen")
                .chef()
                .part_time(25, Money::from_units(14)),
        )
        .unwrap();
    model.add_managed_staff(boss, cook).unwrap();
    model
        .open_restaurant(Restaurant::new(id(40), "Da Nino", "12-23").unwrap())
        .unwrap();
    model.add_table(id(40), id(41), 3).unwrap();
    model.schedule_shift(cook, id(40), id(42), ShiftType::Evening).unwrap();

    save_to_dir(&model, &config).unwrap();
    let loaded = try_load_from_dir(&config).unwrap();

    assert!(config.path_for("order").exists());
    assert_eq!(loaded.orders_of(id(2)), vec![id(20)]);
    assert_eq!(loaded.order_total(id(20)).unwrap(), Money::from_units(28));
    assert_eq!(loaded.manager_of(cook), Some(boss));
    assert_eq!(loaded.require::<Staff>(cook).unwrap(), model.require::<Staff>(cook).unwrap());
    assert_eq!(loaded.tables(id(40)), vec![id(41)]);
    assert_eq!(loaded.shifts_of(cook), vec![id(42)]);
    assert!(loaded.links().is_consistent());
}

// =============================================================================
// Degraded Loads
// =============================================================================

#[test]
fn missing_directory_loads_empty_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("never-written"));

    let loaded = load_from_dir(&config);

    assert_eq!(loaded.status, LoadStatus::NotFound);
    assert!(loaded.model.is_empty());
    assert!(matches!(
        try_load_from_dir(&config).unwrap_err().kind,
        ErrorKind::NotFound(_)
    ));
}

#[test]
fn one_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    save_to_dir(&two_customers(), &config).unwrap();
    fs::remove_file(config.path_for("table")).unwrap();

    let loaded = load_from_dir(&config);

    assert_eq!(loaded.status, LoadStatus::NotFound);
    assert!(loaded.model.is_empty());
}

#[test]
fn damaged_file_loads_empty_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    save_to_dir(&two_customers(), &config).unwrap();
    fs::write(config.path_for("customer"), [0xc1, 0xc1, 0xc1]).unwrap();

    let loaded = load_from_dir(&config);

    assert_eq!(loaded.status, LoadStatus::Corrupt);
    assert!(!loaded.is_loaded());
    assert!(loaded.model.is_empty());
}

#[test]
fn dangling_link_is_corrupt() {
    let mut model = two_customers();
    model
        .open_restaurant(Restaurant::new(id(40), "Da Nino", "12-23").unwrap())
        .unwrap();
    model.add_table(id(40), id(41), 1).unwrap();
    let mut archive = Archive::save(&model).unwrap();
    let no_restaurants: Vec<trattoria_model::StoredRecord<Restaurant>> = Vec::new();
    archive.insert("restaurant", to_bytes(&no_restaurants).unwrap());

    let err = archive.load().unwrap_err();

    assert!(matches!(err.kind, ErrorKind::CorruptData(_)));
    assert!(err.to_string().contains("restaurant#40"));
}

#[test]
fn table_extent_decodes_on_its_own() {
    let mut model = Model::new();
    model
        .open_restaurant(Restaurant::new(id(40), "Da Nino", "12-23").unwrap())
        .unwrap();
    model.add_table(id(40), id(41), 9).unwrap();

    let blob = Archive::save_extent(&model, "table").unwrap();
    let stored: Vec<trattoria_model::StoredRecord<Table>> = from_bytes(&blob).unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].record.number, 9);
    assert_eq!(stored[0].links[0].peers, vec![id(40)]);
}

// =============================================================================
// Property Tests
// =============================================================================

mod properties {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use trattoria_foundation::{EntityRef, Money};
    use trattoria_model::{
        Customer, Extents, FoodCategory, HasExtent, ItemKind, ManagerLevel, MenuItem, Model,
        Order, Quantity, Rel, ShiftPattern, Staff, StaffDraft,
    };
    use trattoria_runtime::Archive;
    use trattoria_storage::Record;

    use super::id;

    #[derive(Clone, Debug)]
    struct Plan {
        customers: Vec<(String, String)>,
        prices: Vec<i64>,
        orders: Vec<(usize, i64, Vec<(usize, u32)>)>,
        related: Vec<(usize, usize)>,
        ranks: Vec<u8>,
        managed: Vec<(usize, usize)>,
    }

    fn plan() -> impl Strategy<Value = Plan> {
        (
            prop::collection::vec(("[A-Z][a-z]{1,8}", "[A-Z][a-z]{1,8}"), 1..4),
            prop::collection::vec(1i64..60, 1..5),
            prop::collection::vec(
                (
                    any::<usize>(),
                    0i64..100_000,
                    prop::collection::vec((any::<usize>(), 1u32..9), 1..4),
                ),
                0..5,
            ),
            prop::collection::vec((any::<usize>(), any::<usize>()), 0..6),
            prop::collection::vec(0u8..4, 0..5),
            prop::collection::vec((any::<usize>(), any::<usize>()), 0..6),
        )
            .prop_map(|(customers, prices, orders, related, ranks, managed)| Plan {
                customers,
                prices,
                orders,
                related,
                ranks,
                managed,
            })
    }

    fn pick(ids: &[u64], index: usize) -> u64 {
        ids[index % ids.len()]
    }

    fn build(plan: &Plan) -> Model {
        let mut model = Model::new();
        let mut customers = Vec::new();
        for (n, (first, last)) in plan.customers.iter().enumerate() {
            let raw = n as u64 + 1;
            let customer = Customer::new(id(raw), first.as_str(), last.as_str()).unwrap();
            model.register_customer(customer).unwrap();
            customers.push(raw);
        }

        let mut items = Vec::new();
        for (n, price) in plan.prices.iter().enumerate() {
            let raw = n as u64 + 1000;
            let kind = ItemKind::Food {
                spicy: n % 2 == 0,
                vegetarian: true,
                calories: 400,
                prep_minutes: 10,
                category: FoodCategory::MainCourse,
            };
            let item = MenuItem::new(id(raw), format!("Dish {raw}"), Money::from_units(*price), kind)
                .unwrap();
            model.add_menu_item(item).unwrap();
            items.push(raw);
        }

        let mut line = 10_000;
        for (n, (customer, seconds, lines)) in plan.orders.iter().enumerate() {
            let order = n as u64 + 100;
            let placed = Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap();
            let (first_item, first_amount) = lines[0];
            line += 1;
            model
                .place_order(
                    id(pick(&customers, *customer)),
                    Order::new(id(order), placed, n % 2 == 1).unwrap(),
                    Quantity::new(id(line), first_amount).unwrap(),
                    id(pick(&items, first_item)),
                )
                .unwrap();
            for (item, amount) in &lines[1..] {
                line += 1;
                let quantity = Quantity::new(id(line), *amount).unwrap();
                model
                    .add_line(id(order), quantity, id(pick(&items, *item)))
                    .unwrap();
            }
        }

        for (a, b) in &plan.related {
            let _ = model.add_related_item(id(pick(&items, *a)), id(pick(&items, *b)));
        }

        let mut staff = Vec::new();
        for (n, rank) in plan.ranks.iter().enumerate() {
            let raw = n as u64 + 500;
            let draft = StaffDraft::new(id(raw), "Gina", "Rossi", "Floor");
            let draft = match rank {
                0 => draft.chef(),
                1 => draft.manager(ManagerLevel::Junior),
                2 => draft.manager(ManagerLevel::Mid),
                _ => draft.manager(ManagerLevel::Senior),
            };
            let draft = if *rank == 0 {
                draft.part_time(20, Money::from_units(15))
            } else {
                draft.full_time(ShiftPattern::Evening, Money::from_units(2000 + i64::from(*rank) * 300))
            };
            model.hire(draft).unwrap();
            staff.push(raw);
        }
        if !staff.is_empty() {
            for (a, b) in &plan.managed {
                let _ = model.add_managed_staff(id(pick(&staff, *a)), id(pick(&staff, *b)));
            }
        }
        model
    }

    fn records<T: Record + Clone>(model: &Model) -> Vec<T>
    where
        Extents: HasExtent<T>,
    {
        let mut records: Vec<T> = model.all::<T>().iter().cloned().collect();
        records.sort_by_key(T::id);
        records
    }

    fn nodes<T: Record + Clone>(model: &Model) -> Vec<EntityRef>
    where
        Extents: HasExtent<T>,
    {
        records::<T>(model).iter().map(|record| record.entity_ref()).collect()
    }

    fn edges(model: &Model, nodes: &[EntityRef]) -> Vec<Vec<(Rel, EntityRef, bool)>> {
        nodes
            .iter()
            .map(|node| {
                let mut edges = model.links().relationships_for(*node);
                edges.sort();
                edges
            })
            .collect()
    }

    proptest! {
        #[test]
        fn archive_round_trip_keeps_the_graph(plan in plan()) {
            let model = build(&plan);

            let restored = Archive::save(&model).unwrap().load().unwrap();

            prop_assert_eq!(records::<Customer>(&restored), records::<Customer>(&model));
            prop_assert_eq!(records::<MenuItem>(&restored), records::<MenuItem>(&model));
            prop_assert_eq!(records::<Order>(&restored), records::<Order>(&model));
            prop_assert_eq!(records::<Quantity>(&restored), records::<Quantity>(&model));
            prop_assert_eq!(records::<Staff>(&restored), records::<Staff>(&model));

            let nodes = [
                nodes::<Customer>(&model),
                nodes::<MenuItem>(&model),
                nodes::<Order>(&model),
                nodes::<Quantity>(&model),
                nodes::<Staff>(&model),
            ]
            .concat();
            prop_assert_eq!(edges(&restored, &nodes), edges(&model, &nodes));
            prop_assert!(restored.links().is_consistent());
        }
    }
}
