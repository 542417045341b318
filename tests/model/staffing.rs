//! Integration tests for staffing
//!
//! Tests the manager hierarchy and role-gated actions.

use trattoria_foundation::{ErrorKind, Money};
use trattoria_model::{ManagerLevel, Model, Payment, PaymentMethod, PaymentStatus, Shift, ShiftType, Staff};

use crate::{id, manager, recording, seeded_order, staff};

// =============================================================================
// Manager Hierarchy
// =============================================================================

#[test]
fn senior_manages_junior() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);
    let junior = manager(&mut model, 2, ManagerLevel::Junior);

    model.add_managed_staff(senior, junior).unwrap();

    assert_eq!(model.manager_of(junior), Some(senior));
    assert_eq!(model.managed_staff(senior), vec![junior]);
}

#[test]
fn junior_cannot_manage_senior() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);
    let junior = manager(&mut model, 2, ManagerLevel::Junior);

    let err = model.add_managed_staff(junior, senior).unwrap_err();

    assert!(err.is_association());
    assert!(err.to_string().contains("cannot manage"));
    assert_eq!(model.manager_of(senior), None);
}

#[test]
fn equal_rank_cannot_manage() {
    let mut model = Model::new();
    let a = manager(&mut model, 1, ManagerLevel::Mid);
    let b = manager(&mut model, 2, ManagerLevel::Mid);

    assert!(model.add_managed_staff(a, b).is_err());
}

#[test]
fn non_manager_can_be_managed_but_cannot_manage() {
    let mut model = Model::new();
    let boss = manager(&mut model, 1, ManagerLevel::Junior);
    let waiter = model.hire(staff(2, "Neri").waiter(4)).unwrap();

    model.add_managed_staff(boss, waiter).unwrap();

    assert!(model.add_managed_staff(waiter, boss).is_err());
}

#[test]
fn self_management_is_self_relation() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);

    let err = model.add_managed_staff(senior, senior).unwrap_err();

    assert!(err.to_string().contains("self-relation"));
}

#[test]
fn new_manager_replaces_old() {
    let mut model = Model::new();
    let first = manager(&mut model, 1, ManagerLevel::Senior);
    let second = manager(&mut model, 2, ManagerLevel::Mid);
    let junior = manager(&mut model, 3, ManagerLevel::Junior);
    model.add_managed_staff(first, junior).unwrap();

    model.add_managed_staff(second, junior).unwrap();

    assert_eq!(model.manager_of(junior), Some(second));
    assert!(model.managed_staff(first).is_empty());
}

#[test]
fn rank_failure_keeps_current_manager() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);
    let mid = manager(&mut model, 2, ManagerLevel::Mid);
    let other_mid = manager(&mut model, 3, ManagerLevel::Mid);
    model.add_managed_staff(senior, mid).unwrap();

    assert!(model.add_managed_staff(other_mid, mid).is_err());

    assert_eq!(model.manager_of(mid), Some(senior));
}

#[test]
fn demotion_that_breaks_hierarchy_is_refused() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);
    let mid = manager(&mut model, 2, ManagerLevel::Mid);
    model.add_managed_staff(senior, mid).unwrap();

    let err = model
        .update_staff(senior, |draft| draft.level = Some(ManagerLevel::Junior))
        .unwrap_err();

    assert!(err.is_association());
    assert_eq!(
        model.require::<Staff>(senior).unwrap().role.level(),
        Some(ManagerLevel::Senior)
    );
}

#[test]
fn deleting_manager_detaches_subordinates() {
    let mut model = Model::new();
    let senior = manager(&mut model, 1, ManagerLevel::Senior);
    let junior = manager(&mut model, 2, ManagerLevel::Junior);
    model.add_managed_staff(senior, junior).unwrap();

    model.delete::<Staff>(senior).unwrap();

    assert_eq!(model.manager_of(junior), None);
    assert!(model.get::<Staff>(junior).is_some());
}

// =============================================================================
// Role-Gated Actions
// =============================================================================

#[test]
fn manager_hires_and_fires() {
    let (mut model, recorder) = recording();
    let boss = manager(&mut model, 1, ManagerLevel::Senior);

    let hired = model.hire_staff(boss, staff(2, "Neri").chef()).unwrap();
    model.fire_staff(boss, hired).unwrap();

    assert!(model.get::<Staff>(hired).is_none());
    assert_eq!(
        recorder.messages(),
        vec![
            "Manager Bianchi is hiring staff.".to_string(),
            "Manager Bianchi is firing staff.".to_string(),
        ]
    );
}

#[test]
fn firing_removes_shifts() {
    let mut model = Model::new();
    let boss = manager(&mut model, 1, ManagerLevel::Senior);
    let chef = model.hire(staff(2, "Neri").chef()).unwrap();
    model
        .open_restaurant(trattoria_model::Restaurant::new(id(50), "Da Nino", "12-23").unwrap())
        .unwrap();
    model.schedule_shift(chef, id(50), id(500), ShiftType::Night).unwrap();

    model.fire_staff(boss, chef).unwrap();

    assert_eq!(model.count::<Shift>(), 0);
}

#[test]
fn only_managers_hire() {
    let mut model = Model::new();
    let chef = model.hire(staff(1, "Neri").chef()).unwrap();

    let err = model.hire_staff(chef, staff(2, "Verdi").chef()).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Validation { .. }));
    assert!(model.get::<Staff>(id(2)).is_none());
}

#[test]
fn cashier_receives_payment_once() {
    let (mut model, recorder) = recording();
    seeded_order(&mut model);
    let cashier = model.hire(staff(5, "Gallo").cashier(true)).unwrap();
    let payment = model
        .add_payment(id(10), Payment::new(id(20), Money::from_units(24), PaymentMethod::Card).unwrap())
        .unwrap();

    model.receive_payment(cashier, payment).unwrap();
    let paid = model.require::<Payment>(payment).unwrap();
    assert_eq!(paid.status, PaymentStatus::Completed);
    assert!(paid.paid_at.is_some());
    assert_eq!(recorder.last().as_deref(), Some("Cashier Gallo is receiving payment."));

    assert!(model.issue_refund(cashier, payment).is_err());
}

#[test]
fn waiter_seats_only_free_tables() {
    let (mut model, recorder) = recording();
    let waiter = model.hire(staff(1, "Neri").waiter(6)).unwrap();
    model
        .open_restaurant(trattoria_model::Restaurant::new(id(50), "Da Nino", "12-23").unwrap())
        .unwrap();
    let table = model.add_table(id(50), id(101), 7).unwrap();

    assert!(model.seat_customer(waiter, table).unwrap());
    assert!(!model.seat_customer(waiter, table).unwrap());
    assert_eq!(recorder.last().as_deref(), Some("Table 7 is occupied."));
}

#[test]
fn head_chef_draws_inventory() {
    let (mut model, recorder) = recording();
    let chef = model.hire(staff(1, "Neri").head_chef("Cacio e pepe")).unwrap();
    let flour = model
        .add_ingredient(trattoria_model::Ingredient::new(id(9), "Flour", "kg", ["gluten"]).unwrap())
        .unwrap();

    model.manage_inventory(chef, flour).unwrap();
    model.manage_inventory(chef, flour).unwrap();

    assert_eq!(model.require::<trattoria_model::Ingredient>(flour).unwrap().times_used, 2);
    assert_eq!(recorder.messages().len(), 2);
}
