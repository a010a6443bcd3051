// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_domain::{
    Bicycle, BicycleId, BicycleStatus, DomainError, Location, Rental, RentalId, RentalStatus,
    RiderId, Tier,
};
use time::Duration;

use super::helpers::{
    create_test_actor, create_test_cause, create_test_fleet, create_test_rider_actor,
    domain_error, test_now,
};
use crate::request::{CancelRental, ReturnRental, StartRental, UpdateRiderTier};
use crate::{CoreError, FleetStore, RentalReceipt, StoreError};

fn start(
    fleet: &super::helpers::TestFleet,
    rider: RiderId,
    bicycle: BicycleId,
) -> Result<Rental, CoreError> {
    fleet.fleet.rentals().start(
        StartRental {
            rider,
            bicycle,
            start_location: None,
        },
        create_test_rider_actor(rider),
        create_test_cause(),
    )
}

fn return_rental(
    fleet: &super::helpers::TestFleet,
    rental: RentalId,
) -> Result<RentalReceipt, CoreError> {
    fleet.fleet.rentals().return_rental(
        ReturnRental {
            rental,
            end_location: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
}

fn cancel(fleet: &super::helpers::TestFleet, rental: RentalId) -> Result<Rental, CoreError> {
    fleet.fleet.rentals().cancel(
        CancelRental { rental },
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_start_rental_marks_bicycle_rented() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", Some(3));
    let bicycle = t.bicycle("BK-0001", 5000);

    let rental = start(&t, rider.id, bicycle.id).unwrap();

    assert_eq!(rental.status(), RentalStatus::Active);
    assert_eq!(rental.start_time, test_now());
    assert_eq!(rental.base_rate, 5000);
    assert_eq!(rental.discount_percentage, 5);
    assert_eq!(rental.end_time, None);
    assert_eq!(rental.total_amount, None);
    assert_eq!(
        t.fleet.bicycle(bicycle.id).unwrap().status(),
        BicycleStatus::Rented
    );
    assert_eq!(
        t.fleet.active_rental_for_rider(rider.id).unwrap(),
        Some(rental)
    );
}

#[test]
fn test_start_rental_rejects_rider_with_active_rental() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let first = t.bicycle("BK-0001", 5000);
    let second = t.bicycle("BK-0002", 5000);
    let active = start(&t, rider.id, first.id).unwrap();

    let err = domain_error(start(&t, rider.id, second.id).unwrap_err());

    assert_eq!(
        err,
        DomainError::RiderAlreadyRenting {
            rider: rider.id,
            active_rental: active.id,
        }
    );
    assert_eq!(
        t.fleet.bicycle(second.id).unwrap().status(),
        BicycleStatus::Available
    );
}

#[test]
fn test_start_rental_unknown_bicycle() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);

    let err = domain_error(start(&t, rider.id, BicycleId::new(999)).unwrap_err());

    assert_eq!(err, DomainError::BicycleNotFound(BicycleId::new(999)));
}

#[test]
fn test_start_rental_unknown_rider() {
    let t = create_test_fleet();
    let bicycle = t.bicycle("BK-0001", 5000);

    let err = domain_error(start(&t, RiderId::new(999), bicycle.id).unwrap_err());

    assert_eq!(err, DomainError::RiderNotFound(RiderId::new(999)));
}

#[test]
fn test_start_rental_on_rented_bicycle_is_not_available() {
    let t = create_test_fleet();
    let first = t.rider("Ada", None);
    let second = t.rider("Grace", None);
    let bicycle = t.bicycle("BK-0001", 5000);
    start(&t, first.id, bicycle.id).unwrap();

    let err = domain_error(start(&t, second.id, bicycle.id).unwrap_err());

    assert_eq!(
        err,
        DomainError::BicycleNotAvailable {
            bicycle: bicycle.id,
            status: String::from("rented"),
        }
    );
    assert_eq!(t.fleet.active_rental_for_rider(second.id).unwrap(), None);
}

#[test]
fn test_return_after_ninety_minutes_without_tier() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 5000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::minutes(90));

    let receipt = return_rental(&t, rental.id).unwrap();

    assert_eq!(receipt.quote.billed_hours, 2);
    assert_eq!(receipt.quote.subtotal, 10_000);
    assert_eq!(receipt.quote.discount_amount, 0);
    assert_eq!(receipt.quote.total_amount, 10_000);
    assert_eq!(receipt.rental.status(), RentalStatus::Completed);
    assert_eq!(receipt.rental.end_time, Some(test_now() + Duration::minutes(90)));
    assert_eq!(receipt.rental.discount_amount, Some(0));
    assert_eq!(receipt.rental.total_amount, Some(10_000));
    assert_eq!(receipt.payment.amount, 10_000);
    assert_eq!(receipt.payment.rental, rental.id);
    assert_eq!(receipt.payment.rider, rider.id);
    assert_eq!(
        t.fleet.bicycle(bicycle.id).unwrap().status(),
        BicycleStatus::Available
    );
    assert_eq!(t.fleet.active_rental_for_rider(rider.id).unwrap(), None);
}

#[test]
fn test_return_one_hour_tier_one() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", Some(1));
    let bicycle = t.bicycle("BK-0001", 8000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::hours(1));

    let receipt = return_rental(&t, rental.id).unwrap();

    assert_eq!(receipt.quote.billed_hours, 1);
    assert_eq!(receipt.quote.subtotal, 8000);
    assert_eq!(receipt.quote.discount_amount, 800);
    assert_eq!(receipt.quote.total_amount, 7200);
    assert_eq!(receipt.payment.amount, 7200);
}

#[test]
fn test_return_uses_tier_current_at_return() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    assert_eq!(rental.discount_percentage, 0);

    t.fleet
        .inventory()
        .update_rider_tier(
            UpdateRiderTier {
                rider: rider.id,
                tier: Some(Tier::new(2).unwrap()),
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
    t.advance(Duration::minutes(30));

    let receipt = return_rental(&t, rental.id).unwrap();

    assert_eq!(receipt.quote.discount_percentage, 10);
    assert_eq!(receipt.rental.discount_percentage, 10);
    assert_eq!(receipt.quote.total_amount, 900);
}

#[test]
fn test_return_moves_bicycle_to_end_location() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::minutes(10));
    let dock = Location::new(51.5, -0.12).unwrap();

    let receipt = t
        .fleet
        .rentals()
        .return_rental(
            ReturnRental {
                rental: rental.id,
                end_location: Some(dock),
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(receipt.rental.end_location, Some(dock));
    assert_eq!(t.fleet.bicycle(bicycle.id).unwrap().location, Some(dock));
}

#[test]
fn test_return_with_no_elapsed_time_is_rejected() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();

    let err = domain_error(return_rental(&t, rental.id).unwrap_err());

    assert!(matches!(err, DomainError::InvalidRentalWindow { .. }));
    assert!(t.fleet.rental(rental.id).unwrap().is_active());
}

#[test]
fn test_return_twice_is_not_active() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::hours(2));
    return_rental(&t, rental.id).unwrap();

    let err = domain_error(return_rental(&t, rental.id).unwrap_err());

    assert_eq!(
        err,
        DomainError::RentalNotActive {
            rental: rental.id,
            status: String::from("completed"),
        }
    );
}

#[test]
fn test_return_unknown_rental() {
    let t = create_test_fleet();

    let err = domain_error(return_rental(&t, RentalId::new(42)).unwrap_err());

    assert_eq!(err, DomainError::RentalNotFound(RentalId::new(42)));
}

#[test]
fn test_cancel_frees_bicycle_without_payment() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::minutes(5));

    let cancelled = cancel(&t, rental.id).unwrap();

    assert_eq!(cancelled.status(), RentalStatus::Cancelled);
    assert_eq!(cancelled.end_time, Some(test_now() + Duration::minutes(5)));
    assert_eq!(cancelled.total_amount, None);
    assert_eq!(
        t.fleet.bicycle(bicycle.id).unwrap().status(),
        BicycleStatus::Available
    );
    let payment = t
        .fleet
        .store()
        .transact("test_payment", |uow| Ok(uow.payment_for_rental(rental.id)?))
        .unwrap();
    assert_eq!(payment, None);
}

#[test]
fn test_cancel_terminal_rental_changes_nothing() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let completed = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::hours(1));
    return_rental(&t, completed.id).unwrap();
    let cancelled = start(&t, rider.id, bicycle.id).unwrap();
    cancel(&t, cancelled.id).unwrap();

    let audit_before = t.audit_count();
    let completed_before = t.fleet.rental(completed.id).unwrap();
    let cancelled_before = t.fleet.rental(cancelled.id).unwrap();

    for rental in [completed.id, cancelled.id] {
        let err = domain_error(cancel(&t, rental).unwrap_err());
        assert!(matches!(err, DomainError::RentalNotActive { .. }));
    }

    assert_eq!(t.fleet.rental(completed.id).unwrap(), completed_before);
    assert_eq!(t.fleet.rental(cancelled.id).unwrap(), cancelled_before);
    assert_eq!(t.audit_count(), audit_before);
}

#[test]
fn test_rentals_for_rider_lists_newest_first() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let first = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::hours(1));
    return_rental(&t, first.id).unwrap();
    let second = start(&t, rider.id, bicycle.id).unwrap();

    let history: Vec<Rental> = t.fleet.rentals_for_rider(rider.id).unwrap();

    let ids: Vec<RentalId> = history.iter().map(|rental| rental.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn test_failed_commit_leaves_no_partial_state() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let audit_before = t.audit_count();

    t.fleet.store().fail_next_commit();
    let err = start(&t, rider.id, bicycle.id).unwrap_err();

    assert!(matches!(err, CoreError::Storage(StoreError::Backend(_))));
    let bicycle: Bicycle = t.fleet.bicycle(bicycle.id).unwrap();
    assert_eq!(bicycle.status(), BicycleStatus::Available);
    assert_eq!(t.fleet.active_rental_for_rider(rider.id).unwrap(), None);
    assert_eq!(t.audit_count(), audit_before);

    start(&t, rider.id, bicycle.id).unwrap();
}

#[test]
fn test_each_operation_writes_one_audit_event() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    let audit_before = t.audit_count();

    let rental = start(&t, rider.id, bicycle.id).unwrap();
    t.advance(Duration::hours(1));
    return_rental(&t, rental.id).unwrap();

    let trail = t.fleet.audit_trail(2).unwrap();
    assert_eq!(t.audit_count(), audit_before + 2);
    assert_eq!(trail[0].event.action.name, "ReturnRental");
    assert_eq!(trail[1].event.action.name, "StartRental");
    assert_eq!(trail[1].event.actor.id, rider.id.to_string());
}
