// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_audit::ActorKind;
use fleet_domain::{BicycleCode, BicycleStatus, DomainError, MaintenanceKind, RiderId, Tier};

use super::helpers::{create_test_actor, create_test_cause, create_test_fleet, domain_error};
use crate::request::{
    RegisterBicycle, RegisterRider, ScheduleMaintenance, StartRental, UpdateRiderTier,
};

fn register_bicycle_request(code: &str, hourly_rate: u64) -> RegisterBicycle {
    RegisterBicycle {
        code: BicycleCode::new(code).unwrap(),
        hourly_rate,
        location: None,
        site: Some(String::from("  North  ")),
    }
}

#[test]
fn test_register_bicycle_starts_available() {
    let t = create_test_fleet();

    let bicycle = t
        .fleet
        .inventory()
        .register_bicycle(
            register_bicycle_request("BK-0100", 1500),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(bicycle.status(), BicycleStatus::Available);
    assert_eq!(bicycle.hourly_rate, 1500);
    assert_eq!(bicycle.site.as_deref(), Some("North"));
    let trail = t.fleet.audit_trail(1).unwrap();
    assert_eq!(trail[0].event.action.name, "RegisterBicycle");
    assert_eq!(trail[0].event.actor.kind, ActorKind::Operator);
}

#[test]
fn test_register_bicycle_duplicate_code() {
    let t = create_test_fleet();
    t.bicycle("BK-0100", 1500);

    let err = domain_error(
        t.fleet
            .inventory()
            .register_bicycle(
                register_bicycle_request("BK-0100", 900),
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap_err(),
    );

    assert_eq!(err, DomainError::DuplicateBicycleCode(String::from("BK-0100")));
}

#[test]
fn test_register_bicycle_zero_rate() {
    let t = create_test_fleet();
    let audit_before = t.audit_count();

    let err = domain_error(
        t.fleet
            .inventory()
            .register_bicycle(
                register_bicycle_request("BK-0100", 0),
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap_err(),
    );

    assert_eq!(err, DomainError::InvalidHourlyRate(0));
    assert_eq!(t.audit_count(), audit_before);
}

#[test]
fn test_register_rider_rejects_blank_name() {
    let t = create_test_fleet();

    let err = domain_error(
        t.fleet
            .inventory()
            .register_rider(
                RegisterRider {
                    name: String::from("   "),
                    tier: None,
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap_err(),
    );

    assert!(matches!(err, DomainError::InvalidRiderName(_)));
}

#[test]
fn test_update_rider_tier() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", Some(5));

    let updated = t
        .fleet
        .inventory()
        .update_rider_tier(
            UpdateRiderTier {
                rider: rider.id,
                tier: None,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(updated.tier, None);
    assert_eq!(t.fleet.rider(rider.id).unwrap().tier, None);

    let err = domain_error(
        t.fleet
            .inventory()
            .update_rider_tier(
                UpdateRiderTier {
                    rider: RiderId::new(999),
                    tier: Some(Tier::new(1).unwrap()),
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap_err(),
    );
    assert_eq!(err, DomainError::RiderNotFound(RiderId::new(999)));
}

#[test]
fn test_retire_rented_bicycle_is_in_use() {
    let t = create_test_fleet();
    let rider = t.rider("Ada", None);
    let bicycle = t.bicycle("BK-0001", 1000);
    t.fleet
        .rentals()
        .start(
            StartRental {
                rider: rider.id,
                bicycle: bicycle.id,
                start_location: None,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    let err = domain_error(
        t.fleet
            .inventory()
            .retire_bicycle(bicycle.id, create_test_actor(), create_test_cause())
            .unwrap_err(),
    );

    assert_eq!(err, DomainError::BicycleInUse(bicycle.id));
}

#[test]
fn test_retire_bicycle_twice() {
    let t = create_test_fleet();
    let bicycle = t.bicycle("BK-0001", 1000);

    let retired = t
        .fleet
        .inventory()
        .retire_bicycle(bicycle.id, create_test_actor(), create_test_cause())
        .unwrap();
    assert_eq!(retired.status(), BicycleStatus::Retired);

    let err = domain_error(
        t.fleet
            .inventory()
            .retire_bicycle(bicycle.id, create_test_actor(), create_test_cause())
            .unwrap_err(),
    );
    assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));
}

#[test]
fn test_delete_bicycle_with_history_is_referenced() {
    let t = create_test_fleet();
    let bicycle = t.bicycle("BK-0001", 1000);
    t.fleet
        .maintenance()
        .schedule(
            ScheduleMaintenance {
                bicycle: bicycle.id,
                kind: MaintenanceKind::Inspection,
                description: None,
                cost: 0,
                performed_by: String::from("Workshop A"),
                next_due_date: None,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

    let err = domain_error(
        t.fleet
            .inventory()
            .delete_bicycle(bicycle.id, create_test_actor(), create_test_cause())
            .unwrap_err(),
    );

    assert_eq!(err, DomainError::BicycleReferenced(bicycle.id));
}

#[test]
fn test_delete_unused_bicycle() {
    let t = create_test_fleet();
    let bicycle = t.bicycle("BK-0001", 1000);

    t.fleet
        .inventory()
        .delete_bicycle(bicycle.id, create_test_actor(), create_test_cause())
        .unwrap();

    let err = domain_error(t.fleet.bicycle(bicycle.id).unwrap_err());
    assert_eq!(err, DomainError::BicycleNotFound(bicycle.id));
}
