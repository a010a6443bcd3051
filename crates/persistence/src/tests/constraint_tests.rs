// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The schema rejects what the coordinators should never attempt.
//!
//! These tests bypass the coordinators and drive the unit of work
//! directly, so the constraint (not a coordinator check) is what fires.

use fleet::{
    CoreError, FleetStore, NewBicycle, NewEvent, NewParticipant, NewRental, NewRider, StoreError,
};
use fleet_domain::{Bicycle, BicycleCode, Event, Rider, RiderId};
use time::Duration;

use super::helpers::test_now;
use crate::Persistence;

fn seed(persistence: &Persistence, capacity: Option<u32>) -> (Rider, Bicycle, Event) {
    persistence
        .transact("seed", |uow| {
            let rider: Rider = uow.insert_rider(&NewRider {
                name: String::from("Ada"),
                tier: None,
            })?;
            let bicycle: Bicycle = uow.insert_bicycle(&NewBicycle {
                code: BicycleCode::new("BK-0001").unwrap(),
                hourly_rate: 1000,
                location: None,
                site: None,
                created_at: test_now(),
            })?;
            let event: Event = uow.insert_event(&NewEvent {
                title: String::from("Night ride"),
                event_date: test_now() + Duration::days(2),
                capacity,
                created_at: test_now(),
            })?;
            Ok((rider, bicycle, event))
        })
        .unwrap()
}

fn new_rental(rider: &Rider, bicycle: &Bicycle) -> NewRental {
    NewRental {
        rider: rider.id,
        bicycle: bicycle.id,
        start_time: test_now(),
        start_location: None,
        base_rate: bicycle.hourly_rate,
        discount_percentage: 0,
    }
}

fn expect_conflict(err: CoreError) {
    assert!(
        matches!(err, CoreError::Storage(StoreError::Conflict(_))),
        "expected a conflict, got {err:?}"
    );
}

#[test]
fn test_second_active_rental_for_bicycle_conflicts() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (rider, bicycle, _) = seed(&persistence, None);
    let other: Rider = persistence
        .transact("other_rider", |uow| {
            Ok(uow.insert_rider(&NewRider {
                name: String::from("Grace"),
                tier: None,
            })?)
        })
        .unwrap();

    persistence
        .transact("first", |uow| Ok(uow.insert_rental(&new_rental(&rider, &bicycle))?))
        .unwrap();
    let err = persistence
        .transact("second", |uow| Ok(uow.insert_rental(&new_rental(&other, &bicycle))?))
        .unwrap_err();

    expect_conflict(err);
}

#[test]
fn test_duplicate_bicycle_code_conflicts() {
    let persistence = Persistence::new_in_memory().unwrap();
    seed(&persistence, None);

    let err = persistence
        .transact("duplicate", |uow| {
            Ok(uow.insert_bicycle(&NewBicycle {
                code: BicycleCode::new("BK-0001").unwrap(),
                hourly_rate: 500,
                location: None,
                site: None,
                created_at: test_now(),
            })?)
        })
        .unwrap_err();

    expect_conflict(err);
}

#[test]
fn test_guarded_increment_stops_at_capacity() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (_, _, event) = seed(&persistence, Some(2));

    let taken: Vec<bool> = persistence
        .transact("increment", |uow| {
            (0..3)
                .map(|_| uow.increment_participants(event.id).map_err(CoreError::from))
                .collect()
        })
        .unwrap();

    assert_eq!(taken, vec![true, true, false]);
    let stored: Event = persistence
        .transact("read", |uow| Ok(uow.event(event.id)?.unwrap()))
        .unwrap();
    assert_eq!(stored.current_participants(), 2);
}

#[test]
fn test_guarded_decrement_stops_at_zero() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (_, _, event) = seed(&persistence, None);

    let released: (bool, bool, bool) = persistence
        .transact("decrement", |uow| {
            let first: bool = uow.decrement_participants(event.id)?;
            let taken: bool = uow.increment_participants(event.id)?;
            let second: bool = uow.decrement_participants(event.id)?;
            assert!(taken);
            Ok((first, second, uow.decrement_participants(event.id)?))
        })
        .unwrap();

    assert_eq!(released, (false, true, false));
}

#[test]
fn test_double_registration_conflicts() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (rider, _, event) = seed(&persistence, None);
    let participant = NewParticipant {
        event: event.id,
        rider: rider.id,
        registered_at: test_now(),
    };

    persistence
        .transact("first", |uow| Ok(uow.insert_participant(&participant)?))
        .unwrap();
    let err = persistence
        .transact("second", |uow| Ok(uow.insert_participant(&participant)?))
        .unwrap_err();

    expect_conflict(err);
}

#[test]
fn test_deleting_event_cascades_to_participants() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (rider, _, event) = seed(&persistence, None);

    let remaining = persistence
        .transact("cascade", |uow| {
            uow.insert_participant(&NewParticipant {
                event: event.id,
                rider: rider.id,
                registered_at: test_now(),
            })?;
            uow.delete_event(event.id)?;
            Ok(uow.participants(event.id)?)
        })
        .unwrap();

    assert!(remaining.is_empty());
}

#[test]
fn test_failed_body_rolls_back_earlier_writes() {
    let persistence = Persistence::new_in_memory().unwrap();
    let (rider, bicycle, _) = seed(&persistence, None);

    let err = persistence
        .transact("rolled_back", |uow| -> Result<(), CoreError> {
            uow.insert_rental(&new_rental(&rider, &bicycle))?;
            uow.insert_rental(&new_rental(&rider, &bicycle))?;
            Ok(())
        })
        .unwrap_err();
    expect_conflict(err);

    let active = persistence
        .transact("read", |uow| Ok(uow.active_rental_for_rider(rider.id)?))
        .unwrap();
    assert_eq!(active, None);
}

#[test]
fn test_saving_missing_rider_is_corrupt() {
    let persistence = Persistence::new_in_memory().unwrap();

    let err = persistence
        .transact("missing", |uow| {
            uow.save_rider(&Rider::new(RiderId::new(42), String::from("Nobody"), None))?;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, CoreError::Storage(StoreError::Corrupt(_))));
}
