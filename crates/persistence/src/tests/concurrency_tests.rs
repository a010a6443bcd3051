// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Several connections to one database file race for the same resource.
//!
//! Each thread owns its own `Persistence`, so nothing in-process
//! serialises them; only the `SQLite` write lock does.

use std::path::Path;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use diesel::{RunQueryDsl, SqliteConnection};
use fleet::request::{RegisterForEvent, StartRental};
use fleet::{CoreError, StoreError};
use fleet_domain::{BicycleStatus, DomainError, EventParticipant, Rental};

use super::helpers::{TestFleet, create_test_actor, create_test_cause, domain_error, fleet_over};
use crate::backend::sqlite::open_connection;
use crate::{Persistence, PersistenceConfig};

fn open_fleets(path: &Path, count: usize) -> Vec<TestFleet> {
    // Opened one after another so only the first runs the migrations.
    (0..count)
        .map(|_| fleet_over(Persistence::new_with_file(path).unwrap()))
        .collect()
}

#[test]
fn test_racing_starts_on_one_bicycle_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let fleets = open_fleets(&dir.path().join("fleet.db"), 2);
    let riders = [fleets[0].rider("Ada", None), fleets[0].rider("Grace", None)];
    let bicycle = fleets[0].bicycle("BK-0001", 1000);
    let barrier = Barrier::new(fleets.len());

    let results: Vec<Result<Rental, CoreError>> = thread::scope(|scope| {
        let handles: Vec<_> = fleets
            .iter()
            .zip(riders.iter())
            .map(|(t, rider)| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    t.fleet.rentals().start(
                        StartRental {
                            rider: rider.id,
                            bicycle: bicycle.id,
                            start_location: None,
                        },
                        create_test_actor(),
                        create_test_cause(),
                    )
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let (won, lost): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    assert_eq!(won.len(), 1);
    assert_eq!(lost.len(), 1);
    let err = domain_error(lost.into_iter().next().unwrap().unwrap_err());
    assert_eq!(
        err,
        DomainError::BicycleNotAvailable {
            bicycle: bicycle.id,
            status: String::from("rented"),
        }
    );
    assert_eq!(
        fleets[1].fleet.bicycle(bicycle.id).unwrap().status(),
        BicycleStatus::Rented
    );
}

#[test]
fn test_racing_registrations_never_overfill() {
    let dir = tempfile::tempdir().unwrap();
    let fleets = open_fleets(&dir.path().join("fleet.db"), 4);
    let riders: Vec<_> = ["Ada", "Grace", "Hedy", "Radia"]
        .iter()
        .map(|name| fleets[0].rider(name, None))
        .collect();
    let event = fleets[0].event(Some(2), 7);
    let barrier = Barrier::new(fleets.len());

    let results: Vec<Result<EventParticipant, CoreError>> = thread::scope(|scope| {
        let handles: Vec<_> = fleets
            .iter()
            .zip(riders.iter())
            .map(|(t, rider)| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    t.fleet.events().register(
                        RegisterForEvent {
                            event: event.id,
                            rider: rider.id,
                        },
                        create_test_actor(),
                        create_test_cause(),
                    )
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let successes: usize = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 2);
    for result in results.into_iter().filter(Result::is_err) {
        assert_eq!(
            domain_error(result.unwrap_err()),
            DomainError::EventFull {
                event: event.id,
                capacity: 2,
            }
        );
    }
    assert_eq!(fleets[3].fleet.event(event.id).unwrap().current_participants(), 2);
    let live: usize = fleets[3]
        .fleet
        .participants(event.id)
        .unwrap()
        .iter()
        .filter(|participant| participant.status().is_active())
        .count();
    assert_eq!(live, 2);
}

#[test]
fn test_busy_timeout_is_a_storage_failure_and_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");
    let owner = fleet_over(Persistence::new_with_file(&path).unwrap());
    let rider = owner.rider("Ada", None);
    let bicycle = owner.bicycle("BK-0001", 1000);
    let impatient = fleet_over(
        Persistence::open(
            &path,
            PersistenceConfig {
                busy_timeout: Duration::from_millis(50),
                wal: true,
            },
        )
        .unwrap(),
    );

    let mut holder: SqliteConnection =
        open_connection(path.to_str().unwrap(), Duration::from_millis(50)).unwrap();
    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut holder)
        .unwrap();

    let err = impatient
        .fleet
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
        .unwrap_err();
    assert!(matches!(err, CoreError::Storage(StoreError::Backend(_))));

    diesel::sql_query("ROLLBACK").execute(&mut holder).unwrap();
    assert_eq!(
        owner.fleet.bicycle(bicycle.id).unwrap().status(),
        BicycleStatus::Available
    );
    assert_eq!(owner.fleet.active_rental_for_rider(rider.id).unwrap(), None);

    impatient
        .fleet
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
}
