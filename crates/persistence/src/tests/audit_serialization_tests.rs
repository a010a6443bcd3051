// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet::request::StartRental;
use fleet::{AuditRecord, FleetStore};
use fleet_audit::{Action, Actor, ActorKind, AuditEvent, Cause, StateSnapshot};
use time::macros::datetime;

use super::helpers::{create_test_cause, create_test_fleet, test_now};
use crate::Persistence;

#[test]
fn test_audit_event_survives_storage() {
    let persistence = Persistence::new_in_memory().unwrap();
    let event = AuditEvent::new(
        Actor::system(),
        Cause::new(String::from("job-7"), String::from("Nightly sweep")),
        Action::new(String::from("RetireBicycle"), None),
        StateSnapshot::from_pairs(&[("status", String::from("available"))]),
        StateSnapshot::absent(),
    );
    let recorded_at = datetime!(2026-03-02 11:30 +02:00);

    let trail: Vec<AuditRecord> = persistence
        .transact("audit", |uow| {
            uow.record_audit(&event, recorded_at)?;
            Ok(uow.audit_trail(10)?)
        })
        .unwrap();

    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].event, event);
    assert_eq!(trail[0].recorded_at, recorded_at);
    assert_eq!(trail[0].recorded_at.offset(), time::UtcOffset::UTC);
}

#[test]
fn test_audit_trail_is_newest_first_and_limited() {
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
            Actor::rider(rider.id),
            create_test_cause(),
        )
        .unwrap();

    let trail = t.fleet.audit_trail(2).unwrap();

    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].event.action.name, "StartRental");
    assert_eq!(trail[0].event.actor.kind, ActorKind::Rider);
    assert_eq!(trail[0].recorded_at, test_now());
    assert_eq!(trail[1].event.action.name, "RegisterBicycle");
    assert!(trail[0].id > trail[1].id);
}
