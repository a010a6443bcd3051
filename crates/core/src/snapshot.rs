// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Short `key=value` snapshots of the entities an operation touches.

use fleet_audit::StateSnapshot;
use fleet_domain::{Bicycle, Event, EventParticipant, MaintenanceRecord, Rental, Rider};

pub fn rider(rider: &Rider) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        ("rider", rider.id.to_string()),
        ("tier", optional(rider.tier)),
    ])
}

pub fn bicycle(bicycle: &Bicycle) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        ("bicycle", bicycle.id.to_string()),
        ("code", bicycle.code.to_string()),
        ("status", bicycle.status().to_string()),
    ])
}

pub fn rental_with_bicycle(rental: &Rental, bicycle: &Bicycle) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        ("rental", rental.id.to_string()),
        ("rental_status", rental.status().to_string()),
        ("bicycle", bicycle.id.to_string()),
        ("bicycle_status", bicycle.status().to_string()),
        ("total_amount", optional(rental.total_amount)),
    ])
}

pub fn event(event: &Event) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        ("event", event.id.to_string()),
        ("status", event.status().to_string()),
        ("participants", event.current_participants().to_string()),
        ("capacity", optional(event.capacity)),
    ])
}

pub fn registration(event: &Event, participant: Option<&EventParticipant>) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        ("event", event.id.to_string()),
        ("participants", event.current_participants().to_string()),
        (
            "attendance",
            participant.map_or_else(
                || String::from("none"),
                |participant| participant.status().to_string(),
            ),
        ),
    ])
}

pub fn maintenance(record: Option<&MaintenanceRecord>, bicycle: &Bicycle) -> StateSnapshot {
    StateSnapshot::from_pairs(&[
        (
            "record",
            record.map_or_else(|| String::from("none"), |record| record.id.to_string()),
        ),
        (
            "open",
            record.map_or_else(|| String::from("none"), |record| record.is_open().to_string()),
        ),
        ("bicycle", bicycle.id.to_string()),
        ("bicycle_status", bicycle.status().to_string()),
    ])
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("none"), |value| value.to_string())
}
