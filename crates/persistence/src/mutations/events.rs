// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event and participant mutations.
//!
//! The participant counter is only ever moved by the guarded updates in
//! this module. Each is a single statement whose `WHERE` clause carries
//! the capacity (or non-negativity) condition, so the check and the write
//! cannot be separated by another writer.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet::{NewEvent, NewParticipant};
use fleet_domain::{AttendanceStatus, Event, EventId, EventParticipant, EventStatus};
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::data_models::{
    EventRow, NewEventRow, NewParticipantRow, ParticipantRow, format_timestamp,
};
use crate::diesel_schema::{event_participants, events};
use crate::error::PersistenceError;
use crate::mutations::expect_one_row;

/// Inserts a draft event with no participants.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    event: &NewEvent,
) -> Result<Event, PersistenceError> {
    let capacity: Option<i32> = event
        .capacity
        .map(|capacity| {
            capacity.to_i32().ok_or_else(|| {
                PersistenceError::SerializationError(format!("capacity {capacity} is too large"))
            })
        })
        .transpose()?;

    let row: EventRow = diesel::insert_into(events::table)
        .values(&NewEventRow {
            title: &event.title,
            event_date: format_timestamp(event.event_date)?,
            capacity,
            current_participants: 0,
            status: EventStatus::Draft.as_str(),
            created_at: format_timestamp(event.created_at)?,
        })
        .returning(EventRow::as_returning())
        .get_result(conn)?;

    info!(event_id = row.event_id, title = %row.title, "Event created");
    row.into_domain()
}

/// Writes an event's status back, leaving the counter alone.
///
/// # Errors
///
/// Returns an error if the update fails or the event does not exist.
pub fn update_event_status(
    conn: &mut SqliteConnection,
    event: &Event,
) -> Result<(), PersistenceError> {
    debug!(
        event_id = event.id.value(),
        status = event.status().as_str(),
        "Updating event status"
    );

    let affected: usize = diesel::update(events::table.find(event.id.value()))
        .set(events::status.eq(event.status().as_str()))
        .execute(conn)?;

    expect_one_row(affected, "events", event.id.value())
}

/// Deletes an event; its registrations go with it.
///
/// # Errors
///
/// Returns an error if the delete fails or the event does not exist.
pub fn delete_event(conn: &mut SqliteConnection, id: EventId) -> Result<(), PersistenceError> {
    info!(event_id = id.value(), "Deleting event");

    let affected: usize = diesel::delete(events::table.find(id.value())).execute(conn)?;
    expect_one_row(affected, "events", id.value())
}

/// Takes one slot if the event has room.
///
/// Returns `false` when the event is at capacity or does not exist.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `id` - The event taking a registration
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn increment_participants(
    conn: &mut SqliteConnection,
    id: EventId,
) -> Result<bool, PersistenceError> {
    let affected: usize = diesel::update(
        events::table.filter(events::event_id.eq(id.value())).filter(
            events::capacity
                .is_null()
                .or(events::current_participants.lt(events::capacity.assume_not_null())),
        ),
    )
    .set(events::current_participants.eq(events::current_participants + 1))
    .execute(conn)?;

    debug!(event_id = id.value(), taken = affected > 0, "Guarded slot increment");
    Ok(affected > 0)
}

/// Releases one slot if any are taken.
///
/// Returns `false` when the counter is already zero or the event does not
/// exist.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `id` - The event losing a registration
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn decrement_participants(
    conn: &mut SqliteConnection,
    id: EventId,
) -> Result<bool, PersistenceError> {
    let affected: usize = diesel::update(
        events::table
            .filter(events::event_id.eq(id.value()))
            .filter(events::current_participants.gt(0)),
    )
    .set(events::current_participants.eq(events::current_participants - 1))
    .execute(conn)?;

    debug!(event_id = id.value(), released = affected > 0, "Guarded slot decrement");
    Ok(affected > 0)
}

/// Inserts a registration.
///
/// # Errors
///
/// Returns [`PersistenceError::ConstraintViolation`] if the rider already
/// holds a non-cancelled registration for the event.
pub fn insert_participant(
    conn: &mut SqliteConnection,
    participant: &NewParticipant,
) -> Result<EventParticipant, PersistenceError> {
    let row: ParticipantRow = diesel::insert_into(event_participants::table)
        .values(&NewParticipantRow {
            event_id: participant.event.value(),
            rider_id: participant.rider.value(),
            registered_at: format_timestamp(participant.registered_at)?,
            attendance_status: AttendanceStatus::Registered.as_str(),
        })
        .returning(ParticipantRow::as_returning())
        .get_result(conn)?;

    info!(
        participant_id = row.participant_id,
        event_id = row.event_id,
        rider_id = row.rider_id,
        "Participant registered"
    );
    row.into_domain()
}

/// Writes a registration's attendance status back.
///
/// # Errors
///
/// Returns an error if the update fails or the registration does not exist.
pub fn update_participant(
    conn: &mut SqliteConnection,
    participant: &EventParticipant,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(event_participants::table.find(participant.id.value()))
        .set(event_participants::attendance_status.eq(participant.status().as_str()))
        .execute(conn)?;

    expect_one_row(affected, "event_participants", participant.id.value())
}
