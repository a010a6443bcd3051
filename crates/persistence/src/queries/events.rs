// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event and participant queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_domain::{AttendanceStatus, Event, EventId, EventParticipant, RiderId};
use tracing::debug;

use crate::data_models::{EventRow, ParticipantRow};
use crate::diesel_schema::{event_participants, events};
use crate::error::PersistenceError;

/// Retrieves an event by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_event(
    conn: &mut SqliteConnection,
    id: EventId,
) -> Result<Option<Event>, PersistenceError> {
    debug!(event_id = id.value(), "Looking up event");

    let row: Option<EventRow> = events::table
        .find(id.value())
        .select(EventRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EventRow::into_domain).transpose()
}

/// Retrieves the non-cancelled registration of a rider for an event.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_active_participant(
    conn: &mut SqliteConnection,
    event: EventId,
    rider: RiderId,
) -> Result<Option<EventParticipant>, PersistenceError> {
    let row: Option<ParticipantRow> = event_participants::table
        .filter(event_participants::event_id.eq(event.value()))
        .filter(event_participants::rider_id.eq(rider.value()))
        .filter(event_participants::attendance_status.ne(AttendanceStatus::Cancelled.as_str()))
        .select(ParticipantRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ParticipantRow::into_domain).transpose()
}

/// Lists every registration for an event, cancelled ones included, in
/// registration order.
///
/// # Errors
///
/// Returns an error if the query fails or any stored row is corrupt.
pub fn list_participants(
    conn: &mut SqliteConnection,
    event: EventId,
) -> Result<Vec<EventParticipant>, PersistenceError> {
    let rows: Vec<ParticipantRow> = event_participants::table
        .filter(event_participants::event_id.eq(event.value()))
        .order(event_participants::participant_id.asc())
        .select(ParticipantRow::as_select())
        .load(conn)?;

    debug!(event_id = event.value(), count = rows.len(), "Loaded participants");

    rows.into_iter().map(ParticipantRow::into_domain).collect()
}
