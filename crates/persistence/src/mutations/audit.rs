// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_audit::AuditEvent;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::NewAuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event and returns its id.
///
/// Actor, cause, action and both snapshots are stored as JSON documents.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    recorded_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let event_id: i64 = diesel::insert_into(audit_events::table)
        .values(&NewAuditEventRow::from_event(event, recorded_at)?)
        .returning(audit_events::audit_event_id)
        .get_result(conn)?;

    debug!(event_id, action = %event.action.name, "Persisted audit event");
    Ok(event_id)
}
