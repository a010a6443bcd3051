// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet::AuditRecord;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Retrieves up to `limit` audit events, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored event cannot be
/// deserialized.
pub fn get_audit_trail(
    conn: &mut SqliteConnection,
    limit: usize,
) -> Result<Vec<AuditRecord>, PersistenceError> {
    let limit: i64 = limit.to_i64().unwrap_or(i64::MAX);

    let rows: Vec<AuditEventRow> = audit_events::table
        .order(audit_events::audit_event_id.desc())
        .limit(limit)
        .select(AuditEventRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded audit trail");

    rows.into_iter()
        .map(|row| {
            let (id, recorded_at, event) = row.into_domain()?;
            Ok(AuditRecord {
                id,
                recorded_at,
                event,
            })
        })
        .collect()
}
