// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance record queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_domain::{BicycleId, MaintenanceId, MaintenanceRecord};
use time::Date;
use tracing::debug;

use crate::data_models::{MaintenanceRow, format_date};
use crate::diesel_schema::maintenance_records;
use crate::error::PersistenceError;

/// Retrieves a maintenance record by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_maintenance_record(
    conn: &mut SqliteConnection,
    id: MaintenanceId,
) -> Result<Option<MaintenanceRecord>, PersistenceError> {
    let row: Option<MaintenanceRow> = maintenance_records::table
        .find(id.value())
        .select(MaintenanceRow::as_select())
        .first(conn)
        .optional()?;

    row.map(MaintenanceRow::into_domain).transpose()
}

/// Lists the records of a bicycle that have not been completed.
///
/// # Errors
///
/// Returns an error if the query fails or any stored row is corrupt.
pub fn list_open_maintenance_for_bicycle(
    conn: &mut SqliteConnection,
    bicycle: BicycleId,
) -> Result<Vec<MaintenanceRecord>, PersistenceError> {
    let rows: Vec<MaintenanceRow> = maintenance_records::table
        .filter(maintenance_records::bicycle_id.eq(bicycle.value()))
        .filter(maintenance_records::completed_at.is_null())
        .order(maintenance_records::maintenance_id.asc())
        .select(MaintenanceRow::as_select())
        .load(conn)?;

    rows.into_iter().map(MaintenanceRow::into_domain).collect()
}

/// Lists records whose next due date is on or before `as_of`, soonest first.
///
/// Dates are stored as `YYYY-MM-DD`, so text comparison orders them.
///
/// # Errors
///
/// Returns an error if the query fails or any stored row is corrupt.
pub fn list_maintenance_due(
    conn: &mut SqliteConnection,
    as_of: Date,
) -> Result<Vec<MaintenanceRecord>, PersistenceError> {
    let cutoff: String = format_date(as_of)?;

    let rows: Vec<MaintenanceRow> = maintenance_records::table
        .filter(maintenance_records::next_due_date.is_not_null())
        .filter(maintenance_records::next_due_date.le(&cutoff))
        .order((
            maintenance_records::next_due_date.asc(),
            maintenance_records::maintenance_id.asc(),
        ))
        .select(MaintenanceRow::as_select())
        .load(conn)?;

    debug!(as_of = %cutoff, count = rows.len(), "Loaded due maintenance");

    rows.into_iter().map(MaintenanceRow::into_domain).collect()
}
