// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance record mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet::NewMaintenance;
use fleet_domain::MaintenanceRecord;
use tracing::info;

use crate::data_models::{
    MaintenanceRow, NewMaintenanceRow, format_date, format_timestamp, money_to_column,
};
use crate::diesel_schema::maintenance_records;
use crate::error::PersistenceError;
use crate::mutations::expect_one_row;

/// Inserts an open maintenance record.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_maintenance(
    conn: &mut SqliteConnection,
    record: &NewMaintenance,
) -> Result<MaintenanceRecord, PersistenceError> {
    let row: MaintenanceRow = diesel::insert_into(maintenance_records::table)
        .values(&NewMaintenanceRow {
            bicycle_id: record.bicycle.value(),
            kind: record.kind.as_str(),
            description: record.description.as_deref(),
            cost: money_to_column(record.cost)?,
            performed_by: &record.performed_by,
            performed_at: format_timestamp(record.performed_at)?,
            next_due_date: record.next_due_date.map(format_date).transpose()?,
        })
        .returning(MaintenanceRow::as_returning())
        .get_result(conn)?;

    info!(
        maintenance_id = row.maintenance_id,
        bicycle_id = row.bicycle_id,
        kind = %row.kind,
        "Maintenance scheduled"
    );
    row.into_domain()
}

/// Writes a record's completion time and next due date back.
///
/// # Errors
///
/// Returns an error if the update fails or the record does not exist.
pub fn update_maintenance(
    conn: &mut SqliteConnection,
    record: &MaintenanceRecord,
) -> Result<(), PersistenceError> {
    let completed_at: Option<String> = record.completed_at.map(format_timestamp).transpose()?;
    let next_due_date: Option<String> = record.next_due_date.map(format_date).transpose()?;

    let affected: usize = diesel::update(maintenance_records::table.find(record.id.value()))
        .set((
            maintenance_records::completed_at.eq(completed_at),
            maintenance_records::next_due_date.eq(next_due_date),
        ))
        .execute(conn)?;

    expect_one_row(affected, "maintenance_records", record.id.value())
}
