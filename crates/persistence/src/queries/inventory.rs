// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rider and bicycle queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_domain::{Bicycle, BicycleCode, BicycleId, Rider, RiderId};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::{BicycleRow, RiderRow};
use crate::diesel_schema::{bicycles, maintenance_records, rentals, riders};
use crate::error::PersistenceError;

/// Retrieves a rider by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
/// Returns `Ok(None)` if the rider does not exist.
pub fn get_rider(
    conn: &mut SqliteConnection,
    id: RiderId,
) -> Result<Option<Rider>, PersistenceError> {
    debug!(rider_id = id.value(), "Looking up rider");

    let row: Option<RiderRow> = riders::table
        .find(id.value())
        .select(RiderRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RiderRow::into_domain).transpose()
}

/// Retrieves a bicycle by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_bicycle(
    conn: &mut SqliteConnection,
    id: BicycleId,
) -> Result<Option<Bicycle>, PersistenceError> {
    debug!(bicycle_id = id.value(), "Looking up bicycle");

    let row: Option<BicycleRow> = bicycles::table
        .find(id.value())
        .select(BicycleRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BicycleRow::into_domain).transpose()
}

/// Retrieves a bicycle by its unique code.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_bicycle_by_code(
    conn: &mut SqliteConnection,
    code: &BicycleCode,
) -> Result<Option<Bicycle>, PersistenceError> {
    debug!(code = code.as_str(), "Looking up bicycle by code");

    let row: Option<BicycleRow> = bicycles::table
        .filter(bicycles::code.eq(code.as_str()))
        .select(BicycleRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BicycleRow::into_domain).transpose()
}

/// Counts the rentals and maintenance records that reference a bicycle.
///
/// # Errors
///
/// Returns an error if either count query fails.
pub fn count_bicycle_history(
    conn: &mut SqliteConnection,
    id: BicycleId,
) -> Result<u64, PersistenceError> {
    let rental_count: i64 = rentals::table
        .filter(rentals::bicycle_id.eq(id.value()))
        .count()
        .get_result(conn)?;
    let maintenance_count: i64 = maintenance_records::table
        .filter(maintenance_records::bicycle_id.eq(id.value()))
        .count()
        .get_result(conn)?;

    debug!(
        bicycle_id = id.value(),
        rental_count, maintenance_count, "Counted bicycle history"
    );

    (rental_count + maintenance_count)
        .to_u64()
        .ok_or_else(|| PersistenceError::QueryFailed(String::from("negative history count")))
}
