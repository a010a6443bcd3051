// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rider and bicycle mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet::{NewBicycle, NewRider};
use fleet_domain::{Bicycle, BicycleId, BicycleStatus, Rider, Tier};
use tracing::{debug, info};

use crate::data_models::{
    BicycleRow, NewBicycleRow, NewRiderRow, RiderRow, format_timestamp, location_to_columns,
    money_to_column,
};
use crate::diesel_schema::{bicycles, riders};
use crate::error::PersistenceError;
use crate::mutations::expect_one_row;

fn tier_column(tier: Option<Tier>) -> Option<i32> {
    tier.map(|tier| i32::from(tier.value()))
}

/// Inserts a rider and returns it with its assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_rider(
    conn: &mut SqliteConnection,
    rider: &NewRider,
) -> Result<Rider, PersistenceError> {
    let row: RiderRow = diesel::insert_into(riders::table)
        .values(&NewRiderRow {
            name: &rider.name,
            tier: tier_column(rider.tier),
        })
        .returning(RiderRow::as_returning())
        .get_result(conn)?;

    info!(rider_id = row.rider_id, "Rider created");
    row.into_domain()
}

/// Writes a rider's mutable fields back.
///
/// # Errors
///
/// Returns an error if the update fails or the rider does not exist.
pub fn update_rider(conn: &mut SqliteConnection, rider: &Rider) -> Result<(), PersistenceError> {
    debug!(rider_id = rider.id.value(), "Updating rider");

    let affected: usize = diesel::update(riders::table.find(rider.id.value()))
        .set((
            riders::name.eq(&rider.name),
            riders::tier.eq(tier_column(rider.tier)),
        ))
        .execute(conn)?;

    expect_one_row(affected, "riders", rider.id.value())
}

/// Inserts an available bicycle and returns it with its assigned id.
///
/// # Errors
///
/// Returns [`PersistenceError::ConstraintViolation`] if the code is taken,
/// or another error if the insert fails.
pub fn insert_bicycle(
    conn: &mut SqliteConnection,
    bicycle: &NewBicycle,
) -> Result<Bicycle, PersistenceError> {
    let (latitude, longitude) = location_to_columns(bicycle.location);

    let row: BicycleRow = diesel::insert_into(bicycles::table)
        .values(&NewBicycleRow {
            code: bicycle.code.as_str(),
            hourly_rate: money_to_column(bicycle.hourly_rate)?,
            status: BicycleStatus::Available.as_str(),
            latitude,
            longitude,
            site: bicycle.site.as_deref(),
            created_at: format_timestamp(bicycle.created_at)?,
        })
        .returning(BicycleRow::as_returning())
        .get_result(conn)?;

    info!(bicycle_id = row.bicycle_id, code = %row.code, "Bicycle registered");
    row.into_domain()
}

/// Writes a bicycle's status, location and site back.
///
/// # Errors
///
/// Returns an error if the update fails or the bicycle does not exist.
pub fn update_bicycle(
    conn: &mut SqliteConnection,
    bicycle: &Bicycle,
) -> Result<(), PersistenceError> {
    debug!(
        bicycle_id = bicycle.id.value(),
        status = bicycle.status().as_str(),
        "Updating bicycle"
    );

    let (latitude, longitude) = location_to_columns(bicycle.location);
    let affected: usize = diesel::update(bicycles::table.find(bicycle.id.value()))
        .set((
            bicycles::hourly_rate.eq(money_to_column(bicycle.hourly_rate)?),
            bicycles::status.eq(bicycle.status().as_str()),
            bicycles::latitude.eq(latitude),
            bicycles::longitude.eq(longitude),
            bicycles::site.eq(bicycle.site.as_deref()),
        ))
        .execute(conn)?;

    expect_one_row(affected, "bicycles", bicycle.id.value())
}

/// Deletes a bicycle.
///
/// # Errors
///
/// Returns [`PersistenceError::ConstraintViolation`] if history still
/// references it, or [`PersistenceError::MissingRow`] if it does not exist.
pub fn delete_bicycle(conn: &mut SqliteConnection, id: BicycleId) -> Result<(), PersistenceError> {
    info!(bicycle_id = id.value(), "Deleting bicycle");

    let affected: usize = diesel::delete(bicycles::table.find(id.value())).execute(conn)?;
    expect_one_row(affected, "bicycles", id.value())
}
