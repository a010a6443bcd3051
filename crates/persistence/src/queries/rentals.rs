// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental and payment queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_domain::{BicycleId, Payment, Rental, RentalId, RentalStatus, RiderId};
use tracing::debug;

use crate::data_models::{PaymentRow, RentalRow};
use crate::diesel_schema::{payments, rentals};
use crate::error::PersistenceError;

/// Retrieves a rental by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_rental(
    conn: &mut SqliteConnection,
    id: RentalId,
) -> Result<Option<Rental>, PersistenceError> {
    debug!(rental_id = id.value(), "Looking up rental");

    let row: Option<RentalRow> = rentals::table
        .find(id.value())
        .select(RentalRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RentalRow::into_domain).transpose()
}

/// Retrieves the active rental held by a rider, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_active_rental_for_rider(
    conn: &mut SqliteConnection,
    rider: RiderId,
) -> Result<Option<Rental>, PersistenceError> {
    let row: Option<RentalRow> = rentals::table
        .filter(rentals::rider_id.eq(rider.value()))
        .filter(rentals::status.eq(RentalStatus::Active.as_str()))
        .select(RentalRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RentalRow::into_domain).transpose()
}

/// Retrieves the active rental on a bicycle, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_active_rental_for_bicycle(
    conn: &mut SqliteConnection,
    bicycle: BicycleId,
) -> Result<Option<Rental>, PersistenceError> {
    let row: Option<RentalRow> = rentals::table
        .filter(rentals::bicycle_id.eq(bicycle.value()))
        .filter(rentals::status.eq(RentalStatus::Active.as_str()))
        .select(RentalRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RentalRow::into_domain).transpose()
}

/// Lists every rental of a rider, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or any stored row is corrupt.
pub fn list_rentals_for_rider(
    conn: &mut SqliteConnection,
    rider: RiderId,
) -> Result<Vec<Rental>, PersistenceError> {
    let rows: Vec<RentalRow> = rentals::table
        .filter(rentals::rider_id.eq(rider.value()))
        .order(rentals::rental_id.desc())
        .select(RentalRow::as_select())
        .load(conn)?;

    debug!(rider_id = rider.value(), count = rows.len(), "Loaded rider rentals");

    rows.into_iter().map(RentalRow::into_domain).collect()
}

/// Retrieves the payment recorded for a rental, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn get_payment_for_rental(
    conn: &mut SqliteConnection,
    rental: RentalId,
) -> Result<Option<Payment>, PersistenceError> {
    let row: Option<PaymentRow> = payments::table
        .filter(payments::rental_id.eq(rental.value()))
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(PaymentRow::into_domain).transpose()
}
