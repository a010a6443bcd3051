// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental and payment mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet::{NewPayment, NewRental};
use fleet_domain::{Payment, PaymentStatus, Rental, RentalStatus};
use tracing::{debug, info};

use crate::data_models::{
    NewPaymentRow, NewRentalRow, PaymentRow, RentalRow, format_timestamp, location_to_columns,
    money_to_column,
};
use crate::diesel_schema::{payments, rentals};
use crate::error::PersistenceError;
use crate::mutations::expect_one_row;

/// Inserts an active rental and returns it with its assigned id.
///
/// The partial unique indexes on active rentals reject a second active
/// rental for the same rider or bicycle.
///
/// # Errors
///
/// Returns [`PersistenceError::ConstraintViolation`] if either index
/// rejects the row, or another error if the insert fails.
pub fn insert_rental(
    conn: &mut SqliteConnection,
    rental: &NewRental,
) -> Result<Rental, PersistenceError> {
    let (start_latitude, start_longitude) = location_to_columns(rental.start_location);

    let row: RentalRow = diesel::insert_into(rentals::table)
        .values(&NewRentalRow {
            rider_id: rental.rider.value(),
            bicycle_id: rental.bicycle.value(),
            start_time: format_timestamp(rental.start_time)?,
            start_latitude,
            start_longitude,
            base_rate: money_to_column(rental.base_rate)?,
            discount_percentage: i32::from(rental.discount_percentage),
            status: RentalStatus::Active.as_str(),
        })
        .returning(RentalRow::as_returning())
        .get_result(conn)?;

    info!(
        rental_id = row.rental_id,
        rider_id = row.rider_id,
        bicycle_id = row.bicycle_id,
        "Rental created"
    );
    row.into_domain()
}

/// Writes a rental's closing fields back.
///
/// # Errors
///
/// Returns an error if the update fails or the rental does not exist.
pub fn update_rental(conn: &mut SqliteConnection, rental: &Rental) -> Result<(), PersistenceError> {
    debug!(
        rental_id = rental.id.value(),
        status = rental.status().as_str(),
        "Updating rental"
    );

    let (end_latitude, end_longitude) = location_to_columns(rental.end_location);
    let end_time: Option<String> = rental.end_time.map(format_timestamp).transpose()?;
    let discount_amount: Option<i64> = rental.discount_amount.map(money_to_column).transpose()?;
    let total_amount: Option<i64> = rental.total_amount.map(money_to_column).transpose()?;

    let affected: usize = diesel::update(rentals::table.find(rental.id.value()))
        .set((
            rentals::end_time.eq(end_time),
            rentals::end_latitude.eq(end_latitude),
            rentals::end_longitude.eq(end_longitude),
            rentals::discount_percentage.eq(i32::from(rental.discount_percentage)),
            rentals::discount_amount.eq(discount_amount),
            rentals::total_amount.eq(total_amount),
            rentals::status.eq(rental.status().as_str()),
        ))
        .execute(conn)?;

    expect_one_row(affected, "rentals", rental.id.value())
}

/// Inserts the completed payment for a rental.
///
/// # Errors
///
/// Returns [`PersistenceError::ConstraintViolation`] if the rental already
/// has a payment, or another error if the insert fails.
pub fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &NewPayment,
) -> Result<Payment, PersistenceError> {
    let row: PaymentRow = diesel::insert_into(payments::table)
        .values(&NewPaymentRow {
            rental_id: payment.rental.value(),
            rider_id: payment.rider.value(),
            amount: money_to_column(payment.amount)?,
            status: PaymentStatus::Completed.as_str(),
            created_at: format_timestamp(payment.created_at)?,
        })
        .returning(PaymentRow::as_returning())
        .get_result(conn)?;

    info!(
        payment_id = row.payment_id,
        rental_id = row.rental_id,
        amount = row.amount,
        "Payment recorded"
    );
    row.into_domain()
}
