// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The rental coordinator.
//!
//! A rental is `active` from start until it is returned (`completed`,
//! billed) or voided (`cancelled`). Each operation reads the rider, the
//! bicycle and the rental inside its own transaction and writes every
//! change it makes in that same transaction.

use fleet_audit::{Actor, Cause};
use fleet_domain::{
    Bicycle, BicycleId, BicycleStatus, DomainError, Payment, PriceQuote, Rental, RiderId,
    compute_rental_price, discount_percentage, validate_rental_window,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{CoreError, StoreError};
use crate::outcome::{audit_event, log_failure};
use crate::request::{CancelRental, ReturnRental, StartRental};
use crate::snapshot;
use crate::store::{FleetStore, NewPayment, NewRental, UnitOfWork};

/// The result of returning a bicycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalReceipt {
    /// The completed rental.
    pub rental: Rental,
    /// The payment recorded for it.
    pub payment: Payment,
    /// The price breakdown.
    pub quote: PriceQuote,
}

/// Starts, returns and cancels rentals.
pub struct RentalCoordinator<'a, S: FleetStore> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: FleetStore> RentalCoordinator<'a, S> {
    /// Creates a coordinator over `store`.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Starts a rental.
    ///
    /// The bicycle moves to `rented` and an `active` rental is created in
    /// one transaction. The discount percentage is taken from the rider's
    /// tier as it is at this moment.
    ///
    /// # Errors
    ///
    /// - `RiderNotFound` if the rider does not exist
    /// - `RiderAlreadyRenting` if the rider holds an active rental
    /// - `BicycleNotFound` if the bicycle does not exist
    /// - `BicycleNotAvailable` if the bicycle is not `available`
    /// - `CoreError::Storage` if the store fails
    pub fn start(
        &self,
        request: StartRental,
        actor: Actor,
        cause: Cause,
    ) -> Result<Rental, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let rental: Rental = self
            .store
            .transact("start_rental", |uow| {
                let rider = uow
                    .rider(request.rider)?
                    .ok_or(DomainError::RiderNotFound(request.rider))?;
                if let Some(active) = uow.active_rental_for_rider(rider.id)? {
                    return Err(DomainError::RiderAlreadyRenting {
                        rider: rider.id,
                        active_rental: active.id,
                    }
                    .into());
                }
                let mut bicycle: Bicycle = uow
                    .bicycle(request.bicycle)?
                    .ok_or(DomainError::BicycleNotFound(request.bicycle))?;
                if !bicycle.is_available() {
                    return Err(not_available(&bicycle).into());
                }

                let before = snapshot::bicycle(&bicycle);
                bicycle.transition_to(BicycleStatus::Rented)?;

                let new_rental: NewRental = NewRental {
                    rider: rider.id,
                    bicycle: bicycle.id,
                    start_time: now,
                    start_location: request.start_location,
                    base_rate: bicycle.hourly_rate,
                    discount_percentage: discount_percentage(rider.tier),
                };
                let rental: Rental = match uow.insert_rental(&new_rental) {
                    Ok(rental) => rental,
                    Err(StoreError::Conflict(detail)) => {
                        return Err(explain_conflict(uow, rider.id, bicycle.id, &detail));
                    }
                    Err(err) => return Err(err.into()),
                };
                uow.save_bicycle(&bicycle)?;

                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "StartRental",
                        format!(
                            "Rider {} started rental {} on bicycle {}",
                            rider.id, rental.id, bicycle.id
                        ),
                        before,
                        snapshot::rental_with_bicycle(&rental, &bicycle),
                    ),
                    now,
                )?;
                Ok(rental)
            })
            .inspect_err(|err| log_failure("start_rental", err))?;

        info!(
            rental_id = %rental.id,
            rider_id = %rental.rider,
            bicycle_id = %rental.bicycle,
            discount_percentage = rental.discount_percentage,
            "Rental started"
        );
        Ok(rental)
    }

    /// Returns a rented bicycle and bills the rental.
    ///
    /// The price is computed from the stored start time and base rate and
    /// the rider's tier re-read at this moment. The rental is completed,
    /// the bicycle made available (and moved, when an end location is
    /// given) and a completed payment recorded, all in one transaction.
    ///
    /// # Errors
    ///
    /// - `RentalNotFound` if the rental does not exist
    /// - `RentalNotActive` if the rental already ended
    /// - `InvalidRentalWindow` if no time has elapsed since the start
    /// - `AmountOverflow` if the price does not fit
    /// - `CoreError::Storage` if the store fails
    pub fn return_rental(
        &self,
        request: ReturnRental,
        actor: Actor,
        cause: Cause,
    ) -> Result<RentalReceipt, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let receipt: RentalReceipt = self
            .store
            .transact("return_rental", |uow| {
                let mut rental: Rental = uow
                    .rental(request.rental)?
                    .ok_or(DomainError::RentalNotFound(request.rental))?;
                rental.ensure_active()?;
                validate_rental_window(rental.start_time, now, now)?;

                let rider = uow
                    .rider(rental.rider)?
                    .ok_or(DomainError::RiderNotFound(rental.rider))?;
                let mut bicycle: Bicycle = load_bicycle(uow, rental.bicycle)?;
                let before = snapshot::rental_with_bicycle(&rental, &bicycle);

                let quote: PriceQuote =
                    compute_rental_price(rental.start_time, now, rental.base_rate, rider.tier)?;
                rental.complete(now, request.end_location, &quote)?;
                bicycle.transition_to(BicycleStatus::Available)?;
                if request.end_location.is_some() {
                    bicycle.location = request.end_location;
                }

                uow.save_rental(&rental)?;
                uow.save_bicycle(&bicycle)?;
                let payment: Payment = uow.insert_payment(&NewPayment {
                    rental: rental.id,
                    rider: rental.rider,
                    amount: quote.total_amount,
                    created_at: now,
                })?;

                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "ReturnRental",
                        format!(
                            "Rental {} returned after {} billed hour(s), charged {}",
                            rental.id, quote.billed_hours, quote.total_amount
                        ),
                        before,
                        snapshot::rental_with_bicycle(&rental, &bicycle),
                    ),
                    now,
                )?;
                Ok(RentalReceipt {
                    rental,
                    payment,
                    quote,
                })
            })
            .inspect_err(|err| log_failure("return_rental", err))?;

        info!(
            rental_id = %receipt.rental.id,
            bicycle_id = %receipt.rental.bicycle,
            billed_hours = receipt.quote.billed_hours,
            total_amount = receipt.quote.total_amount,
            "Rental returned"
        );
        Ok(receipt)
    }

    /// Voids an active rental. Nothing is billed.
    ///
    /// # Errors
    ///
    /// - `RentalNotFound` if the rental does not exist
    /// - `RentalNotActive` if the rental already ended
    /// - `CoreError::Storage` if the store fails
    pub fn cancel(
        &self,
        request: CancelRental,
        actor: Actor,
        cause: Cause,
    ) -> Result<Rental, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let rental: Rental = self
            .store
            .transact("cancel_rental", |uow| {
                let mut rental: Rental = uow
                    .rental(request.rental)?
                    .ok_or(DomainError::RentalNotFound(request.rental))?;
                rental.ensure_active()?;
                let mut bicycle: Bicycle = load_bicycle(uow, rental.bicycle)?;
                let before = snapshot::rental_with_bicycle(&rental, &bicycle);

                rental.cancel(now)?;
                bicycle.transition_to(BicycleStatus::Available)?;
                uow.save_rental(&rental)?;
                uow.save_bicycle(&bicycle)?;

                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "CancelRental",
                        format!("Rental {} cancelled", rental.id),
                        before,
                        snapshot::rental_with_bicycle(&rental, &bicycle),
                    ),
                    now,
                )?;
                Ok(rental)
            })
            .inspect_err(|err| log_failure("cancel_rental", err))?;

        info!(
            rental_id = %rental.id,
            bicycle_id = %rental.bicycle,
            "Rental cancelled"
        );
        Ok(rental)
    }
}

fn load_bicycle(uow: &mut dyn UnitOfWork, id: BicycleId) -> Result<Bicycle, CoreError> {
    uow.bicycle(id)?
        .ok_or_else(|| DomainError::BicycleNotFound(id).into())
}

fn not_available(bicycle: &Bicycle) -> DomainError {
    DomainError::BicycleNotAvailable {
        bicycle: bicycle.id,
        status: bicycle.status().to_string(),
    }
}

/// Maps a uniqueness conflict on the rental insert back to the precondition
/// it stands for.
///
/// The store only reports a conflict when another writer got there first,
/// so the re-read sees that writer's rental.
fn explain_conflict(
    uow: &mut dyn UnitOfWork,
    rider: RiderId,
    bicycle: BicycleId,
    detail: &str,
) -> CoreError {
    debug!(
        rider_id = %rider,
        bicycle_id = %bicycle,
        detail,
        "Rental insert lost a race"
    );
    match uow.active_rental_for_rider(rider) {
        Ok(Some(active)) => DomainError::RiderAlreadyRenting {
            rider,
            active_rental: active.id,
        }
        .into(),
        Ok(None) => DomainError::BicycleNotAvailable {
            bicycle,
            status: BicycleStatus::Rented.to_string(),
        }
        .into(),
        Err(err) => err.into(),
    }
}
