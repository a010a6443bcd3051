// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrative operations on riders and bicycles.

use fleet_audit::{Actor, Cause, StateSnapshot};
use fleet_domain::{
    Bicycle, BicycleId, BicycleStatus, DomainError, Rider, validate_hourly_rate,
    validate_rider_name,
};
use time::OffsetDateTime;
use tracing::info;

use crate::clock::Clock;
use crate::error::{CoreError, StoreError};
use crate::outcome::{audit_event, log_failure};
use crate::request::{RegisterBicycle, RegisterRider, UpdateRiderTier};
use crate::snapshot;
use crate::store::{FleetStore, NewBicycle, NewRider, UnitOfWork};

/// Registers riders and manages the bicycle inventory.
pub struct InventoryCoordinator<'a, S: FleetStore> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: FleetStore> InventoryCoordinator<'a, S> {
    /// Creates a coordinator over `store`.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Registers a rider.
    ///
    /// # Errors
    ///
    /// - `InvalidRiderName` for a blank name
    /// - `CoreError::Storage` if the store fails
    pub fn register_rider(
        &self,
        request: RegisterRider,
        actor: Actor,
        cause: Cause,
    ) -> Result<Rider, CoreError> {
        let RegisterRider { name, tier } = request;
        validate_rider_name(&name)
            .map_err(CoreError::DomainViolation)
            .inspect_err(|err| log_failure("register_rider", err))?;
        let now: OffsetDateTime = self.clock.now();
        let new_rider: NewRider = NewRider {
            name: name.trim().to_string(),
            tier,
        };

        let rider: Rider = self
            .store
            .transact("register_rider", |uow| {
                let rider: Rider = uow.insert_rider(&new_rider)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "RegisterRider",
                        format!("Registered rider {} '{}'", rider.id, rider.name),
                        StateSnapshot::absent(),
                        snapshot::rider(&rider),
                    ),
                    now,
                )?;
                Ok(rider)
            })
            .inspect_err(|err| log_failure("register_rider", err))?;

        info!(rider_id = %rider.id, "Rider registered");
        Ok(rider)
    }

    /// Changes or clears a rider's tier.
    ///
    /// Active rentals keep their start-time discount until they are
    /// returned; the return re-prices with whatever tier is current then.
    ///
    /// # Errors
    ///
    /// - `RiderNotFound`
    /// - `CoreError::Storage` if the store fails
    pub fn update_rider_tier(
        &self,
        request: UpdateRiderTier,
        actor: Actor,
        cause: Cause,
    ) -> Result<Rider, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let rider: Rider = self
            .store
            .transact("update_rider_tier", |uow| {
                let mut rider: Rider = uow
                    .rider(request.rider)?
                    .ok_or(DomainError::RiderNotFound(request.rider))?;
                let before: StateSnapshot = snapshot::rider(&rider);
                rider.tier = request.tier;
                uow.save_rider(&rider)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "UpdateRiderTier",
                        format!("Updated tier of rider {}", rider.id),
                        before,
                        snapshot::rider(&rider),
                    ),
                    now,
                )?;
                Ok(rider)
            })
            .inspect_err(|err| log_failure("update_rider_tier", err))?;

        info!(rider_id = %rider.id, tier = ?rider.tier.map(u8::from), "Rider tier updated");
        Ok(rider)
    }

    /// Adds an `available` bicycle to the fleet.
    ///
    /// # Errors
    ///
    /// - `InvalidHourlyRate` for a zero rate
    /// - `DuplicateBicycleCode` if the code is taken
    /// - `CoreError::Storage` if the store fails
    pub fn register_bicycle(
        &self,
        request: RegisterBicycle,
        actor: Actor,
        cause: Cause,
    ) -> Result<Bicycle, CoreError> {
        let RegisterBicycle {
            code,
            hourly_rate,
            location,
            site,
        } = request;
        validate_hourly_rate(hourly_rate)
            .map_err(CoreError::DomainViolation)
            .inspect_err(|err| log_failure("register_bicycle", err))?;
        let now: OffsetDateTime = self.clock.now();
        let new_bicycle: NewBicycle = NewBicycle {
            code,
            hourly_rate,
            location,
            site: site
                .map(|site| site.trim().to_string())
                .filter(|site| !site.is_empty()),
            created_at: now,
        };

        let bicycle: Bicycle = self
            .store
            .transact("register_bicycle", |uow| {
                let duplicate = || DomainError::DuplicateBicycleCode(new_bicycle.code.to_string());
                if uow.bicycle_by_code(&new_bicycle.code)?.is_some() {
                    return Err(duplicate().into());
                }
                let bicycle: Bicycle = match uow.insert_bicycle(&new_bicycle) {
                    Ok(bicycle) => bicycle,
                    Err(StoreError::Conflict(_)) => return Err(duplicate().into()),
                    Err(err) => return Err(err.into()),
                };
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "RegisterBicycle",
                        format!("Registered bicycle {} ({})", bicycle.id, bicycle.code),
                        StateSnapshot::absent(),
                        snapshot::bicycle(&bicycle),
                    ),
                    now,
                )?;
                Ok(bicycle)
            })
            .inspect_err(|err| log_failure("register_bicycle", err))?;

        info!(
            bicycle_id = %bicycle.id,
            code = %bicycle.code,
            hourly_rate = bicycle.hourly_rate,
            "Bicycle registered"
        );
        Ok(bicycle)
    }

    /// Takes a bicycle permanently out of service.
    ///
    /// # Errors
    ///
    /// - `BicycleNotFound`
    /// - `BicycleInUse` if the bicycle is rented
    /// - `InvalidStatusTransition` if it is already retired
    /// - `CoreError::Storage` if the store fails
    pub fn retire_bicycle(
        &self,
        id: BicycleId,
        actor: Actor,
        cause: Cause,
    ) -> Result<Bicycle, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let bicycle: Bicycle = self
            .store
            .transact("retire_bicycle", |uow| {
                let mut bicycle: Bicycle = load_unrented_bicycle(uow, id)?;
                let before: StateSnapshot = snapshot::bicycle(&bicycle);
                bicycle.transition_to(BicycleStatus::Retired)?;
                uow.save_bicycle(&bicycle)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "RetireBicycle",
                        format!("Retired bicycle {id}"),
                        before,
                        snapshot::bicycle(&bicycle),
                    ),
                    now,
                )?;
                Ok(bicycle)
            })
            .inspect_err(|err| log_failure("retire_bicycle", err))?;

        info!(bicycle_id = %bicycle.id, "Bicycle retired");
        Ok(bicycle)
    }

    /// Deletes a bicycle that has never been rented or serviced.
    ///
    /// Bicycles with history are retired instead.
    ///
    /// # Errors
    ///
    /// - `BicycleNotFound`
    /// - `BicycleInUse` if the bicycle is rented
    /// - `BicycleReferenced` if rentals or maintenance records reference it
    /// - `CoreError::Storage` if the store fails
    pub fn delete_bicycle(
        &self,
        id: BicycleId,
        actor: Actor,
        cause: Cause,
    ) -> Result<(), CoreError> {
        let now: OffsetDateTime = self.clock.now();
        self.store
            .transact("delete_bicycle", |uow| {
                let bicycle: Bicycle = load_unrented_bicycle(uow, id)?;
                if uow.bicycle_history_count(id)? > 0 {
                    return Err(DomainError::BicycleReferenced(id).into());
                }
                uow.delete_bicycle(id)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "DeleteBicycle",
                        format!("Deleted bicycle {id} ({})", bicycle.code),
                        snapshot::bicycle(&bicycle),
                        StateSnapshot::absent(),
                    ),
                    now,
                )?;
                Ok(())
            })
            .inspect_err(|err| log_failure("delete_bicycle", err))?;

        info!(bicycle_id = %id, "Bicycle deleted");
        Ok(())
    }
}

fn load_unrented_bicycle(uow: &mut dyn UnitOfWork, id: BicycleId) -> Result<Bicycle, CoreError> {
    let bicycle: Bicycle = uow
        .bicycle(id)?
        .ok_or(DomainError::BicycleNotFound(id))?;
    if bicycle.status() == BicycleStatus::Rented {
        return Err(DomainError::BicycleInUse(id).into());
    }
    Ok(bicycle)
}
