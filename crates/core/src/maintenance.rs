// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The maintenance coordinator.
//!
//! Scheduling work takes a bicycle out of service; signing off the last
//! open record puts it back. Several records may be open for one bicycle
//! at once.

use fleet_audit::{Actor, Cause, StateSnapshot};
use fleet_domain::{Bicycle, BicycleStatus, DomainError, MaintenanceRecord};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::outcome::{audit_event, log_failure};
use crate::request::{CompleteMaintenance, ScheduleMaintenance};
use crate::snapshot;
use crate::store::{FleetStore, NewMaintenance};

/// Opens and signs off maintenance records.
pub struct MaintenanceCoordinator<'a, S: FleetStore> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: FleetStore> MaintenanceCoordinator<'a, S> {
    /// Creates a coordinator over `store`.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Opens a maintenance record and takes the bicycle out of service.
    ///
    /// An `available` bicycle moves to `maintenance`. A bicycle already in
    /// `maintenance` gets the additional record and keeps its status.
    ///
    /// # Errors
    ///
    /// - `BicycleNotFound`
    /// - `BicycleInUse` if the bicycle is rented
    /// - `InvalidStatusTransition` if the bicycle is retired
    /// - `CoreError::Storage` if the store fails
    pub fn schedule(
        &self,
        request: ScheduleMaintenance,
        actor: Actor,
        cause: Cause,
    ) -> Result<MaintenanceRecord, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let ScheduleMaintenance {
            bicycle: bicycle_id,
            kind,
            description,
            cost,
            performed_by,
            next_due_date,
        } = request;
        let new_record: NewMaintenance = NewMaintenance {
            bicycle: bicycle_id,
            kind,
            description,
            cost,
            performed_by,
            performed_at: now,
            next_due_date,
        };

        let record: MaintenanceRecord = self
            .store
            .transact("schedule_maintenance", |uow| {
                let mut bicycle: Bicycle = uow
                    .bicycle(bicycle_id)?
                    .ok_or(DomainError::BicycleNotFound(bicycle_id))?;
                let before: StateSnapshot = snapshot::maintenance(None, &bicycle);
                match bicycle.status() {
                    BicycleStatus::Rented => {
                        return Err(DomainError::BicycleInUse(bicycle_id).into());
                    }
                    BicycleStatus::Maintenance => {
                        debug!(
                            bicycle_id = %bicycle_id,
                            "Bicycle already in maintenance; adding record"
                        );
                    }
                    BicycleStatus::Available | BicycleStatus::Retired => {
                        bicycle.transition_to(BicycleStatus::Maintenance)?;
                        uow.save_bicycle(&bicycle)?;
                    }
                }

                let record: MaintenanceRecord = uow.insert_maintenance(&new_record)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "ScheduleMaintenance",
                        format!(
                            "Scheduled {} maintenance {} on bicycle {}",
                            record.kind, record.id, bicycle.id
                        ),
                        before,
                        snapshot::maintenance(Some(&record), &bicycle),
                    ),
                    now,
                )?;
                Ok(record)
            })
            .inspect_err(|err| log_failure("schedule_maintenance", err))?;

        info!(
            maintenance_id = %record.id,
            bicycle_id = %record.bicycle,
            kind = %record.kind,
            "Maintenance scheduled"
        );
        Ok(record)
    }

    /// Signs off a maintenance record.
    ///
    /// The bicycle returns to `available` when it is in `maintenance` and
    /// this was its last open record. Completing a record that is already
    /// complete returns it unchanged and writes nothing.
    ///
    /// # Errors
    ///
    /// - `MaintenanceRecordNotFound`
    /// - `BicycleNotFound` if the record's bicycle has vanished
    /// - `CoreError::Storage` if the store fails
    pub fn complete(
        &self,
        request: CompleteMaintenance,
        actor: Actor,
        cause: Cause,
    ) -> Result<MaintenanceRecord, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let (record, changed): (MaintenanceRecord, bool) = self
            .store
            .transact("complete_maintenance", |uow| {
                let mut record: MaintenanceRecord = uow
                    .maintenance_record(request.record)?
                    .ok_or(DomainError::MaintenanceRecordNotFound(request.record))?;
                let mut bicycle: Bicycle = uow
                    .bicycle(record.bicycle)?
                    .ok_or(DomainError::BicycleNotFound(record.bicycle))?;
                let before: StateSnapshot = snapshot::maintenance(Some(&record), &bicycle);

                if !record.complete(now) {
                    return Ok((record, false));
                }
                uow.save_maintenance(&record)?;

                if bicycle.status() == BicycleStatus::Maintenance {
                    let still_open: usize = uow.open_maintenance_for_bicycle(bicycle.id)?.len();
                    if still_open == 0 {
                        bicycle.transition_to(BicycleStatus::Available)?;
                        uow.save_bicycle(&bicycle)?;
                    } else {
                        debug!(
                            bicycle_id = %bicycle.id,
                            still_open,
                            "Bicycle stays in maintenance"
                        );
                    }
                }

                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "CompleteMaintenance",
                        format!(
                            "Completed maintenance {} on bicycle {}",
                            record.id, bicycle.id
                        ),
                        before,
                        snapshot::maintenance(Some(&record), &bicycle),
                    ),
                    now,
                )?;
                Ok((record, true))
            })
            .inspect_err(|err| log_failure("complete_maintenance", err))?;

        if changed {
            info!(
                maintenance_id = %record.id,
                bicycle_id = %record.bicycle,
                "Maintenance completed"
            );
        } else {
            debug!(maintenance_id = %record.id, "Maintenance record was already complete");
        }
        Ok(record)
    }
}
