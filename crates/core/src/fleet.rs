// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_domain::{
    Bicycle, BicycleId, DomainError, Event, EventId, EventParticipant, MaintenanceRecord, Rental,
    RentalId, Rider, RiderId,
};
use time::Date;

use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::event::EventCoordinator;
use crate::inventory::InventoryCoordinator;
use crate::maintenance::MaintenanceCoordinator;
use crate::rental::RentalCoordinator;
use crate::store::{AuditRecord, FleetStore};

/// A store and a clock, with the coordinators and read queries over them.
///
/// `Fleet` is `Sync` when its store is, so one instance can serve many
/// request threads. Nothing is cached between calls.
pub struct Fleet<S: FleetStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: FleetStore> Fleet<S> {
    /// Creates a fleet reading time from `clock`.
    #[must_use]
    pub const fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a fleet reading time from the system clock.
    #[must_use]
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, Box::new(SystemClock))
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The rental coordinator.
    #[must_use]
    pub fn rentals(&self) -> RentalCoordinator<'_, S> {
        RentalCoordinator::new(&self.store, self.clock.as_ref())
    }

    /// The event capacity coordinator.
    #[must_use]
    pub fn events(&self) -> EventCoordinator<'_, S> {
        EventCoordinator::new(&self.store, self.clock.as_ref())
    }

    /// The maintenance coordinator.
    #[must_use]
    pub fn maintenance(&self) -> MaintenanceCoordinator<'_, S> {
        MaintenanceCoordinator::new(&self.store, self.clock.as_ref())
    }

    /// The rider and bicycle administration coordinator.
    #[must_use]
    pub fn inventory(&self) -> InventoryCoordinator<'_, S> {
        InventoryCoordinator::new(&self.store, self.clock.as_ref())
    }

    /// Loads a rider.
    ///
    /// # Errors
    ///
    /// Returns `RiderNotFound` or a storage error.
    pub fn rider(&self, id: RiderId) -> Result<Rider, CoreError> {
        self.store.transact("query_rider", |uow| {
            uow.rider(id)?
                .ok_or_else(|| DomainError::RiderNotFound(id).into())
        })
    }

    /// Loads a bicycle.
    ///
    /// # Errors
    ///
    /// Returns `BicycleNotFound` or a storage error.
    pub fn bicycle(&self, id: BicycleId) -> Result<Bicycle, CoreError> {
        self.store.transact("query_bicycle", |uow| {
            uow.bicycle(id)?
                .ok_or_else(|| DomainError::BicycleNotFound(id).into())
        })
    }

    /// Loads a rental.
    ///
    /// # Errors
    ///
    /// Returns `RentalNotFound` or a storage error.
    pub fn rental(&self, id: RentalId) -> Result<Rental, CoreError> {
        self.store.transact("query_rental", |uow| {
            uow.rental(id)?
                .ok_or_else(|| DomainError::RentalNotFound(id).into())
        })
    }

    /// Loads an event.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` or a storage error.
    pub fn event(&self, id: EventId) -> Result<Event, CoreError> {
        self.store.transact("query_event", |uow| {
            uow.event(id)?
                .ok_or_else(|| DomainError::EventNotFound(id).into())
        })
    }

    /// Returns the rider's active rental, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn active_rental_for_rider(&self, rider: RiderId) -> Result<Option<Rental>, CoreError> {
        self.store.transact("query_active_rental", |uow| {
            Ok(uow.active_rental_for_rider(rider)?)
        })
    }

    /// Lists a rider's rentals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RiderNotFound` or a storage error.
    pub fn rentals_for_rider(&self, rider: RiderId) -> Result<Vec<Rental>, CoreError> {
        self.store.transact("query_rentals_for_rider", |uow| {
            if uow.rider(rider)?.is_none() {
                return Err(DomainError::RiderNotFound(rider).into());
            }
            Ok(uow.rentals_for_rider(rider)?)
        })
    }

    /// Lists every registration for an event, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` or a storage error.
    pub fn participants(&self, event: EventId) -> Result<Vec<EventParticipant>, CoreError> {
        self.store.transact("query_participants", |uow| {
            if uow.event(event)?.is_none() {
                return Err(DomainError::EventNotFound(event).into());
            }
            Ok(uow.participants(event)?)
        })
    }

    /// Lists maintenance records whose next service is due by `as_of`.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn due_maintenance(&self, as_of: Date) -> Result<Vec<MaintenanceRecord>, CoreError> {
        self.store
            .transact("query_due_maintenance", |uow| Ok(uow.maintenance_due(as_of)?))
    }

    /// Lists the open maintenance records for a bicycle.
    ///
    /// # Errors
    ///
    /// Returns `BicycleNotFound` or a storage error.
    pub fn open_maintenance(
        &self,
        bicycle: BicycleId,
    ) -> Result<Vec<MaintenanceRecord>, CoreError> {
        self.store.transact("query_open_maintenance", |uow| {
            if uow.bicycle(bicycle)?.is_none() {
                return Err(DomainError::BicycleNotFound(bicycle).into());
            }
            Ok(uow.open_maintenance_for_bicycle(bicycle)?)
        })
    }

    /// Returns the most recent audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn audit_trail(&self, limit: usize) -> Result<Vec<AuditRecord>, CoreError> {
        self.store
            .transact("query_audit_trail", |uow| Ok(uow.audit_trail(limit)?))
    }
}
