// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The transaction boundary between coordinators and storage.
//!
//! A coordinator operation calls [`FleetStore::transact`] exactly once.
//! The store opens a transaction, hands the closure a [`UnitOfWork`] bound
//! to it, commits if the closure returns `Ok` and rolls back otherwise.
//! Every read made through the unit of work observes current committed
//! state plus the transaction's own writes; nothing is cached across calls.
//!
//! Implementations must serialise transactions that touch the same
//! bicycle or event. The `SQLite` store does this by taking the database
//! write lock when the transaction begins.

use fleet_audit::AuditEvent;
use fleet_domain::{
    Bicycle, BicycleCode, BicycleId, Event, EventId, EventParticipant, Location, MaintenanceId,
    MaintenanceKind, MaintenanceRecord, Payment, Rental, RentalId, Rider, RiderId, Tier,
};
use time::{Date, OffsetDateTime};

use crate::error::{CoreError, StoreError};

/// Opens one transaction per coordinator operation.
pub trait FleetStore: Send + Sync {
    /// Runs `operation` inside a single transaction.
    ///
    /// `label` names the operation for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns whatever `operation` returns, or `CoreError::Storage` if the
    /// transaction cannot be opened or committed. In every error case no
    /// write made by `operation` is visible afterwards.
    fn transact<T, F>(&self, label: &'static str, operation: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, CoreError>;
}

/// Fields for a new rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRider {
    /// Display name.
    pub name: String,
    /// Demographic tier.
    pub tier: Option<Tier>,
}

/// Fields for a new bicycle. Bicycles always start available.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBicycle {
    /// Unique code.
    pub code: BicycleCode,
    /// Hourly rate in minor currency units.
    pub hourly_rate: u64,
    /// Initial position.
    pub location: Option<Location>,
    /// Owning site.
    pub site: Option<String>,
    /// Registration time.
    pub created_at: OffsetDateTime,
}

/// Fields for a new active rental.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    /// The renting rider.
    pub rider: RiderId,
    /// The rented bicycle.
    pub bicycle: BicycleId,
    /// Start instant.
    pub start_time: OffsetDateTime,
    /// Reported start position.
    pub start_location: Option<Location>,
    /// Rate copied from the bicycle.
    pub base_rate: u64,
    /// Discount computed from the rider's tier.
    pub discount_percentage: u8,
}

/// Fields for a new completed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// The charged rental.
    pub rental: RentalId,
    /// The charged rider.
    pub rider: RiderId,
    /// Amount in minor currency units.
    pub amount: u64,
    /// Recording instant.
    pub created_at: OffsetDateTime,
}

/// Fields for a new draft event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Display title.
    pub title: String,
    /// When the event takes place.
    pub event_date: OffsetDateTime,
    /// Optional capacity.
    pub capacity: Option<u32>,
    /// Creation instant.
    pub created_at: OffsetDateTime,
}

/// Fields for a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    /// The event.
    pub event: EventId,
    /// The rider.
    pub rider: RiderId,
    /// Registration instant.
    pub registered_at: OffsetDateTime,
}

/// Fields for a new open maintenance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenance {
    /// The serviced bicycle.
    pub bicycle: BicycleId,
    /// Category of work.
    pub kind: MaintenanceKind,
    /// Notes.
    pub description: Option<String>,
    /// Cost in minor currency units.
    pub cost: u64,
    /// Who performs the work.
    pub performed_by: String,
    /// When the work is scheduled or performed.
    pub performed_at: OffsetDateTime,
    /// Next service due date.
    pub next_due_date: Option<Date>,
}

/// A persisted audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Store-assigned sequence number.
    pub id: i64,
    /// When the event was recorded.
    pub recorded_at: OffsetDateTime,
    /// The event.
    pub event: AuditEvent,
}

/// Typed reads and writes bound to one open transaction.
///
/// Lookups return `Ok(None)` for missing rows; coordinators turn that into
/// the matching `*NotFound` domain error. `save_*` methods overwrite the
/// mutable fields of an existing row and report a missing row as
/// `StoreError::Corrupt`.
pub trait UnitOfWork {
    // Riders

    /// Inserts a rider.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn insert_rider(&mut self, rider: &NewRider) -> Result<Rider, StoreError>;

    /// Loads a rider.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn rider(&mut self, id: RiderId) -> Result<Option<Rider>, StoreError>;

    /// Overwrites a rider's name and tier.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_rider(&mut self, rider: &Rider) -> Result<(), StoreError>;

    // Bicycles

    /// Inserts an available bicycle.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the code is taken.
    fn insert_bicycle(&mut self, bicycle: &NewBicycle) -> Result<Bicycle, StoreError>;

    /// Loads a bicycle.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn bicycle(&mut self, id: BicycleId) -> Result<Option<Bicycle>, StoreError>;

    /// Loads a bicycle by its code.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn bicycle_by_code(&mut self, code: &BicycleCode) -> Result<Option<Bicycle>, StoreError>;

    /// Overwrites a bicycle's status, rate, location and site.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_bicycle(&mut self, bicycle: &Bicycle) -> Result<(), StoreError>;

    /// Deletes a bicycle row.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn delete_bicycle(&mut self, id: BicycleId) -> Result<(), StoreError>;

    /// Counts rentals and maintenance records referencing a bicycle.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn bicycle_history_count(&mut self, id: BicycleId) -> Result<u64, StoreError>;

    // Rentals

    /// Inserts an active rental.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the rider or bicycle already has an
    /// active rental.
    fn insert_rental(&mut self, rental: &NewRental) -> Result<Rental, StoreError>;

    /// Loads a rental.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn rental(&mut self, id: RentalId) -> Result<Option<Rental>, StoreError>;

    /// Loads the rider's active rental, if any.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn active_rental_for_rider(&mut self, rider: RiderId) -> Result<Option<Rental>, StoreError>;

    /// Loads the bicycle's active rental, if any.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn active_rental_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Option<Rental>, StoreError>;

    /// Lists a rider's rentals, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn rentals_for_rider(&mut self, rider: RiderId) -> Result<Vec<Rental>, StoreError>;

    /// Overwrites a rental's end, status and amounts.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_rental(&mut self, rental: &Rental) -> Result<(), StoreError>;

    /// Inserts a completed payment.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError>;

    /// Loads the payment recorded for a rental, if any.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn payment_for_rental(&mut self, rental: RentalId) -> Result<Option<Payment>, StoreError>;

    // Events

    /// Inserts a draft event with zero participants.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn insert_event(&mut self, event: &NewEvent) -> Result<Event, StoreError>;

    /// Loads an event.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn event(&mut self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// Overwrites an event's status. Never touches the participant counter.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_event_status(&mut self, event: &Event) -> Result<(), StoreError>;

    /// Deletes an event and its registration history.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError>;

    /// Adds one participant if capacity allows.
    ///
    /// Returns `false`, changing nothing, when the event is at capacity.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn increment_participants(&mut self, id: EventId) -> Result<bool, StoreError>;

    /// Removes one participant, never going below zero.
    ///
    /// Returns `false` when the counter was already zero.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn decrement_participants(&mut self, id: EventId) -> Result<bool, StoreError>;

    /// Inserts a registered participant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a non-cancelled registration for the
    /// same (event, rider) exists.
    fn insert_participant(
        &mut self,
        participant: &NewParticipant,
    ) -> Result<EventParticipant, StoreError>;

    /// Loads the rider's non-cancelled registration for an event.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn active_participant(
        &mut self,
        event: EventId,
        rider: RiderId,
    ) -> Result<Option<EventParticipant>, StoreError>;

    /// Lists every registration for an event, including cancelled ones.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn participants(&mut self, event: EventId) -> Result<Vec<EventParticipant>, StoreError>;

    /// Overwrites a registration's attendance status.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_participant(&mut self, participant: &EventParticipant) -> Result<(), StoreError>;

    // Maintenance

    /// Inserts an open maintenance record.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn insert_maintenance(
        &mut self,
        record: &NewMaintenance,
    ) -> Result<MaintenanceRecord, StoreError>;

    /// Loads a maintenance record.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn maintenance_record(
        &mut self,
        id: MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, StoreError>;

    /// Overwrites a record's completion time.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn save_maintenance(&mut self, record: &MaintenanceRecord) -> Result<(), StoreError>;

    /// Lists open records for a bicycle.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn open_maintenance_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Vec<MaintenanceRecord>, StoreError>;

    /// Lists records whose next service is due on or before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn maintenance_due(&mut self, as_of: Date) -> Result<Vec<MaintenanceRecord>, StoreError>;

    // Audit

    /// Appends an audit event.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the write fails.
    fn record_audit(
        &mut self,
        event: &AuditEvent,
        recorded_at: OffsetDateTime,
    ) -> Result<i64, StoreError>;

    /// Lists the most recent audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the read fails.
    fn audit_trail(&mut self, limit: usize) -> Result<Vec<AuditRecord>, StoreError>;
}
