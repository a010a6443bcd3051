// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The `SQLite` unit of work.
//!
//! A `SqliteUnit` borrows the connection of an open transaction and
//! forwards each call to the matching query or mutation.

use diesel::SqliteConnection;
use fleet::{
    AuditRecord, NewBicycle, NewEvent, NewMaintenance, NewParticipant, NewPayment, NewRental,
    NewRider, StoreError, UnitOfWork,
};
use fleet_audit::AuditEvent;
use fleet_domain::{
    Bicycle, BicycleCode, BicycleId, Event, EventId, EventParticipant, MaintenanceId,
    MaintenanceRecord, Payment, Rental, RentalId, Rider, RiderId,
};
use time::{Date, OffsetDateTime};

use crate::{mutations, queries};

pub struct SqliteUnit<'a> {
    pub conn: &'a mut SqliteConnection,
}

impl UnitOfWork for SqliteUnit<'_> {
    fn insert_rider(&mut self, rider: &NewRider) -> Result<Rider, StoreError> {
        mutations::inventory::insert_rider(self.conn, rider).map_err(StoreError::from)
    }

    fn rider(&mut self, id: RiderId) -> Result<Option<Rider>, StoreError> {
        queries::inventory::get_rider(self.conn, id).map_err(StoreError::from)
    }

    fn save_rider(&mut self, rider: &Rider) -> Result<(), StoreError> {
        mutations::inventory::update_rider(self.conn, rider).map_err(StoreError::from)
    }

    fn insert_bicycle(&mut self, bicycle: &NewBicycle) -> Result<Bicycle, StoreError> {
        mutations::inventory::insert_bicycle(self.conn, bicycle).map_err(StoreError::from)
    }

    fn bicycle(&mut self, id: BicycleId) -> Result<Option<Bicycle>, StoreError> {
        queries::inventory::get_bicycle(self.conn, id).map_err(StoreError::from)
    }

    fn bicycle_by_code(&mut self, code: &BicycleCode) -> Result<Option<Bicycle>, StoreError> {
        queries::inventory::get_bicycle_by_code(self.conn, code).map_err(StoreError::from)
    }

    fn save_bicycle(&mut self, bicycle: &Bicycle) -> Result<(), StoreError> {
        mutations::inventory::update_bicycle(self.conn, bicycle).map_err(StoreError::from)
    }

    fn delete_bicycle(&mut self, id: BicycleId) -> Result<(), StoreError> {
        mutations::inventory::delete_bicycle(self.conn, id).map_err(StoreError::from)
    }

    fn bicycle_history_count(&mut self, id: BicycleId) -> Result<u64, StoreError> {
        queries::inventory::count_bicycle_history(self.conn, id).map_err(StoreError::from)
    }

    fn insert_rental(&mut self, rental: &NewRental) -> Result<Rental, StoreError> {
        mutations::rentals::insert_rental(self.conn, rental).map_err(StoreError::from)
    }

    fn rental(&mut self, id: RentalId) -> Result<Option<Rental>, StoreError> {
        queries::rentals::get_rental(self.conn, id).map_err(StoreError::from)
    }

    fn active_rental_for_rider(&mut self, rider: RiderId) -> Result<Option<Rental>, StoreError> {
        queries::rentals::get_active_rental_for_rider(self.conn, rider).map_err(StoreError::from)
    }

    fn active_rental_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Option<Rental>, StoreError> {
        queries::rentals::get_active_rental_for_bicycle(self.conn, bicycle)
            .map_err(StoreError::from)
    }

    fn rentals_for_rider(&mut self, rider: RiderId) -> Result<Vec<Rental>, StoreError> {
        queries::rentals::list_rentals_for_rider(self.conn, rider).map_err(StoreError::from)
    }

    fn save_rental(&mut self, rental: &Rental) -> Result<(), StoreError> {
        mutations::rentals::update_rental(self.conn, rental).map_err(StoreError::from)
    }

    fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError> {
        mutations::rentals::insert_payment(self.conn, payment).map_err(StoreError::from)
    }

    fn payment_for_rental(&mut self, rental: RentalId) -> Result<Option<Payment>, StoreError> {
        queries::rentals::get_payment_for_rental(self.conn, rental).map_err(StoreError::from)
    }

    fn insert_event(&mut self, event: &NewEvent) -> Result<Event, StoreError> {
        mutations::events::insert_event(self.conn, event).map_err(StoreError::from)
    }

    fn event(&mut self, id: EventId) -> Result<Option<Event>, StoreError> {
        queries::events::get_event(self.conn, id).map_err(StoreError::from)
    }

    fn save_event_status(&mut self, event: &Event) -> Result<(), StoreError> {
        mutations::events::update_event_status(self.conn, event).map_err(StoreError::from)
    }

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError> {
        mutations::events::delete_event(self.conn, id).map_err(StoreError::from)
    }

    fn increment_participants(&mut self, id: EventId) -> Result<bool, StoreError> {
        mutations::events::increment_participants(self.conn, id).map_err(StoreError::from)
    }

    fn decrement_participants(&mut self, id: EventId) -> Result<bool, StoreError> {
        mutations::events::decrement_participants(self.conn, id).map_err(StoreError::from)
    }

    fn insert_participant(
        &mut self,
        participant: &NewParticipant,
    ) -> Result<EventParticipant, StoreError> {
        mutations::events::insert_participant(self.conn, participant).map_err(StoreError::from)
    }

    fn active_participant(
        &mut self,
        event: EventId,
        rider: RiderId,
    ) -> Result<Option<EventParticipant>, StoreError> {
        queries::events::get_active_participant(self.conn, event, rider).map_err(StoreError::from)
    }

    fn participants(&mut self, event: EventId) -> Result<Vec<EventParticipant>, StoreError> {
        queries::events::list_participants(self.conn, event).map_err(StoreError::from)
    }

    fn save_participant(&mut self, participant: &EventParticipant) -> Result<(), StoreError> {
        mutations::events::update_participant(self.conn, participant).map_err(StoreError::from)
    }

    fn insert_maintenance(
        &mut self,
        record: &NewMaintenance,
    ) -> Result<MaintenanceRecord, StoreError> {
        mutations::maintenance::insert_maintenance(self.conn, record).map_err(StoreError::from)
    }

    fn maintenance_record(
        &mut self,
        id: MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, StoreError> {
        queries::maintenance::get_maintenance_record(self.conn, id).map_err(StoreError::from)
    }

    fn save_maintenance(&mut self, record: &MaintenanceRecord) -> Result<(), StoreError> {
        mutations::maintenance::update_maintenance(self.conn, record).map_err(StoreError::from)
    }

    fn open_maintenance_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Vec<MaintenanceRecord>, StoreError> {
        queries::maintenance::list_open_maintenance_for_bicycle(self.conn, bicycle)
            .map_err(StoreError::from)
    }

    fn maintenance_due(&mut self, as_of: Date) -> Result<Vec<MaintenanceRecord>, StoreError> {
        queries::maintenance::list_maintenance_due(self.conn, as_of).map_err(StoreError::from)
    }

    fn record_audit(
        &mut self,
        event: &AuditEvent,
        recorded_at: OffsetDateTime,
    ) -> Result<i64, StoreError> {
        mutations::audit::persist_audit_event(self.conn, event, recorded_at)
            .map_err(StoreError::from)
    }

    fn audit_trail(&mut self, limit: usize) -> Result<Vec<AuditRecord>, StoreError> {
        queries::audit::get_audit_trail(self.conn, limit).map_err(StoreError::from)
    }
}
