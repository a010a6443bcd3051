// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-process [`FleetStore`].
//!
//! A transaction holds the store lock for its whole duration and works on
//! a copy of the state, which replaces the committed state only when the
//! operation returns `Ok`. Uniqueness rules the `SQLite` schema enforces
//! with indexes are checked here on insert and reported the same way, as
//! `StoreError::Conflict`.

use std::collections::BTreeMap;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fleet_audit::AuditEvent;
use fleet_domain::{
    AttendanceStatus, Bicycle, BicycleCode, BicycleId, BicycleStatus, Event, EventId,
    EventParticipant, EventStatus, MaintenanceId, MaintenanceRecord, ParticipantId, Payment,
    PaymentId, PaymentStatus, Rental, RentalId, RentalStatus, Rider, RiderId,
};
use time::{Date, OffsetDateTime};
use tracing::trace;

use crate::error::{CoreError, StoreError};
use crate::store::{
    AuditRecord, FleetStore, NewBicycle, NewEvent, NewMaintenance, NewParticipant, NewPayment,
    NewRental, NewRider, UnitOfWork,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: i64,
    riders: BTreeMap<RiderId, Rider>,
    bicycles: BTreeMap<BicycleId, Bicycle>,
    rentals: BTreeMap<RentalId, Rental>,
    payments: BTreeMap<PaymentId, Payment>,
    events: BTreeMap<EventId, Event>,
    participants: BTreeMap<ParticipantId, EventParticipant>,
    maintenance: BTreeMap<MaintenanceId, MaintenanceRecord>,
    audit: Vec<AuditRecord>,
}

impl MemoryState {
    const fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    #[cfg(test)]
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next transaction fail at commit with a backend error, after
    /// its operation has run to completion.
    #[cfg(test)]
    pub(crate) fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn commit_fails(&self) -> bool {
        self.fail_next_commit.swap(false, Ordering::SeqCst)
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self)]
    const fn commit_fails(&self) -> bool {
        false
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FleetStore for MemoryStore {
    fn transact<T, F>(&self, label: &'static str, operation: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, CoreError>,
    {
        let mut committed: MutexGuard<'_, MemoryState> = self.lock();
        let mut working: MemoryState = committed.clone();
        let value: T = operation(&mut MemoryUnit {
            state: &mut working,
        })?;
        if self.commit_fails() {
            return Err(StoreError::Backend(format!("commit of {label} failed")).into());
        }
        *committed = working;
        drop(committed);
        trace!(transaction = label, "Memory transaction committed");
        Ok(value)
    }
}

struct MemoryUnit<'a> {
    state: &'a mut MemoryState,
}

fn missing(entity: &str, id: i64) -> StoreError {
    StoreError::Corrupt(format!("{entity} {id} does not exist"))
}

impl UnitOfWork for MemoryUnit<'_> {
    fn insert_rider(&mut self, rider: &NewRider) -> Result<Rider, StoreError> {
        let id: RiderId = RiderId::new(self.state.allocate());
        let stored: Rider = Rider::new(id, rider.name.clone(), rider.tier);
        self.state.riders.insert(id, stored.clone());
        Ok(stored)
    }

    fn rider(&mut self, id: RiderId) -> Result<Option<Rider>, StoreError> {
        Ok(self.state.riders.get(&id).cloned())
    }

    fn save_rider(&mut self, rider: &Rider) -> Result<(), StoreError> {
        let slot: &mut Rider = self
            .state
            .riders
            .get_mut(&rider.id)
            .ok_or_else(|| missing("rider", rider.id.value()))?;
        slot.clone_from(rider);
        Ok(())
    }

    fn insert_bicycle(&mut self, bicycle: &NewBicycle) -> Result<Bicycle, StoreError> {
        if self
            .state
            .bicycles
            .values()
            .any(|existing| existing.code == bicycle.code)
        {
            return Err(StoreError::Conflict(format!(
                "bicycle code {} already exists",
                bicycle.code
            )));
        }
        let id: BicycleId = BicycleId::new(self.state.allocate());
        let stored: Bicycle = Bicycle::new(
            id,
            bicycle.code.clone(),
            bicycle.hourly_rate,
            BicycleStatus::Available,
            bicycle.location,
            bicycle.site.clone(),
            bicycle.created_at,
        );
        self.state.bicycles.insert(id, stored.clone());
        Ok(stored)
    }

    fn bicycle(&mut self, id: BicycleId) -> Result<Option<Bicycle>, StoreError> {
        Ok(self.state.bicycles.get(&id).cloned())
    }

    fn bicycle_by_code(&mut self, code: &BicycleCode) -> Result<Option<Bicycle>, StoreError> {
        Ok(self
            .state
            .bicycles
            .values()
            .find(|bicycle| &bicycle.code == code)
            .cloned())
    }

    fn save_bicycle(&mut self, bicycle: &Bicycle) -> Result<(), StoreError> {
        let slot: &mut Bicycle = self
            .state
            .bicycles
            .get_mut(&bicycle.id)
            .ok_or_else(|| missing("bicycle", bicycle.id.value()))?;
        slot.clone_from(bicycle);
        Ok(())
    }

    fn delete_bicycle(&mut self, id: BicycleId) -> Result<(), StoreError> {
        self.state
            .bicycles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("bicycle", id.value()))
    }

    fn bicycle_history_count(&mut self, id: BicycleId) -> Result<u64, StoreError> {
        let rentals: usize = self
            .state
            .rentals
            .values()
            .filter(|rental| rental.bicycle == id)
            .count();
        let records: usize = self
            .state
            .maintenance
            .values()
            .filter(|record| record.bicycle == id)
            .count();
        u64::try_from(rentals + records)
            .map_err(|_| StoreError::Corrupt(String::from("history count overflow")))
    }

    fn insert_rental(&mut self, rental: &NewRental) -> Result<Rental, StoreError> {
        if self.state.rentals.values().any(|existing| {
            existing.is_active()
                && (existing.rider == rental.rider || existing.bicycle == rental.bicycle)
        }) {
            return Err(StoreError::Conflict(format!(
                "an active rental already exists for rider {} or bicycle {}",
                rental.rider, rental.bicycle
            )));
        }
        let id: RentalId = RentalId::new(self.state.allocate());
        let stored: Rental = Rental::new(
            id,
            rental.rider,
            rental.bicycle,
            rental.start_time,
            None,
            rental.start_location,
            None,
            rental.base_rate,
            rental.discount_percentage,
            None,
            None,
            RentalStatus::Active,
        );
        self.state.rentals.insert(id, stored.clone());
        Ok(stored)
    }

    fn rental(&mut self, id: RentalId) -> Result<Option<Rental>, StoreError> {
        Ok(self.state.rentals.get(&id).cloned())
    }

    fn active_rental_for_rider(&mut self, rider: RiderId) -> Result<Option<Rental>, StoreError> {
        Ok(self
            .state
            .rentals
            .values()
            .find(|rental| rental.rider == rider && rental.is_active())
            .cloned())
    }

    fn active_rental_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Option<Rental>, StoreError> {
        Ok(self
            .state
            .rentals
            .values()
            .find(|rental| rental.bicycle == bicycle && rental.is_active())
            .cloned())
    }

    fn rentals_for_rider(&mut self, rider: RiderId) -> Result<Vec<Rental>, StoreError> {
        let mut rentals: Vec<Rental> = self
            .state
            .rentals
            .values()
            .filter(|rental| rental.rider == rider)
            .cloned()
            .collect();
        rentals.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        Ok(rentals)
    }

    fn save_rental(&mut self, rental: &Rental) -> Result<(), StoreError> {
        let slot: &mut Rental = self
            .state
            .rentals
            .get_mut(&rental.id)
            .ok_or_else(|| missing("rental", rental.id.value()))?;
        slot.clone_from(rental);
        Ok(())
    }

    fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError> {
        let id: PaymentId = PaymentId::new(self.state.allocate());
        let stored: Payment = Payment {
            id,
            rental: payment.rental,
            rider: payment.rider,
            amount: payment.amount,
            status: PaymentStatus::Completed,
            created_at: payment.created_at,
        };
        self.state.payments.insert(id, stored.clone());
        Ok(stored)
    }

    fn payment_for_rental(&mut self, rental: RentalId) -> Result<Option<Payment>, StoreError> {
        Ok(self
            .state
            .payments
            .values()
            .find(|payment| payment.rental == rental)
            .cloned())
    }

    fn insert_event(&mut self, event: &NewEvent) -> Result<Event, StoreError> {
        let id: EventId = EventId::new(self.state.allocate());
        let stored: Event = Event::new(
            id,
            event.title.clone(),
            event.event_date,
            event.capacity,
            0,
            EventStatus::Draft,
            event.created_at,
        );
        self.state.events.insert(id, stored.clone());
        Ok(stored)
    }

    fn event(&mut self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.state.events.get(&id).cloned())
    }

    fn save_event_status(&mut self, event: &Event) -> Result<(), StoreError> {
        let slot: &mut Event = self
            .state
            .events
            .get_mut(&event.id)
            .ok_or_else(|| missing("event", event.id.value()))?;
        *slot = with_counter(slot, event.status(), slot.current_participants());
        Ok(())
    }

    fn delete_event(&mut self, id: EventId) -> Result<(), StoreError> {
        self.state
            .events
            .remove(&id)
            .ok_or_else(|| missing("event", id.value()))?;
        self.state
            .participants
            .retain(|_, participant| participant.event != id);
        Ok(())
    }

    fn increment_participants(&mut self, id: EventId) -> Result<bool, StoreError> {
        let slot: &mut Event = self
            .state
            .events
            .get_mut(&id)
            .ok_or_else(|| missing("event", id.value()))?;
        if slot.is_full() {
            return Ok(false);
        }
        *slot = with_counter(slot, slot.status(), slot.current_participants() + 1);
        Ok(true)
    }

    fn decrement_participants(&mut self, id: EventId) -> Result<bool, StoreError> {
        let slot: &mut Event = self
            .state
            .events
            .get_mut(&id)
            .ok_or_else(|| missing("event", id.value()))?;
        if slot.current_participants() == 0 {
            return Ok(false);
        }
        *slot = with_counter(slot, slot.status(), slot.current_participants() - 1);
        Ok(true)
    }

    fn insert_participant(
        &mut self,
        participant: &NewParticipant,
    ) -> Result<EventParticipant, StoreError> {
        if self.state.participants.values().any(|existing| {
            existing.event == participant.event
                && existing.rider == participant.rider
                && existing.status().is_active()
        }) {
            return Err(StoreError::Conflict(format!(
                "rider {} already registered for event {}",
                participant.rider, participant.event
            )));
        }
        let id: ParticipantId = ParticipantId::new(self.state.allocate());
        let stored: EventParticipant = EventParticipant::new(
            id,
            participant.event,
            participant.rider,
            participant.registered_at,
            AttendanceStatus::Registered,
        );
        self.state.participants.insert(id, stored.clone());
        Ok(stored)
    }

    fn active_participant(
        &mut self,
        event: EventId,
        rider: RiderId,
    ) -> Result<Option<EventParticipant>, StoreError> {
        Ok(self
            .state
            .participants
            .values()
            .find(|participant| {
                participant.event == event
                    && participant.rider == rider
                    && participant.status().is_active()
            })
            .cloned())
    }

    fn participants(&mut self, event: EventId) -> Result<Vec<EventParticipant>, StoreError> {
        Ok(self
            .state
            .participants
            .values()
            .filter(|participant| participant.event == event)
            .cloned()
            .collect())
    }

    fn save_participant(&mut self, participant: &EventParticipant) -> Result<(), StoreError> {
        let slot: &mut EventParticipant = self
            .state
            .participants
            .get_mut(&participant.id)
            .ok_or_else(|| missing("participant", participant.id.value()))?;
        slot.clone_from(participant);
        Ok(())
    }

    fn insert_maintenance(
        &mut self,
        record: &NewMaintenance,
    ) -> Result<MaintenanceRecord, StoreError> {
        let id: MaintenanceId = MaintenanceId::new(self.state.allocate());
        let stored: MaintenanceRecord = MaintenanceRecord {
            id,
            bicycle: record.bicycle,
            kind: record.kind,
            description: record.description.clone(),
            cost: record.cost,
            performed_by: record.performed_by.clone(),
            performed_at: record.performed_at,
            next_due_date: record.next_due_date,
            completed_at: None,
        };
        self.state.maintenance.insert(id, stored.clone());
        Ok(stored)
    }

    fn maintenance_record(
        &mut self,
        id: MaintenanceId,
    ) -> Result<Option<MaintenanceRecord>, StoreError> {
        Ok(self.state.maintenance.get(&id).cloned())
    }

    fn save_maintenance(&mut self, record: &MaintenanceRecord) -> Result<(), StoreError> {
        let slot: &mut MaintenanceRecord = self
            .state
            .maintenance
            .get_mut(&record.id)
            .ok_or_else(|| missing("maintenance record", record.id.value()))?;
        slot.clone_from(record);
        Ok(())
    }

    fn open_maintenance_for_bicycle(
        &mut self,
        bicycle: BicycleId,
    ) -> Result<Vec<MaintenanceRecord>, StoreError> {
        Ok(self
            .state
            .maintenance
            .values()
            .filter(|record| record.bicycle == bicycle && record.is_open())
            .cloned()
            .collect())
    }

    fn maintenance_due(&mut self, as_of: Date) -> Result<Vec<MaintenanceRecord>, StoreError> {
        let mut due: Vec<MaintenanceRecord> = self
            .state
            .maintenance
            .values()
            .filter(|record| record.is_due(as_of))
            .cloned()
            .collect();
        due.sort_by_key(|record| (record.next_due_date, record.id));
        Ok(due)
    }

    fn record_audit(
        &mut self,
        event: &AuditEvent,
        recorded_at: OffsetDateTime,
    ) -> Result<i64, StoreError> {
        let id: i64 = self.state.allocate();
        self.state.audit.push(AuditRecord {
            id,
            recorded_at,
            event: event.clone(),
        });
        Ok(id)
    }

    fn audit_trail(&mut self, limit: usize) -> Result<Vec<AuditRecord>, StoreError> {
        Ok(self.state.audit.iter().rev().take(limit).cloned().collect())
    }
}

fn with_counter(event: &Event, status: EventStatus, current_participants: u32) -> Event {
    Event::new(
        event.id,
        event.title.clone(),
        event.event_date,
        event.capacity,
        current_participants,
        status,
        event.created_at,
    )
}
