// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The event capacity coordinator.
//!
//! `current_participants` on an event is a denormalised count of its
//! non-cancelled registrations. It only changes through the store's guarded
//! increment and decrement, inside the same transaction that inserted or
//! cancelled the registration. The increment refuses to pass capacity, so
//! two registrations racing for the last slot cannot both succeed.

use fleet_audit::{Actor, Cause, StateSnapshot};
use fleet_domain::{
    AttendanceStatus, DomainError, Event, EventId, EventParticipant, EventStatus, RiderId,
    validate_event_fields,
};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{CoreError, StoreError};
use crate::outcome::{audit_event, log_failure};
use crate::request::{
    ChangeEventStatus, CreateEvent, RecordAttendance, RegisterForEvent, UnregisterFromEvent,
};
use crate::snapshot;
use crate::store::{FleetStore, NewEvent, NewParticipant, UnitOfWork};

/// Creates events and manages their registrations.
pub struct EventCoordinator<'a, S: FleetStore> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: FleetStore> EventCoordinator<'a, S> {
    /// Creates a coordinator over `store`.
    #[must_use]
    pub const fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Registers a rider for an event.
    ///
    /// Checks run in this order: event exists, rider exists, event is not
    /// closed, event date is in the future, capacity, duplicate
    /// registration. On success the registration is inserted and the
    /// participant counter incremented in one transaction.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`, `RiderNotFound`
    /// - `EventClosed` if the event was cancelled or completed
    /// - `EventInPast` if the event date is not after now
    /// - `EventFull` if the event is at capacity
    /// - `AlreadyRegistered` if the rider holds a non-cancelled registration
    /// - `CoreError::Storage` if the store fails
    pub fn register(
        &self,
        request: RegisterForEvent,
        actor: Actor,
        cause: Cause,
    ) -> Result<EventParticipant, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let participant: EventParticipant = self
            .store
            .transact("register_for_event", |uow| {
                let event: Event = load_event(uow, request.event)?;
                if uow.rider(request.rider)?.is_none() {
                    return Err(DomainError::RiderNotFound(request.rider).into());
                }
                event.ensure_open_for_registration(now)?;
                if uow
                    .active_participant(request.event, request.rider)?
                    .is_some()
                {
                    return Err(already_registered(request.event, request.rider));
                }

                if !uow.increment_participants(event.id)? {
                    return Err(event_full(&event));
                }
                let participant: EventParticipant = match uow.insert_participant(
                    &NewParticipant {
                        event: event.id,
                        rider: request.rider,
                        registered_at: now,
                    },
                ) {
                    Ok(participant) => participant,
                    Err(StoreError::Conflict(_)) => {
                        return Err(already_registered(request.event, request.rider));
                    }
                    Err(err) => return Err(err.into()),
                };

                let updated: Event = load_event(uow, event.id)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "RegisterForEvent",
                        format!("Rider {} registered for event {}", request.rider, event.id),
                        snapshot::registration(&event, None),
                        snapshot::registration(&updated, Some(&participant)),
                    ),
                    now,
                )?;
                Ok(participant)
            })
            .inspect_err(|err| log_failure("register_for_event", err))?;

        info!(
            event_id = %participant.event,
            rider_id = %participant.rider,
            participant_id = %participant.id,
            "Rider registered for event"
        );
        Ok(participant)
    }

    /// Withdraws a rider's registration.
    ///
    /// The registration is kept as `cancelled` history and the participant
    /// counter is decremented, never below zero. The rider may register
    /// again afterwards.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `EventInPast` if the event date is not after now
    /// - `NotRegistered` if the rider has no non-cancelled registration
    /// - `CoreError::Storage` if the store fails
    pub fn unregister(
        &self,
        request: UnregisterFromEvent,
        actor: Actor,
        cause: Cause,
    ) -> Result<EventParticipant, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let participant: EventParticipant = self
            .store
            .transact("unregister_from_event", |uow| {
                let event: Event = load_event(uow, request.event)?;
                if !event.is_upcoming(now) {
                    return Err(DomainError::EventInPast(event.id).into());
                }
                let mut participant: EventParticipant = uow
                    .active_participant(request.event, request.rider)?
                    .ok_or(DomainError::NotRegistered {
                        event: request.event,
                        rider: request.rider,
                    })?;
                let before: StateSnapshot = snapshot::registration(&event, Some(&participant));

                participant.transition_to(AttendanceStatus::Cancelled)?;
                uow.save_participant(&participant)?;
                if !uow.decrement_participants(event.id)? {
                    warn!(
                        event_id = %event.id,
                        "Participant counter already at zero while cancelling a registration"
                    );
                }

                let updated: Event = load_event(uow, event.id)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "UnregisterFromEvent",
                        format!(
                            "Rider {} withdrew from event {}",
                            request.rider, event.id
                        ),
                        before,
                        snapshot::registration(&updated, Some(&participant)),
                    ),
                    now,
                )?;
                Ok(participant)
            })
            .inspect_err(|err| log_failure("unregister_from_event", err))?;

        info!(
            event_id = %participant.event,
            rider_id = %participant.rider,
            "Rider unregistered from event"
        );
        Ok(participant)
    }

    /// Marks a registered rider as having attended. The counter is unchanged.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `NotRegistered` if the rider has no non-cancelled registration
    /// - `CoreError::Storage` if the store fails
    pub fn mark_attendance(
        &self,
        request: RecordAttendance,
        actor: Actor,
        cause: Cause,
    ) -> Result<EventParticipant, CoreError> {
        self.record_attendance(
            request,
            AttendanceStatus::Attended,
            "mark_attendance",
            actor,
            cause,
        )
    }

    /// Marks a registered rider as absent. The counter is unchanged.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `NotRegistered` if the rider has no non-cancelled registration
    /// - `CoreError::Storage` if the store fails
    pub fn mark_absent(
        &self,
        request: RecordAttendance,
        actor: Actor,
        cause: Cause,
    ) -> Result<EventParticipant, CoreError> {
        self.record_attendance(
            request,
            AttendanceStatus::Absent,
            "mark_absent",
            actor,
            cause,
        )
    }

    fn record_attendance(
        &self,
        request: RecordAttendance,
        status: AttendanceStatus,
        label: &'static str,
        actor: Actor,
        cause: Cause,
    ) -> Result<EventParticipant, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let participant: EventParticipant = self
            .store
            .transact(label, |uow| {
                let event: Event = load_event(uow, request.event)?;
                let mut participant: EventParticipant = uow
                    .active_participant(request.event, request.rider)?
                    .ok_or(DomainError::NotRegistered {
                        event: request.event,
                        rider: request.rider,
                    })?;
                let before: StateSnapshot = snapshot::registration(&event, Some(&participant));
                participant.transition_to(status)?;
                uow.save_participant(&participant)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "RecordAttendance",
                        format!(
                            "Rider {} marked {status} at event {}",
                            request.rider, event.id
                        ),
                        before,
                        snapshot::registration(&event, Some(&participant)),
                    ),
                    now,
                )?;
                Ok(participant)
            })
            .inspect_err(|err| log_failure(label, err))?;

        info!(
            event_id = %participant.event,
            rider_id = %participant.rider,
            attendance = %participant.status(),
            "Attendance recorded"
        );
        Ok(participant)
    }

    /// Creates a `draft` event with no participants.
    ///
    /// # Errors
    ///
    /// - `InvalidEventTitle` for a blank title
    /// - `InvalidCapacity` for a zero capacity
    /// - `CoreError::Storage` if the store fails
    pub fn create_event(
        &self,
        request: CreateEvent,
        actor: Actor,
        cause: Cause,
    ) -> Result<Event, CoreError> {
        let CreateEvent {
            title,
            event_date,
            capacity,
        } = request;
        validate_event_fields(&title, capacity)
            .map_err(CoreError::DomainViolation)
            .inspect_err(|err| log_failure("create_event", err))?;
        let now: OffsetDateTime = self.clock.now();
        let new_event: NewEvent = NewEvent {
            title: title.trim().to_string(),
            event_date,
            capacity,
            created_at: now,
        };
        let event: Event = self
            .store
            .transact("create_event", |uow| {
                let event: Event = uow.insert_event(&new_event)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "CreateEvent",
                        format!("Created event {} '{}'", event.id, event.title),
                        StateSnapshot::absent(),
                        snapshot::event(&event),
                    ),
                    now,
                )?;
                Ok(event)
            })
            .inspect_err(|err| log_failure("create_event", err))?;

        info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// Moves an event through its publication lifecycle.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `InvalidStatusTransition` for a transition outside the table
    /// - `CoreError::Storage` if the store fails
    pub fn change_event_status(
        &self,
        request: ChangeEventStatus,
        actor: Actor,
        cause: Cause,
    ) -> Result<Event, CoreError> {
        let now: OffsetDateTime = self.clock.now();
        let event: Event = self
            .store
            .transact("change_event_status", |uow| {
                let mut event: Event = load_event(uow, request.event)?;
                let before: StateSnapshot = snapshot::event(&event);
                let previous: EventStatus = event.transition_to(request.status)?;
                uow.save_event_status(&event)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "ChangeEventStatus",
                        format!(
                            "Event {} moved from {previous} to {}",
                            event.id, request.status
                        ),
                        before,
                        snapshot::event(&event),
                    ),
                    now,
                )?;
                Ok(event)
            })
            .inspect_err(|err| log_failure("change_event_status", err))?;

        info!(event_id = %event.id, status = %event.status(), "Event status changed");
        Ok(event)
    }

    /// Deletes an event that nobody is registered for.
    ///
    /// Cancelled registrations are removed with it.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `EventHasParticipants` while the counter is above zero
    /// - `CoreError::Storage` if the store fails
    pub fn delete_event(&self, id: EventId, actor: Actor, cause: Cause) -> Result<(), CoreError> {
        let now: OffsetDateTime = self.clock.now();
        self.store
            .transact("delete_event", |uow| {
                let event: Event = load_event(uow, id)?;
                if event.current_participants() > 0 {
                    return Err(DomainError::EventHasParticipants {
                        event: id,
                        participants: event.current_participants(),
                    }
                    .into());
                }
                uow.delete_event(id)?;
                uow.record_audit(
                    &audit_event(
                        actor,
                        cause,
                        "DeleteEvent",
                        format!("Deleted event {id}"),
                        snapshot::event(&event),
                        StateSnapshot::absent(),
                    ),
                    now,
                )?;
                Ok(())
            })
            .inspect_err(|err| log_failure("delete_event", err))?;

        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}

fn load_event(uow: &mut dyn UnitOfWork, id: EventId) -> Result<Event, CoreError> {
    uow.event(id)?
        .ok_or_else(|| DomainError::EventNotFound(id).into())
}

fn already_registered(event: EventId, rider: RiderId) -> CoreError {
    DomainError::AlreadyRegistered { event, rider }.into()
}

fn event_full(event: &Event) -> CoreError {
    DomainError::EventFull {
        event: event.id,
        capacity: event.capacity.unwrap_or_default(),
    }
    .into()
}
