// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ids::{BicycleId, EventId, MaintenanceId, RentalId, RiderId};

/// Errors that can occur during domain validation and state transitions.
///
/// Every variant is a business-rule failure. Infrastructure failures never
/// appear here; they are reported by the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The rider already holds an active rental.
    RiderAlreadyRenting {
        /// The rider attempting to start a second rental.
        rider: RiderId,
        /// The rental the rider currently holds.
        active_rental: RentalId,
    },
    /// The referenced rider does not exist.
    RiderNotFound(RiderId),
    /// The referenced bicycle does not exist.
    BicycleNotFound(BicycleId),
    /// The bicycle is not in a rentable state.
    BicycleNotAvailable {
        /// The bicycle that was requested.
        bicycle: BicycleId,
        /// The status observed inside the transaction.
        status: String,
    },
    /// The bicycle is currently rented and cannot be modified.
    BicycleInUse(BicycleId),
    /// The bicycle still has rental or maintenance history referencing it.
    BicycleReferenced(BicycleId),
    /// A bicycle with the same code already exists.
    DuplicateBicycleCode(String),
    /// The bicycle code is empty or malformed.
    InvalidBicycleCode(String),
    /// The hourly rate must be greater than zero.
    InvalidHourlyRate(u64),
    /// Coordinates are outside the valid latitude/longitude range.
    InvalidLocation {
        /// The rejected latitude.
        latitude: String,
        /// The rejected longitude.
        longitude: String,
    },
    /// The referenced rental does not exist.
    RentalNotFound(RentalId),
    /// The rental is no longer active.
    RentalNotActive {
        /// The rental that was targeted.
        rental: RentalId,
        /// The status observed inside the transaction.
        status: String,
    },
    /// The rental window is empty, inverted, or starts in the future.
    InvalidRentalWindow {
        /// Description of the violation.
        reason: String,
    },
    /// A monetary computation exceeded the representable range.
    AmountOverflow {
        /// Description of the computation that overflowed.
        operation: String,
    },
    /// Demographic tier outside 1..=6.
    InvalidTier(u8),
    /// The referenced event does not exist.
    EventNotFound(EventId),
    /// The event date is not strictly in the future.
    EventInPast(EventId),
    /// The event has reached its capacity.
    EventFull {
        /// The event that was targeted.
        event: EventId,
        /// The configured capacity.
        capacity: u32,
    },
    /// The event is cancelled or completed and accepts no registrations.
    EventClosed {
        /// The event that was targeted.
        event: EventId,
        /// The status observed inside the transaction.
        status: String,
    },
    /// The event still has registered participants.
    EventHasParticipants {
        /// The event that was targeted.
        event: EventId,
        /// Number of registered participants.
        participants: u32,
    },
    /// Event capacity must be greater than zero when set.
    InvalidCapacity(u32),
    /// Event title is empty.
    InvalidEventTitle(String),
    /// The rider already holds a non-cancelled registration for the event.
    AlreadyRegistered {
        /// The event.
        event: EventId,
        /// The rider.
        rider: RiderId,
    },
    /// The rider holds no non-cancelled registration for the event.
    NotRegistered {
        /// The event.
        event: EventId,
        /// The rider.
        rider: RiderId,
    },
    /// The referenced maintenance record does not exist.
    MaintenanceRecordNotFound(MaintenanceId),
    /// Rider name is empty.
    InvalidRiderName(String),
    /// A status string could not be parsed.
    InvalidStatus {
        /// The entity family the status belongs to.
        entity: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The requested status transition is not permitted.
    InvalidStatusTransition {
        /// The entity family the status belongs to.
        entity: &'static str,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RiderAlreadyRenting {
                rider,
                active_rental,
            } => {
                write!(
                    f,
                    "Rider {rider} already has active rental {active_rental}"
                )
            }
            Self::RiderNotFound(rider) => write!(f, "Rider {rider} not found"),
            Self::BicycleNotFound(bicycle) => write!(f, "Bicycle {bicycle} not found"),
            Self::BicycleNotAvailable { bicycle, status } => {
                write!(f, "Bicycle {bicycle} is not available (status: {status})")
            }
            Self::BicycleInUse(bicycle) => write!(f, "Bicycle {bicycle} is currently rented"),
            Self::BicycleReferenced(bicycle) => {
                write!(
                    f,
                    "Bicycle {bicycle} cannot be deleted: \
                     referenced by rental or maintenance history"
                )
            }
            Self::DuplicateBicycleCode(code) => {
                write!(f, "Bicycle with code '{code}' already exists")
            }
            Self::InvalidBicycleCode(msg) => write!(f, "Invalid bicycle code: {msg}"),
            Self::InvalidHourlyRate(rate) => {
                write!(f, "Invalid hourly rate: {rate}. Must be greater than 0")
            }
            Self::InvalidLocation {
                latitude,
                longitude,
            } => {
                write!(f, "Invalid location: ({latitude}, {longitude})")
            }
            Self::RentalNotFound(rental) => write!(f, "Rental {rental} not found"),
            Self::RentalNotActive { rental, status } => {
                write!(f, "Rental {rental} is not active (status: {status})")
            }
            Self::InvalidRentalWindow { reason } => write!(f, "Invalid rental window: {reason}"),
            Self::AmountOverflow { operation } => {
                write!(f, "Amount overflow while {operation}")
            }
            Self::InvalidTier(tier) => {
                write!(f, "Invalid tier: {tier}. Must be between 1 and 6")
            }
            Self::EventNotFound(event) => write!(f, "Event {event} not found"),
            Self::EventInPast(event) => write!(f, "Event {event} is not in the future"),
            Self::EventFull { event, capacity } => {
                write!(f, "Event {event} is full (capacity: {capacity})")
            }
            Self::EventClosed { event, status } => {
                write!(
                    f,
                    "Event {event} does not accept registrations (status: {status})"
                )
            }
            Self::EventHasParticipants {
                event,
                participants,
            } => {
                write!(
                    f,
                    "Event {event} cannot be deleted: {participants} participant(s) registered"
                )
            }
            Self::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {capacity}. Must be greater than 0")
            }
            Self::InvalidEventTitle(msg) => write!(f, "Invalid event title: {msg}"),
            Self::AlreadyRegistered { event, rider } => {
                write!(f, "Rider {rider} is already registered for event {event}")
            }
            Self::NotRegistered { event, rider } => {
                write!(f, "Rider {rider} is not registered for event {event}")
            }
            Self::MaintenanceRecordNotFound(record) => {
                write!(f, "Maintenance record {record} not found")
            }
            Self::InvalidRiderName(msg) => write!(f, "Invalid rider name: {msg}"),
            Self::InvalidStatus { entity, value } => {
                write!(f, "Invalid {entity} status: '{value}'")
            }
            Self::InvalidStatusTransition { entity, from, to } => {
                write!(f, "Invalid {entity} status transition: {from} -> {to}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
