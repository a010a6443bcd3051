// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coordinator inputs.
//!
//! Requests carry already-typed values. Anything that can be rejected
//! without reading state (tier range, code shape, coordinates) is rejected
//! while building the request, before a transaction is opened.

use fleet_domain::{
    BicycleCode, BicycleId, EventId, EventStatus, Location, MaintenanceId, MaintenanceKind,
    RentalId, RiderId, Tier,
};
use time::{Date, OffsetDateTime};

/// Start a rental of one bicycle for one rider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartRental {
    /// The renting rider.
    pub rider: RiderId,
    /// The requested bicycle.
    pub bicycle: BicycleId,
    /// Where the rider picked the bicycle up.
    pub start_location: Option<Location>,
}

/// Return a bicycle and bill the rental.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRental {
    /// The rental being closed.
    pub rental: RentalId,
    /// Where the bicycle was left.
    pub end_location: Option<Location>,
}

/// Void an active rental without billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelRental {
    /// The rental being voided.
    pub rental: RentalId,
}

/// Register a rider for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterForEvent {
    /// The event.
    pub event: EventId,
    /// The rider.
    pub rider: RiderId,
}

/// Withdraw a rider's registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnregisterFromEvent {
    /// The event.
    pub event: EventId,
    /// The rider.
    pub rider: RiderId,
}

/// Record whether a registered rider showed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordAttendance {
    /// The event.
    pub event: EventId,
    /// The rider.
    pub rider: RiderId,
}

/// Create a draft event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEvent {
    /// Display title.
    pub title: String,
    /// When the event takes place.
    pub event_date: OffsetDateTime,
    /// Optional capacity; zero is rejected.
    pub capacity: Option<u32>,
}

/// Move an event through its publication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEventStatus {
    /// The event.
    pub event: EventId,
    /// The requested status.
    pub status: EventStatus,
}

/// Open a maintenance record for a bicycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMaintenance {
    /// The bicycle to service.
    pub bicycle: BicycleId,
    /// Category of work.
    pub kind: MaintenanceKind,
    /// Notes.
    pub description: Option<String>,
    /// Cost in minor currency units.
    pub cost: u64,
    /// Who performs the work.
    pub performed_by: String,
    /// Next service due date.
    pub next_due_date: Option<Date>,
}

/// Sign off a maintenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteMaintenance {
    /// The record.
    pub record: MaintenanceId,
}

/// Register a rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRider {
    /// Display name.
    pub name: String,
    /// Declared tier.
    pub tier: Option<Tier>,
}

/// Change a rider's declared tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRiderTier {
    /// The rider.
    pub rider: RiderId,
    /// The new tier, or `None` to clear it.
    pub tier: Option<Tier>,
}

/// Add a bicycle to the fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterBicycle {
    /// Unique code.
    pub code: BicycleCode,
    /// Hourly rate; zero is rejected.
    pub hourly_rate: u64,
    /// Initial position.
    pub location: Option<Location>,
    /// Owning site.
    pub site: Option<String>,
}
