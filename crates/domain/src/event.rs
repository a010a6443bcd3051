// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity-limited group events and their registrations.

use crate::error::DomainError;
use crate::ids::{EventId, ParticipantId, RiderId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Publication state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being prepared by an administrator.
    #[default]
    Draft,
    /// Announced to riders.
    Published,
    /// Called off.
    Cancelled,
    /// Took place.
    Completed,
}

impl EventStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Checks whether moving from this status to `target` is permitted.
    ///
    /// Valid transitions are:
    /// - Draft → Published
    /// - Draft | Published → Cancelled
    /// - Published → Completed
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published)
                | (Self::Draft | Self::Published, Self::Cancelled)
                | (Self::Published, Self::Completed)
        )
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus {
                entity: "event",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled group event with optional capacity.
///
/// `current_participants` is a denormalized count of non-cancelled
/// registrations. It is only ever changed by the store's guarded
/// increment/decrement inside the transaction that validated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// When the event takes place.
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    /// Upper bound on simultaneous registrations, if any.
    pub capacity: Option<u32>,
    /// When the event was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    current_participants: u32,
    status: EventStatus,
}

impl Event {
    /// Rebuilds an event from its stored fields.
    #[must_use]
    pub const fn new(
        id: EventId,
        title: String,
        event_date: OffsetDateTime,
        capacity: Option<u32>,
        current_participants: u32,
        status: EventStatus,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            title,
            event_date,
            capacity,
            created_at,
            current_participants,
            status,
        }
    }

    /// Returns the publication status.
    #[must_use]
    pub const fn status(&self) -> EventStatus {
        self.status
    }

    /// Returns the number of registered participants.
    #[must_use]
    pub const fn current_participants(&self) -> u32 {
        self.current_participants
    }

    /// Returns true when a capacity is set and has been reached.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        match self.capacity {
            Some(capacity) => self.current_participants >= capacity,
            None => false,
        }
    }

    /// Returns true if the event date is strictly after `now`.
    #[must_use]
    pub fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        self.event_date > now
    }

    /// Moves the event to `target`, returning the previous status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not permitted.
    pub fn transition_to(&mut self, target: EventStatus) -> Result<EventStatus, DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                entity: "event",
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        let previous: EventStatus = self.status;
        self.status = target;
        Ok(previous)
    }

    /// Checks every registration precondition that depends on the event alone.
    ///
    /// Order: closed status, then date, then capacity.
    ///
    /// # Errors
    ///
    /// Returns `EventClosed`, `EventInPast` or `EventFull`.
    pub fn ensure_open_for_registration(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::EventClosed {
                event: self.id,
                status: self.status.as_str().to_string(),
            });
        }
        if !self.is_upcoming(now) {
            return Err(DomainError::EventInPast(self.id));
        }
        match self.capacity {
            Some(capacity) if self.current_participants >= capacity => {
                Err(DomainError::EventFull {
                    event: self.id,
                    capacity,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Validates event creation fields.
///
/// # Errors
///
/// Returns `InvalidEventTitle` for a blank title or `InvalidCapacity` for a
/// zero capacity.
pub fn validate_event_fields(title: &str, capacity: Option<u32>) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidEventTitle(String::from(
            "title cannot be empty",
        )));
    }
    if capacity == Some(0) {
        return Err(DomainError::InvalidCapacity(0));
    }
    Ok(())
}

/// Attendance state of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Signed up, event not yet recorded.
    #[default]
    Registered,
    /// Showed up.
    Attended,
    /// Did not show up.
    Absent,
    /// Withdrew before the event.
    Cancelled,
}

impl AttendanceStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Attended => "attended",
            Self::Absent => "absent",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true for registrations that hold a slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Checks whether moving from this status to `target` is permitted.
    ///
    /// Valid transitions are:
    /// - Registered → Attended | Absent | Cancelled
    /// - Attended ↔ Absent (corrections)
    /// - Attended | Absent → Cancelled (withdrawal before the event)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Registered, Self::Attended | Self::Absent | Self::Cancelled)
                | (Self::Attended, Self::Absent | Self::Cancelled)
                | (Self::Absent, Self::Attended | Self::Cancelled)
        )
    }
}

impl FromStr for AttendanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "attended" => Ok(Self::Attended),
            "absent" => Ok(Self::Absent),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: "attendance",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rider's registration for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParticipant {
    /// Store-assigned identifier.
    pub id: ParticipantId,
    /// The event.
    pub event: EventId,
    /// The registered rider.
    pub rider: RiderId,
    /// When the registration was made.
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    status: AttendanceStatus,
}

impl EventParticipant {
    /// Rebuilds a registration from its stored fields.
    #[must_use]
    pub const fn new(
        id: ParticipantId,
        event: EventId,
        rider: RiderId,
        registered_at: OffsetDateTime,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            id,
            event,
            rider,
            registered_at,
            status,
        }
    }

    /// Returns the attendance status.
    #[must_use]
    pub const fn status(&self) -> AttendanceStatus {
        self.status
    }

    /// Moves the registration to `target`, returning the previous status.
    ///
    /// Requesting the status the registration already has is accepted and
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not permitted.
    pub fn transition_to(
        &mut self,
        target: AttendanceStatus,
    ) -> Result<AttendanceStatus, DomainError> {
        let previous: AttendanceStatus = self.status;
        if previous == target {
            return Ok(previous);
        }
        if !previous.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                entity: "attendance",
                from: previous.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        Ok(previous)
    }
}
