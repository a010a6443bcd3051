// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance records.

use crate::error::DomainError;
use crate::ids::{BicycleId, MaintenanceId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Category of maintenance work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    /// Routine safety inspection.
    Inspection,
    /// Repair of a reported fault.
    Repair,
    /// Tire or tube replacement.
    TireReplacement,
    /// Brake adjustment or pad replacement.
    BrakeService,
    /// Cleaning.
    Cleaning,
    /// Anything else.
    Other,
}

impl MaintenanceKind {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inspection => "inspection",
            Self::Repair => "repair",
            Self::TireReplacement => "tire_replacement",
            Self::BrakeService => "brake_service",
            Self::Cleaning => "cleaning",
            Self::Other => "other",
        }
    }
}

impl FromStr for MaintenanceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inspection" => Ok(Self::Inspection),
            "repair" => Ok(Self::Repair),
            "tire_replacement" => Ok(Self::TireReplacement),
            "brake_service" => Ok(Self::BrakeService),
            "cleaning" => Ok(Self::Cleaning),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidStatus {
                entity: "maintenance kind",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of maintenance work on one bicycle.
///
/// A record is open until `completed_at` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Store-assigned identifier.
    pub id: MaintenanceId,
    /// The serviced bicycle.
    pub bicycle: BicycleId,
    /// Category of work.
    pub kind: MaintenanceKind,
    /// Free-form notes.
    pub description: Option<String>,
    /// Cost in minor currency units.
    pub cost: u64,
    /// Who performed or will perform the work.
    pub performed_by: String,
    /// When the work was scheduled or performed.
    #[serde(with = "time::serde::rfc3339")]
    pub performed_at: OffsetDateTime,
    /// When the next service of this kind is due.
    pub next_due_date: Option<Date>,
    /// When the work was signed off.
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl MaintenanceRecord {
    /// Returns true while the work has not been signed off.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Returns true if the next service is due on or before `as_of`.
    #[must_use]
    pub fn is_due(&self, as_of: Date) -> bool {
        self.next_due_date.is_some_and(|due| due <= as_of)
    }

    /// Signs the record off at `at`.
    ///
    /// Returns false, leaving the record untouched, if it was already
    /// completed.
    pub fn complete(&mut self, at: OffsetDateTime) -> bool {
        if self.completed_at.is_some() {
            return false;
        }
        self.completed_at = Some(at);
        true
    }
}
