// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bicycles and their custody lifecycle.
//!
//! A bicycle's status is the single source of truth for whether it may be
//! rented. Status changes are only possible through
//! [`Bicycle::transition_to`], which rejects any transition not listed in
//! [`BicycleStatus::can_transition_to`].

use crate::error::DomainError;
use crate::ids::BicycleId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Custody state of a bicycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BicycleStatus {
    /// Parked and free to rent.
    #[default]
    Available,
    /// Referenced by exactly one active rental.
    Rented,
    /// Out of service while maintenance is open.
    Maintenance,
    /// Permanently withdrawn from the fleet.
    Retired,
}

impl BicycleStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }

    /// Checks whether moving from this status to `target` is permitted.
    ///
    /// Valid transitions are:
    /// - Available → Rented (start rental)
    /// - Rented → Available (return or cancel rental)
    /// - Available → Maintenance (schedule maintenance)
    /// - Maintenance → Available (complete maintenance)
    /// - Available | Maintenance → Retired
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Available, Self::Rented | Self::Maintenance | Self::Retired)
                | (Self::Rented | Self::Maintenance, Self::Available)
                | (Self::Maintenance, Self::Retired)
        )
    }

    /// Validates a transition, producing a typed error when it is not permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for any transition not
    /// listed in [`Self::can_transition_to`].
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: "bicycle",
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl FromStr for BicycleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(DomainError::InvalidStatus {
                entity: "bicycle",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BicycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique human-readable bicycle code (e.g. `"BK-0042"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BicycleCode(String);

impl BicycleCode {
    /// Maximum accepted code length.
    pub const MAX_LEN: usize = 32;

    /// Creates a bicycle code after validation.
    ///
    /// Codes are trimmed and must be non-empty, at most 32 characters and
    /// consist of ASCII letters, digits, `-` or `_`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBicycleCode` when validation fails.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let trimmed: &str = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidBicycleCode(String::from(
                "code cannot be empty",
            )));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidBicycleCode(format!(
                "code '{trimmed}' exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidBicycleCode(format!(
                "code '{trimmed}' contains invalid characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BicycleCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<BicycleCode> for String {
    fn from(code: BicycleCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for BicycleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location after range-checking both coordinates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` when either coordinate is not
    /// finite or is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid: bool = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(DomainError::InvalidLocation {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A physical bicycle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bicycle {
    /// Store-assigned identifier.
    pub id: BicycleId,
    /// Unique human-readable code.
    pub code: BicycleCode,
    /// Base rate per started hour, in minor currency units.
    pub hourly_rate: u64,
    /// Last known position.
    pub location: Option<Location>,
    /// Owning site reference.
    pub site: Option<String>,
    /// When the bicycle was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    status: BicycleStatus,
}

impl Bicycle {
    /// Rebuilds a bicycle from its stored fields.
    #[must_use]
    pub const fn new(
        id: BicycleId,
        code: BicycleCode,
        hourly_rate: u64,
        status: BicycleStatus,
        location: Option<Location>,
        site: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            code,
            hourly_rate,
            location,
            site,
            created_at,
            status,
        }
    }

    /// Returns the current custody status.
    #[must_use]
    pub const fn status(&self) -> BicycleStatus {
        self.status
    }

    /// Returns true if the bicycle may be rented right now.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.status, BicycleStatus::Available)
    }

    /// Moves the bicycle to `target`, returning the previous status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not permitted. The bicycle is left unchanged on error.
    pub fn transition_to(&mut self, target: BicycleStatus) -> Result<BicycleStatus, DomainError> {
        self.status.validate_transition(target)?;
        let previous: BicycleStatus = self.status;
        self.status = target;
        Ok(previous)
    }
}

/// Validates an hourly rate.
///
/// # Errors
///
/// Returns `DomainError::InvalidHourlyRate` for a zero rate.
pub const fn validate_hourly_rate(rate: u64) -> Result<(), DomainError> {
    if rate == 0 {
        return Err(DomainError::InvalidHourlyRate(rate));
    }
    Ok(())
}
