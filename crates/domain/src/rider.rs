// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::RiderId;
use serde::{Deserialize, Serialize};

/// A rider's declared socioeconomic bracket.
///
/// Valid tiers are 1 through 6. Lower tiers receive larger discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Lowest valid tier.
    pub const MIN: u8 = 1;
    /// Highest valid tier.
    pub const MAX: u8 = 6;

    /// Creates a tier after validating its range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTier` if `value` is outside `1..=6`.
    pub const fn new(value: u8) -> Result<Self, DomainError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(DomainError::InvalidTier(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric tier.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Tier {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered rider.
///
/// Identity resolution and credentials live outside this system; a rider
/// record only carries what pricing needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    /// Store-assigned identifier.
    pub id: RiderId,
    /// Display name.
    pub name: String,
    /// Demographic tier, if the rider declared one.
    pub tier: Option<Tier>,
}

impl Rider {
    /// Creates a rider record.
    #[must_use]
    pub const fn new(id: RiderId, name: String, tier: Option<Tier>) -> Self {
        Self { id, name, tier }
    }
}

/// Validates a rider display name.
///
/// # Errors
///
/// Returns `DomainError::InvalidRiderName` if the name is blank.
pub fn validate_rider_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidRiderName(String::from(
            "name cannot be empty",
        )));
    }
    Ok(())
}
