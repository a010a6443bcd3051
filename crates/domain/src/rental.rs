// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rentals and the payments they produce.
//!
//! A rental starts `Active` and ends either `Completed` (returned and
//! billed) or `Cancelled` (voided, nothing billed). Both end states are
//! terminal.

use crate::bicycle::Location;
use crate::error::DomainError;
use crate::ids::{BicycleId, PaymentId, RentalId, RiderId};
use crate::pricing::PriceQuote;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Billing state of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// The rider has the bicycle.
    Active,
    /// Returned and billed.
    Completed,
    /// Voided without billing.
    Cancelled,
}

impl RentalStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks whether moving from this status to `target` is permitted.
    ///
    /// Only `Active → Completed` and `Active → Cancelled` exist.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Completed | Self::Cancelled)
        )
    }
}

impl FromStr for RentalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: "rental",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-boxed rental of one bicycle by one rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    /// Store-assigned identifier.
    pub id: RentalId,
    /// The renting rider.
    pub rider: RiderId,
    /// The rented bicycle.
    pub bicycle: BicycleId,
    /// When the rental started.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// When the rental ended; `None` while active.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    /// Where the rental started, if reported.
    pub start_location: Option<Location>,
    /// Where the rental ended, if reported.
    pub end_location: Option<Location>,
    /// Hourly rate copied from the bicycle at creation.
    pub base_rate: u64,
    /// Discount percentage; set at creation and re-evaluated on return.
    pub discount_percentage: u8,
    /// Discount granted, set on completion.
    pub discount_amount: Option<u64>,
    /// Amount charged, set on completion.
    pub total_amount: Option<u64>,
    status: RentalStatus,
}

impl Rental {
    /// Rebuilds a rental from its stored fields.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        id: RentalId,
        rider: RiderId,
        bicycle: BicycleId,
        start_time: OffsetDateTime,
        end_time: Option<OffsetDateTime>,
        start_location: Option<Location>,
        end_location: Option<Location>,
        base_rate: u64,
        discount_percentage: u8,
        discount_amount: Option<u64>,
        total_amount: Option<u64>,
        status: RentalStatus,
    ) -> Self {
        Self {
            id,
            rider,
            bicycle,
            start_time,
            end_time,
            start_location,
            end_location,
            base_rate,
            discount_percentage,
            discount_amount,
            total_amount,
            status,
        }
    }

    /// Returns the billing status.
    #[must_use]
    pub const fn status(&self) -> RentalStatus {
        self.status
    }

    /// Returns true while the rider still has the bicycle.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, RentalStatus::Active)
    }

    /// Fails unless the rental is active.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RentalNotActive` for completed or cancelled rentals.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::RentalNotActive {
                rental: self.id,
                status: self.status.as_str().to_string(),
            })
        }
    }

    /// Completes the rental with the given price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RentalNotActive` if the rental already ended.
    pub fn complete(
        &mut self,
        end_time: OffsetDateTime,
        end_location: Option<Location>,
        quote: &PriceQuote,
    ) -> Result<(), DomainError> {
        self.transition(RentalStatus::Completed)?;
        self.end_time = Some(end_time);
        self.end_location = end_location;
        self.discount_percentage = quote.discount_percentage;
        self.discount_amount = Some(quote.discount_amount);
        self.total_amount = Some(quote.total_amount);
        Ok(())
    }

    /// Cancels the rental. Nothing is billed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RentalNotActive` if the rental already ended.
    pub fn cancel(&mut self, end_time: OffsetDateTime) -> Result<(), DomainError> {
        self.transition(RentalStatus::Cancelled)?;
        self.end_time = Some(end_time);
        Ok(())
    }

    fn transition(&mut self, target: RentalStatus) -> Result<(), DomainError> {
        self.ensure_active()?;
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                entity: "rental",
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        Ok(())
    }
}

/// Settlement state of a payment entry.
///
/// Returns settle synchronously, so entries are written already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// The amount has been charged.
    Completed,
}

impl PaymentStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus {
                entity: "payment",
                value: s.to_string(),
            }),
        }
    }
}

/// A charge recorded for a completed rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Store-assigned identifier.
    pub id: PaymentId,
    /// The rental being charged.
    pub rental: RentalId,
    /// The charged rider.
    pub rider: RiderId,
    /// Amount charged, in minor currency units.
    pub amount: u64,
    /// Settlement state.
    pub status: PaymentStatus,
    /// When the entry was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
