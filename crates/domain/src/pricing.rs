// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental pricing.
//!
//! Pure functions only. Elapsed time is billed per started hour and a
//! tier-based percentage discount is subtracted from the subtotal.
//!
//! | Tier | Discount |
//! |------|----------|
//! | 1–2  | 10%      |
//! | 3–4  | 5%       |
//! | 5–6 or none | 0% |

use crate::error::DomainError;
use crate::rider::Tier;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const NANOS_PER_HOUR: i128 = 3_600 * 1_000_000_000;

/// The outcome of pricing one rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Elapsed hours, rounded up.
    pub billed_hours: u64,
    /// `billed_hours × hourly_rate`.
    pub subtotal: u64,
    /// Discount percentage applied.
    pub discount_percentage: u8,
    /// `subtotal × discount_percentage / 100`, rounded down.
    pub discount_amount: u64,
    /// `subtotal − discount_amount`.
    pub total_amount: u64,
}

/// Returns the discount percentage for a rider's tier.
#[must_use]
pub const fn discount_percentage(tier: Option<Tier>) -> u8 {
    match tier {
        Some(tier) => match tier.value() {
            1 | 2 => 10,
            3 | 4 => 5,
            _ => 0,
        },
        None => 0,
    }
}

/// Returns the number of started hours between `start` and `end`.
///
/// Any positive elapsed time bills at least one hour.
///
/// # Errors
///
/// Returns `DomainError::InvalidRentalWindow` if `end` is not after `start`.
pub fn billed_hours(start: OffsetDateTime, end: OffsetDateTime) -> Result<u64, DomainError> {
    let elapsed: i128 = (end - start).whole_nanoseconds();
    if elapsed <= 0 {
        return Err(DomainError::InvalidRentalWindow {
            reason: format!("end {end} is not after start {start}"),
        });
    }
    let hours: i128 = (elapsed + NANOS_PER_HOUR - 1) / NANOS_PER_HOUR;
    u64::try_from(hours).map_err(|_| DomainError::AmountOverflow {
        operation: String::from("counting billed hours"),
    })
}

/// Validates a rental window against the evaluation clock.
///
/// # Errors
///
/// Returns `DomainError::InvalidRentalWindow` if `end <= start` or if
/// `start` is after `now`.
pub fn validate_rental_window(
    start: OffsetDateTime,
    end: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if end <= start {
        return Err(DomainError::InvalidRentalWindow {
            reason: format!("end {end} is not after start {start}"),
        });
    }
    if start > now {
        return Err(DomainError::InvalidRentalWindow {
            reason: format!("start {start} is in the future"),
        });
    }
    Ok(())
}

/// Computes the price of a rental.
///
/// # Errors
///
/// Returns `DomainError::InvalidRentalWindow` if `end` is not after `start`,
/// or `DomainError::AmountOverflow` if the subtotal does not fit in `u64`.
pub fn compute_rental_price(
    start: OffsetDateTime,
    end: OffsetDateTime,
    hourly_rate: u64,
    tier: Option<Tier>,
) -> Result<PriceQuote, DomainError> {
    let billed_hours: u64 = billed_hours(start, end)?;
    let subtotal: u64 =
        billed_hours
            .checked_mul(hourly_rate)
            .ok_or_else(|| DomainError::AmountOverflow {
                operation: format!("multiplying {billed_hours} hours by rate {hourly_rate}"),
            })?;
    let discount_percentage: u8 = discount_percentage(tier);
    // Widened so the multiplication cannot overflow; the quotient never
    // exceeds `subtotal`.
    let discount_amount: u64 =
        u64::try_from(u128::from(subtotal) * u128::from(discount_percentage) / 100).map_err(
            |_| DomainError::AmountOverflow {
                operation: String::from("computing discount"),
            },
        )?;

    Ok(PriceQuote {
        billed_hours,
        subtotal,
        discount_percentage,
        discount_amount,
        total_amount: subtotal - discount_amount,
    })
}
