// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for the bicycle fleet.
//!
//! Everything in this crate is pure: entities, their closed status
//! enumerations with explicit transition tables, and the pricing engine.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bicycle;
mod error;
mod event;
mod ids;
mod maintenance;
mod pricing;
mod rental;
mod rider;

#[cfg(test)]
mod tests;

pub use bicycle::{Bicycle, BicycleCode, BicycleStatus, Location, validate_hourly_rate};
pub use error::DomainError;
pub use event::{AttendanceStatus, Event, EventParticipant, EventStatus, validate_event_fields};
pub use ids::{BicycleId, EventId, MaintenanceId, ParticipantId, PaymentId, RentalId, RiderId};
pub use maintenance::{MaintenanceKind, MaintenanceRecord};
pub use pricing::{
    PriceQuote, billed_hours, compute_rental_price, discount_percentage, validate_rental_window,
};
pub use rental::{Payment, PaymentStatus, Rental, RentalStatus};
pub use rider::{Rider, Tier, validate_rider_name};
