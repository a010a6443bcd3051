// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resource-lifecycle coordinators for the bicycle fleet.
//!
//! Each coordinator operation opens exactly one store transaction, reads
//! every precondition inside it, writes every change plus one audit event
//! inside it, and either commits all of that or nothing. Coordinators hold
//! no state of their own between calls.

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

mod clock;
mod error;
mod event;
mod fleet;
mod inventory;
mod maintenance;
pub mod memory;
mod outcome;
mod rental;
pub mod request;
mod snapshot;
mod store;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, StoreError};
pub use event::EventCoordinator;
pub use fleet::Fleet;
pub use inventory::InventoryCoordinator;
pub use maintenance::MaintenanceCoordinator;
pub use memory::MemoryStore;
pub use rental::{RentalCoordinator, RentalReceipt};
pub use store::{
    AuditRecord, FleetStore, NewBicycle, NewEvent, NewMaintenance, NewParticipant, NewPayment,
    NewRental, NewRider, UnitOfWork,
};
