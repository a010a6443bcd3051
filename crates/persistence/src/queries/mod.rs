// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `inventory`: Riders and bicycles
//! - `rentals`: Rentals and their payments
//! - `events`: Events and their participants
//! - `maintenance`: Maintenance records
//! - `audit`: The audit trail
//!
//! Every function takes the connection of the enclosing transaction and
//! converts rows into domain values before returning.

pub mod audit;
pub mod events;
pub mod inventory;
pub mod maintenance;
pub mod rentals;
