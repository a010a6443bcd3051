// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `inventory`: Rider and bicycle inserts, updates and deletes
//! - `rentals`: Rental lifecycle writes and payment inserts
//! - `events`: Event writes, guarded participant counters, registrations
//! - `maintenance`: Maintenance record writes
//! - `audit`: Audit event persistence
//!
//! Inserts use `RETURNING` so the stored row, with its assigned id, comes
//! back in the same statement. Updates that match no row are reported as
//! [`PersistenceError::MissingRow`](crate::error::PersistenceError::MissingRow).

pub mod audit;
pub mod events;
pub mod inventory;
pub mod maintenance;
pub mod rentals;

use crate::error::PersistenceError;

/// Turns an affected-row count of zero into a missing row error.
pub(crate) const fn expect_one_row(
    affected: usize,
    table: &'static str,
    id: i64,
) -> Result<(), PersistenceError> {
    if affected == 0 {
        return Err(PersistenceError::MissingRow { table, id });
    }
    Ok(())
}
