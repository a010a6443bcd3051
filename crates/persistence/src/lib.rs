// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the rental fleet.
//!
//! [`Persistence`] implements [`FleetStore`]: each coordinator operation
//! runs inside one `BEGIN IMMEDIATE` transaction, which takes the database
//! write lock up front. Two processes (or two `Persistence` values) working
//! on the same file therefore serialise their read-check-write sequences,
//! and the loser waits up to the configured busy timeout for the lock.
//!
//! The schema backs up the coordinator checks with constraints of its own:
//! partial unique indexes allow one active rental per rider and per
//! bicycle and one live registration per rider and event, and `CHECK`
//! constraints keep the participant counter within `0..=capacity`.
//!
//! ## Layout
//!
//! - `backend`: connection setup, PRAGMAs and migrations
//! - `queries` / `mutations`: Diesel DSL reads and writes per table group
//! - `data_models`: row structs and the column codecs
//! - `unit`: the [`UnitOfWork`](fleet::UnitOfWork) over an open transaction
//!
//! ## Testing
//!
//! Tests use a fresh shared-cache in-memory database per
//! [`Persistence::new_in_memory`] call, and temporary files where several
//! connections must share one database.

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
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use diesel::SqliteConnection;
use fleet::{CoreError, FleetStore, StoreError};
use tracing::{debug, info};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod unit;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

use unit::SqliteUnit;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Connection settings for a file-backed database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// How long a transaction waits for another writer before failing.
    pub busy_timeout: Duration,
    /// Whether to switch the database to write-ahead logging.
    pub wal: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}

/// A transaction body either failed in the coordinator or in Diesel.
///
/// Both roll the transaction back; only the second is a storage fault.
enum TxFailure {
    Core(CoreError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

/// Persistence adapter for the fleet.
///
/// Holds a single connection. Transactions issued through one adapter are
/// serialised by its mutex; transactions from other adapters or processes
/// are serialised by the `SQLite` write lock.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(
            &shared_memory_url,
            PersistenceConfig::default().busy_timeout,
        )?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database
    /// and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::open(path, PersistenceConfig::default())
    }

    /// Opens (creating and migrating if needed) a file-based database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(
        path: P,
        config: PersistenceConfig,
    ) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(path_str, config.busy_timeout)?;
        if config.wal {
            backend::sqlite::enable_wal_mode(&mut conn)?;
        }
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(
            path = path_str,
            busy_timeout_ms = %config.busy_timeout.as_millis(),
            wal = config.wal,
            "Opened fleet database"
        );

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FleetStore for Persistence {
    fn transact<T, F>(&self, label: &'static str, operation: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn fleet::UnitOfWork) -> Result<T, CoreError>,
    {
        debug!(transaction = label, "Beginning immediate transaction");

        let outcome: Result<T, TxFailure> = {
            let mut conn: MutexGuard<'_, SqliteConnection> = self.lock();
            conn.immediate_transaction(|conn| {
                let mut unit: SqliteUnit<'_> = SqliteUnit { conn };
                operation(&mut unit).map_err(TxFailure::Core)
            })
        };

        match outcome {
            Ok(value) => {
                debug!(transaction = label, "Committed");
                Ok(value)
            }
            Err(TxFailure::Core(err)) => {
                debug!(transaction = label, "Rolled back");
                Err(err)
            }
            Err(TxFailure::Diesel(err)) => {
                // Includes SQLITE_BUSY from BEGIN IMMEDIATE: no precondition was read yet.
                let err: StoreError = PersistenceError::from(err).into();
                Err(CoreError::Storage(err))
            }
        }
    }
}
