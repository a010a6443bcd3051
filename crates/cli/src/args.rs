// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use fleet_domain::{EventStatus, MaintenanceKind};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

#[derive(Debug, Parser)]
#[command(name = "fleet", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `SQLite` database file; created and migrated if missing.
    /// Without it the command runs against a throwaway in-memory database.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// How long to wait for another writer before giving up.
    #[arg(long, default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Keep the rollback journal instead of switching to WAL.
    #[arg(long)]
    pub no_wal: bool,

    /// Operator recorded as the actor of administrative actions.
    #[arg(long, default_value = "cli")]
    pub operator: String,

    /// Identifier of the request that caused this action.
    #[arg(long, default_value = "cli")]
    pub cause_id: String,

    /// Human-readable reason recorded in the audit trail.
    #[arg(long, default_value = "Command-line request")]
    pub reason: String,

    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register riders and change their tier
    #[command(subcommand)]
    Rider(RiderCommand),

    /// Register, retire and delete bicycles
    #[command(subcommand)]
    Bicycle(BicycleCommand),

    /// Start, return and cancel rentals
    #[command(subcommand)]
    Rental(RentalCommand),

    /// Manage events and registrations
    #[command(subcommand)]
    Event(EventCommand),

    /// Schedule and complete maintenance
    #[command(subcommand)]
    Maintenance(MaintenanceCommand),

    /// Show the most recent audit events
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum RiderCommand {
    /// Register a rider
    Register {
        #[arg(long)]
        name: String,
        /// Loyalty tier, 1 (best) to 6
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        tier: Option<u8>,
    },
    /// Set or clear a rider's tier
    Tier {
        #[arg(long)]
        rider: i64,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        tier: Option<u8>,
    },
    /// Show a rider
    Show {
        #[arg(long)]
        rider: i64,
    },
    /// List a rider's rentals, newest first
    Rentals {
        #[arg(long)]
        rider: i64,
    },
}

/// A point given as `--lat`/`--lon`; both or neither.
#[derive(Debug, Clone, Copy, ClapArgs)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum BicycleCommand {
    /// Register an available bicycle
    Register {
        #[arg(long)]
        code: String,
        /// Hourly rate in minor currency units
        #[arg(long)]
        rate: u64,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long)]
        site: Option<String>,
    },
    /// Take a bicycle out of service for good
    Retire {
        #[arg(long)]
        bicycle: i64,
    },
    /// Delete a bicycle that has no rental or maintenance history
    Delete {
        #[arg(long)]
        bicycle: i64,
    },
    /// Show a bicycle
    Show {
        #[arg(long)]
        bicycle: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum RentalCommand {
    /// Start a rental; the rider is recorded as the actor
    Start {
        #[arg(long)]
        rider: i64,
        #[arg(long)]
        bicycle: i64,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Return a bicycle and bill the rental
    Return {
        #[arg(long)]
        rental: i64,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Void an active rental without billing
    Cancel {
        #[arg(long)]
        rental: i64,
    },
    /// Show a rental
    Show {
        #[arg(long)]
        rental: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// Create a draft event
    Create {
        #[arg(long)]
        title: String,
        /// RFC 3339 date-time, e.g. 2026-05-02T09:00:00Z
        #[arg(long, value_parser = parse_timestamp)]
        date: OffsetDateTime,
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Move an event to another status
    Status {
        #[arg(long)]
        event: i64,
        /// draft, published, cancelled or completed
        #[arg(long)]
        status: EventStatus,
    },
    /// Delete an event that has no live registrations
    Delete {
        #[arg(long)]
        event: i64,
    },
    /// Register a rider for an event
    Register(RegistrationArgs),
    /// Cancel a rider's registration
    Unregister(RegistrationArgs),
    /// Mark a registered rider as attended
    Attend(RegistrationArgs),
    /// Mark a registered rider as absent
    Absent(RegistrationArgs),
    /// Show an event
    Show {
        #[arg(long)]
        event: i64,
    },
    /// List an event's registrations
    Participants {
        #[arg(long)]
        event: i64,
    },
}

#[derive(Debug, Clone, Copy, ClapArgs)]
pub struct RegistrationArgs {
    #[arg(long)]
    pub event: i64,
    #[arg(long)]
    pub rider: i64,
}

#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Open a maintenance record and take the bicycle out of service
    Schedule {
        #[arg(long)]
        bicycle: i64,
        /// inspection, repair, tire_replacement, brake_service, cleaning or other
        #[arg(long)]
        kind: MaintenanceKind,
        #[arg(long)]
        description: Option<String>,
        /// Cost in minor currency units
        #[arg(long, default_value_t = 0)]
        cost: u64,
        #[arg(long)]
        performed_by: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        next_due: Option<Date>,
    },
    /// Sign off a maintenance record
    Complete {
        #[arg(long)]
        record: i64,
    },
    /// List records due on or before a date
    Due {
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        as_of: Date,
    },
    /// List a bicycle's open records
    Open {
        #[arg(long)]
        bicycle: i64,
    },
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("invalid RFC 3339 date-time: {e}"))
}

fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date, expected YYYY-MM-DD: {e}"))
}
