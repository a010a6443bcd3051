// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch from parsed arguments to coordinator operations.

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use fleet::request::{
    CancelRental, ChangeEventStatus, CompleteMaintenance, CreateEvent, RecordAttendance,
    RegisterBicycle, RegisterForEvent, RegisterRider, ReturnRental, ScheduleMaintenance,
    StartRental, UnregisterFromEvent, UpdateRiderTier,
};
use fleet::{Fleet, FleetStore};
use fleet_audit::{Actor, Cause};
use fleet_domain::{
    BicycleCode, BicycleId, EventId, Location, MaintenanceId, RentalId, RiderId, Tier,
};
use fleet_persistence::{Persistence, PersistenceConfig};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::args::{
    Args, BicycleCommand, Command, EventCommand, LocationArgs, MaintenanceCommand, RegistrationArgs,
    RentalCommand, RiderCommand,
};
use crate::output::{audit_records, render};

/// Opens the database named by `args` and runs the command against it.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, an argument is
/// rejected by the domain, or the operation itself fails.
pub fn run(args: &Args) -> Result<String> {
    let persistence: Persistence = match &args.database {
        Some(path) => {
            let config: PersistenceConfig = PersistenceConfig {
                busy_timeout: args.busy_timeout(),
                wal: !args.no_wal,
            };
            info!(database = %path.display(), "Using file-based database");
            Persistence::open(path, config)
                .wrap_err_with(|| format!("opening {}", path.display()))?
        }
        None => {
            warn!("No --database given; using an in-memory database that is discarded on exit");
            Persistence::new_in_memory().wrap_err("opening in-memory database")?
        }
    };
    let fleet: Fleet<Persistence> = Fleet::with_system_clock(persistence);

    execute(&fleet, args)
}

/// Runs the command against an already constructed fleet.
///
/// # Errors
///
/// Returns an error if an argument is rejected or the operation fails.
pub fn execute<S: FleetStore>(fleet: &Fleet<S>, args: &Args) -> Result<String> {
    let operator: Actor = Actor::operator(&args.operator);
    let cause = || Cause::new(args.cause_id.clone(), args.reason.clone());
    debug!(command = ?args.command, "Dispatching");

    match &args.command {
        Command::Rider(command) => rider(fleet, command, operator, cause()),
        Command::Bicycle(command) => bicycle(fleet, command, operator, cause()),
        Command::Rental(command) => rental(fleet, command, operator, cause()),
        Command::Event(command) => event(fleet, command, operator, cause()),
        Command::Maintenance(command) => maintenance(fleet, command, operator, cause()),
        Command::Audit { limit } => render(&audit_records(&fleet.audit_trail(*limit)?)?),
    }
}

fn tier(value: Option<u8>) -> Result<Option<Tier>> {
    Ok(value.map(Tier::new).transpose()?)
}

fn location(args: LocationArgs) -> Result<Option<Location>> {
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Ok(Some(Location::new(latitude, longitude)?)),
        _ => Ok(None),
    }
}

fn rider<S: FleetStore>(
    fleet: &Fleet<S>,
    command: &RiderCommand,
    actor: Actor,
    cause: Cause,
) -> Result<String> {
    match command {
        RiderCommand::Register { name, tier: level } => render(&fleet.inventory().register_rider(
            RegisterRider {
                name: name.clone(),
                tier: tier(*level)?,
            },
            actor,
            cause,
        )?),
        RiderCommand::Tier { rider, tier: level } => {
            render(&fleet.inventory().update_rider_tier(
                UpdateRiderTier {
                    rider: RiderId::new(*rider),
                    tier: tier(*level)?,
                },
                actor,
                cause,
            )?)
        }
        RiderCommand::Show { rider } => render(&fleet.rider(RiderId::new(*rider))?),
        RiderCommand::Rentals { rider } => render(&fleet.rentals_for_rider(RiderId::new(*rider))?),
    }
}

fn bicycle<S: FleetStore>(
    fleet: &Fleet<S>,
    command: &BicycleCommand,
    actor: Actor,
    cause: Cause,
) -> Result<String> {
    match command {
        BicycleCommand::Register {
            code,
            rate,
            location: point,
            site,
        } => render(&fleet.inventory().register_bicycle(
            RegisterBicycle {
                code: BicycleCode::new(code)?,
                hourly_rate: *rate,
                location: location(*point)?,
                site: site.clone(),
            },
            actor,
            cause,
        )?),
        BicycleCommand::Retire { bicycle } => render(&fleet.inventory().retire_bicycle(
            BicycleId::new(*bicycle),
            actor,
            cause,
        )?),
        BicycleCommand::Delete { bicycle } => {
            fleet
                .inventory()
                .delete_bicycle(BicycleId::new(*bicycle), actor, cause)?;
            render(&json!({ "deleted_bicycle": bicycle }))
        }
        BicycleCommand::Show { bicycle } => render(&fleet.bicycle(BicycleId::new(*bicycle))?),
    }
}

fn rental<S: FleetStore>(
    fleet: &Fleet<S>,
    command: &RentalCommand,
    operator: Actor,
    cause: Cause,
) -> Result<String> {
    match command {
        RentalCommand::Start {
            rider,
            bicycle,
            location: point,
        } => {
            let rider: RiderId = RiderId::new(*rider);
            render(&fleet.rentals().start(
                StartRental {
                    rider,
                    bicycle: BicycleId::new(*bicycle),
                    start_location: location(*point)?,
                },
                Actor::rider(rider),
                cause,
            )?)
        }
        RentalCommand::Return {
            rental,
            location: point,
        } => render(&fleet.rentals().return_rental(
            ReturnRental {
                rental: RentalId::new(*rental),
                end_location: location(*point)?,
            },
            operator,
            cause,
        )?),
        RentalCommand::Cancel { rental } => render(&fleet.rentals().cancel(
            CancelRental {
                rental: RentalId::new(*rental),
            },
            operator,
            cause,
        )?),
        RentalCommand::Show { rental } => render(&fleet.rental(RentalId::new(*rental))?),
    }
}

fn event<S: FleetStore>(
    fleet: &Fleet<S>,
    command: &EventCommand,
    actor: Actor,
    cause: Cause,
) -> Result<String> {
    let events = fleet.events();
    match command {
        EventCommand::Create {
            title,
            date,
            capacity,
        } => render(&events.create_event(
            CreateEvent {
                title: title.clone(),
                event_date: *date,
                capacity: *capacity,
            },
            actor,
            cause,
        )?),
        EventCommand::Status { event, status } => render(&events.change_event_status(
            ChangeEventStatus {
                event: EventId::new(*event),
                status: *status,
            },
            actor,
            cause,
        )?),
        EventCommand::Delete { event } => {
            events.delete_event(EventId::new(*event), actor, cause)?;
            render(&json!({ "deleted_event": event }))
        }
        EventCommand::Register(RegistrationArgs { event, rider }) => render(&events.register(
            RegisterForEvent {
                event: EventId::new(*event),
                rider: RiderId::new(*rider),
            },
            actor,
            cause,
        )?),
        EventCommand::Unregister(RegistrationArgs { event, rider }) => {
            render(&events.unregister(
                UnregisterFromEvent {
                    event: EventId::new(*event),
                    rider: RiderId::new(*rider),
                },
                actor,
                cause,
            )?)
        }
        EventCommand::Attend(registration) => render(&events.mark_attendance(
            attendance(*registration),
            actor,
            cause,
        )?),
        EventCommand::Absent(registration) => render(&events.mark_absent(
            attendance(*registration),
            actor,
            cause,
        )?),
        EventCommand::Show { event } => render(&fleet.event(EventId::new(*event))?),
        EventCommand::Participants { event } => {
            render(&fleet.participants(EventId::new(*event))?)
        }
    }
}

const fn attendance(registration: RegistrationArgs) -> RecordAttendance {
    RecordAttendance {
        event: EventId::new(registration.event),
        rider: RiderId::new(registration.rider),
    }
}

fn maintenance<S: FleetStore>(
    fleet: &Fleet<S>,
    command: &MaintenanceCommand,
    actor: Actor,
    cause: Cause,
) -> Result<String> {
    match command {
        MaintenanceCommand::Schedule {
            bicycle,
            kind,
            description,
            cost,
            performed_by,
            next_due,
        } => render(&fleet.maintenance().schedule(
            ScheduleMaintenance {
                bicycle: BicycleId::new(*bicycle),
                kind: *kind,
                description: description.clone(),
                cost: *cost,
                performed_by: performed_by.clone(),
                next_due_date: *next_due,
            },
            actor,
            cause,
        )?),
        MaintenanceCommand::Complete { record } => render(&fleet.maintenance().complete(
            CompleteMaintenance {
                record: MaintenanceId::new(*record),
            },
            actor,
            cause,
        )?),
        MaintenanceCommand::Due { as_of } => render(&fleet.due_maintenance(*as_of)?),
        MaintenanceCommand::Open { bicycle } => {
            render(&fleet.open_maintenance(BicycleId::new(*bicycle))?)
        }
    }
}
