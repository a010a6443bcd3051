// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row models and the conversions between rows and domain values.
//!
//! Timestamps are stored as RFC 3339 text normalised to UTC, dates as
//! `YYYY-MM-DD`, money as `BIGINT` minor units and statuses as their
//! snake_case names. Anything that does not parse back is a corrupt row.

use diesel::prelude::*;
use fleet_audit::{Action, Actor, ActorKind, AuditEvent, Cause, StateSnapshot};
use fleet_domain::{
    Bicycle, BicycleCode, BicycleId, Event, EventId, EventParticipant, Location, MaintenanceId,
    MaintenanceRecord, ParticipantId, Payment, PaymentId, Rental, RentalId, Rider, RiderId, Tier,
};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    audit_events, bicycles, event_participants, events, maintenance_records, payments, rentals,
    riders,
};
use crate::error::PersistenceError;

// ============================================================================
// Column codecs
// ============================================================================

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn parse_timestamp(
    table: &'static str,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::corrupt(table, format!("timestamp '{value}': {e}")))
}

fn parse_optional_timestamp(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|value| parse_timestamp(table, value)).transpose()
}

pub fn format_date(value: Date) -> Result<String, PersistenceError> {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn parse_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::corrupt(table, format!("date '{value}': {e}")))
}

pub fn money_to_column(value: u64) -> Result<i64, PersistenceError> {
    value.to_i64().ok_or_else(|| {
        PersistenceError::SerializationError(format!("amount {value} exceeds the column range"))
    })
}

fn money_from_column(table: &'static str, value: i64) -> Result<u64, PersistenceError> {
    value
        .to_u64()
        .ok_or_else(|| PersistenceError::corrupt(table, format!("negative amount {value}")))
}

fn small_from_column<T: num_traits::FromPrimitive>(
    table: &'static str,
    value: i32,
) -> Result<T, PersistenceError> {
    T::from_i32(value)
        .ok_or_else(|| PersistenceError::corrupt(table, format!("value {value} out of range")))
}

fn location_from_columns(
    table: &'static str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Location>, PersistenceError> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Location::new(latitude, longitude)
            .map(Some)
            .map_err(|e| PersistenceError::corrupt(table, e)),
        (None, None) => Ok(None),
        _ => Err(PersistenceError::corrupt(table, "half of a location is missing")),
    }
}

pub fn location_to_columns(location: Option<Location>) -> (Option<f64>, Option<f64>) {
    location.map_or((None, None), |location| {
        (Some(location.latitude()), Some(location.longitude()))
    })
}

fn parse_status<T: std::str::FromStr>(
    table: &'static str,
    value: &str,
) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::corrupt(table, e))
}

// ============================================================================
// Riders
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = riders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RiderRow {
    pub rider_id: i64,
    pub name: String,
    pub tier: Option<i32>,
}

impl RiderRow {
    pub fn into_domain(self) -> Result<Rider, PersistenceError> {
        let tier: Option<Tier> = self
            .tier
            .map(|tier| {
                small_from_column::<u8>("riders", tier).and_then(|tier| {
                    Tier::new(tier).map_err(|e| PersistenceError::corrupt("riders", e))
                })
            })
            .transpose()?;
        Ok(Rider::new(RiderId::new(self.rider_id), self.name, tier))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = riders)]
pub struct NewRiderRow<'a> {
    pub name: &'a str,
    pub tier: Option<i32>,
}

// ============================================================================
// Bicycles
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bicycles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BicycleRow {
    pub bicycle_id: i64,
    pub code: String,
    pub hourly_rate: i64,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub site: Option<String>,
    pub created_at: String,
}

impl BicycleRow {
    pub fn into_domain(self) -> Result<Bicycle, PersistenceError> {
        const TABLE: &str = "bicycles";
        Ok(Bicycle::new(
            BicycleId::new(self.bicycle_id),
            BicycleCode::new(&self.code).map_err(|e| PersistenceError::corrupt(TABLE, e))?,
            money_from_column(TABLE, self.hourly_rate)?,
            parse_status(TABLE, &self.status)?,
            location_from_columns(TABLE, self.latitude, self.longitude)?,
            self.site,
            parse_timestamp(TABLE, &self.created_at)?,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bicycles)]
pub struct NewBicycleRow<'a> {
    pub code: &'a str,
    pub hourly_rate: i64,
    pub status: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub site: Option<&'a str>,
    pub created_at: String,
}

// ============================================================================
// Rentals and payments
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RentalRow {
    pub rental_id: i64,
    pub rider_id: i64,
    pub bicycle_id: i64,
    pub start_time: String,
    pub end_time: Option<String>,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub end_latitude: Option<f64>,
    pub end_longitude: Option<f64>,
    pub base_rate: i64,
    pub discount_percentage: i32,
    pub discount_amount: Option<i64>,
    pub total_amount: Option<i64>,
    pub status: String,
}

impl RentalRow {
    pub fn into_domain(self) -> Result<Rental, PersistenceError> {
        const TABLE: &str = "rentals";
        Ok(Rental::new(
            RentalId::new(self.rental_id),
            RiderId::new(self.rider_id),
            BicycleId::new(self.bicycle_id),
            parse_timestamp(TABLE, &self.start_time)?,
            parse_optional_timestamp(TABLE, self.end_time.as_deref())?,
            location_from_columns(TABLE, self.start_latitude, self.start_longitude)?,
            location_from_columns(TABLE, self.end_latitude, self.end_longitude)?,
            money_from_column(TABLE, self.base_rate)?,
            small_from_column(TABLE, self.discount_percentage)?,
            self.discount_amount
                .map(|amount| money_from_column(TABLE, amount))
                .transpose()?,
            self.total_amount
                .map(|amount| money_from_column(TABLE, amount))
                .transpose()?,
            parse_status(TABLE, &self.status)?,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rentals)]
pub struct NewRentalRow<'a> {
    pub rider_id: i64,
    pub bicycle_id: i64,
    pub start_time: String,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub base_rate: i64,
    pub discount_percentage: i32,
    pub status: &'a str,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentRow {
    pub payment_id: i64,
    pub rental_id: i64,
    pub rider_id: i64,
    pub amount: i64,
    pub status: String,
    pub created_at: String,
}

impl PaymentRow {
    pub fn into_domain(self) -> Result<Payment, PersistenceError> {
        const TABLE: &str = "payments";
        Ok(Payment {
            id: PaymentId::new(self.payment_id),
            rental: RentalId::new(self.rental_id),
            rider: RiderId::new(self.rider_id),
            amount: money_from_column(TABLE, self.amount)?,
            status: parse_status(TABLE, &self.status)?,
            created_at: parse_timestamp(TABLE, &self.created_at)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow<'a> {
    pub rental_id: i64,
    pub rider_id: i64,
    pub amount: i64,
    pub status: &'a str,
    pub created_at: String,
}

// ============================================================================
// Events and participants
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub event_date: String,
    pub capacity: Option<i32>,
    pub current_participants: i32,
    pub status: String,
    pub created_at: String,
}

impl EventRow {
    pub fn into_domain(self) -> Result<Event, PersistenceError> {
        const TABLE: &str = "events";
        Ok(Event::new(
            EventId::new(self.event_id),
            self.title,
            parse_timestamp(TABLE, &self.event_date)?,
            self.capacity
                .map(|capacity| small_from_column(TABLE, capacity))
                .transpose()?,
            small_from_column(TABLE, self.current_participants)?,
            parse_status(TABLE, &self.status)?,
            parse_timestamp(TABLE, &self.created_at)?,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEventRow<'a> {
    pub title: &'a str,
    pub event_date: String,
    pub capacity: Option<i32>,
    pub current_participants: i32,
    pub status: &'a str,
    pub created_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = event_participants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ParticipantRow {
    pub participant_id: i64,
    pub event_id: i64,
    pub rider_id: i64,
    pub registered_at: String,
    pub attendance_status: String,
}

impl ParticipantRow {
    pub fn into_domain(self) -> Result<EventParticipant, PersistenceError> {
        const TABLE: &str = "event_participants";
        Ok(EventParticipant::new(
            ParticipantId::new(self.participant_id),
            EventId::new(self.event_id),
            RiderId::new(self.rider_id),
            parse_timestamp(TABLE, &self.registered_at)?,
            parse_status(TABLE, &self.attendance_status)?,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = event_participants)]
pub struct NewParticipantRow<'a> {
    pub event_id: i64,
    pub rider_id: i64,
    pub registered_at: String,
    pub attendance_status: &'a str,
}

// ============================================================================
// Maintenance
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = maintenance_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MaintenanceRow {
    pub maintenance_id: i64,
    pub bicycle_id: i64,
    pub kind: String,
    pub description: Option<String>,
    pub cost: i64,
    pub performed_by: String,
    pub performed_at: String,
    pub next_due_date: Option<String>,
    pub completed_at: Option<String>,
}

impl MaintenanceRow {
    pub fn into_domain(self) -> Result<MaintenanceRecord, PersistenceError> {
        const TABLE: &str = "maintenance_records";
        Ok(MaintenanceRecord {
            id: MaintenanceId::new(self.maintenance_id),
            bicycle: BicycleId::new(self.bicycle_id),
            kind: parse_status(TABLE, &self.kind)?,
            description: self.description,
            cost: money_from_column(TABLE, self.cost)?,
            performed_by: self.performed_by,
            performed_at: parse_timestamp(TABLE, &self.performed_at)?,
            next_due_date: self
                .next_due_date
                .as_deref()
                .map(|date| parse_date(TABLE, date))
                .transpose()?,
            completed_at: parse_optional_timestamp(TABLE, self.completed_at.as_deref())?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = maintenance_records)]
pub struct NewMaintenanceRow<'a> {
    pub bicycle_id: i64,
    pub kind: &'a str,
    pub description: Option<&'a str>,
    pub cost: i64,
    pub performed_by: &'a str,
    pub performed_at: String,
    pub next_due_date: Option<String>,
}

// ============================================================================
// Audit events
// ============================================================================

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditEventRow {
    pub audit_event_id: i64,
    pub action_name: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}

impl AuditEventRow {
    pub fn into_domain(self) -> Result<(i64, OffsetDateTime, AuditEvent), PersistenceError> {
        const TABLE: &str = "audit_events";
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;
        let kind: ActorKind = ActorKind::parse(&actor.actor_type).ok_or_else(|| {
            PersistenceError::corrupt(TABLE, format!("unknown actor type '{}'", actor.actor_type))
        })?;

        Ok((
            self.audit_event_id,
            parse_timestamp(TABLE, &self.recorded_at)?,
            AuditEvent::new(
                Actor::new(actor.id, kind),
                Cause::new(cause.id, cause.description),
                Action::new(action.name, action.details),
                StateSnapshot::new(before.data),
                StateSnapshot::new(after.data),
            ),
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow<'a> {
    pub action_name: &'a str,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}

impl<'a> NewAuditEventRow<'a> {
    pub fn from_event(
        event: &'a AuditEvent,
        recorded_at: OffsetDateTime,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            action_name: &event.action.name,
            actor_json: serde_json::to_string(&ActorData {
                id: event.actor.id.clone(),
                actor_type: event.actor.kind.as_str().to_string(),
            })?,
            cause_json: serde_json::to_string(&CauseData {
                id: event.cause.id.clone(),
                description: event.cause.description.clone(),
            })?,
            action_json: serde_json::to_string(&ActionData {
                name: event.action.name.clone(),
                details: event.action.details.clone(),
            })?,
            before_snapshot_json: serde_json::to_string(&StateSnapshotData {
                data: event.before.data.clone(),
            })?,
            after_snapshot_json: serde_json::to_string(&StateSnapshotData {
                data: event.after.data.clone(),
            })?,
            recorded_at: format_timestamp(recorded_at)?,
        })
    }
}
