// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail types.
//!
//! Every committed coordinator operation records exactly one
//! [`AuditEvent`] in the same transaction as the state change it
//! describes. Failed or rolled-back operations leave no audit event.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use fleet_domain::RiderId;

/// Kind of entity that initiated a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// An end user acting on their own rentals or registrations.
    Rider,
    /// Staff performing administrative work.
    Operator,
    /// The system itself.
    System,
}

impl ActorKind {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rider => "rider",
            Self::Operator => "operator",
            Self::System => "system",
        }
    }

    /// Parses the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rider" => Some(Self::Rider),
            "operator" => Some(Self::Operator),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Represents the entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identifier of the actor (rider id, operator name, ...).
    pub id: String,
    /// What kind of actor this is.
    pub kind: ActorKind,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, kind: ActorKind) -> Self {
        Self { id, kind }
    }

    /// An actor for a rider acting on their own behalf.
    #[must_use]
    pub fn rider(rider: RiderId) -> Self {
        Self::new(rider.to_string(), ActorKind::Rider)
    }

    /// An actor for a named operator.
    #[must_use]
    pub fn operator(name: &str) -> Self {
        Self::new(name.to_string(), ActorKind::Operator)
    }

    /// The system actor.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), ActorKind::System)
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`StartRental`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact `key=value` rendering of the entities an action touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    /// The rendered state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Renders `key=value` pairs separated by commas.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, String)]) -> Self {
        let data: String = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>()
            .join(",");
        Self { data }
    }

    /// The snapshot of an entity that did not exist.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }
}

/// An immutable audit event representing a committed state transition.
///
/// Captures who performed the action, why, what it was, and the touched
/// state before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rider_actor_uses_rider_id() {
        let actor: Actor = Actor::rider(RiderId::new(42));

        assert_eq!(actor.id, "42");
        assert_eq!(actor.kind, ActorKind::Rider);
    }

    #[test]
    fn test_actor_kind_round_trips_through_str() {
        for kind in [ActorKind::Rider, ActorKind::Operator, ActorKind::System] {
            assert_eq!(ActorKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActorKind::parse("robot"), None);
    }

    #[test]
    fn test_snapshot_from_pairs() {
        let snapshot: StateSnapshot = StateSnapshot::from_pairs(&[
            ("bicycle", String::from("3")),
            ("status", String::from("rented")),
        ]);

        assert_eq!(snapshot.data, "bicycle=3,status=rented");
        assert_eq!(StateSnapshot::absent().data, "");
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let actor: Actor = Actor::operator("desk-1");
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Front desk"));
        let action: Action = Action::new(String::from("RegisterBicycle"), None);
        let before: StateSnapshot = StateSnapshot::absent();
        let after: StateSnapshot = StateSnapshot::new(String::from("bicycle=1"));

        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            action.clone(),
            before.clone(),
            after.clone(),
        );

        assert_eq!(event.actor, actor);
        assert_eq!(event.cause, cause);
        assert_eq!(event.action, action);
        assert_eq!(event.before, before);
        assert_eq!(event.after, after);
    }
}
