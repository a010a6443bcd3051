// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use fleet::request::{ChangeEventStatus, CreateEvent, RegisterBicycle, RegisterRider};
use fleet::{CoreError, FixedClock, Fleet};
use fleet_audit::{Actor, Cause};
use fleet_domain::{Bicycle, BicycleCode, DomainError, Event, EventStatus, Rider, Tier};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::Persistence;

pub fn create_test_actor() -> Actor {
    Actor::operator("ops-123")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 09:00 UTC)
}

pub fn domain_error(err: CoreError) -> DomainError {
    match err {
        CoreError::DomainViolation(err) => err,
        CoreError::Storage(err) => panic!("expected a domain violation, got storage error: {err}"),
    }
}

pub struct TestFleet {
    pub fleet: Fleet<Persistence>,
    pub clock: Arc<FixedClock>,
}

pub fn create_test_fleet() -> TestFleet {
    fleet_over(Persistence::new_in_memory().unwrap())
}

pub fn fleet_over(persistence: Persistence) -> TestFleet {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let fleet: Fleet<Persistence> = Fleet::new(persistence, Box::new(Arc::clone(&clock)));
    TestFleet { fleet, clock }
}

impl TestFleet {
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn rider(&self, name: &str, tier: Option<u8>) -> Rider {
        self.fleet
            .inventory()
            .register_rider(
                RegisterRider {
                    name: name.to_string(),
                    tier: tier.map(|tier| Tier::new(tier).unwrap()),
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap()
    }

    pub fn bicycle(&self, code: &str, hourly_rate: u64) -> Bicycle {
        self.fleet
            .inventory()
            .register_bicycle(
                RegisterBicycle {
                    code: BicycleCode::new(code).unwrap(),
                    hourly_rate,
                    location: None,
                    site: Some(String::from("Central")),
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap()
    }

    pub fn event(&self, capacity: Option<u32>, days_ahead: i64) -> Event {
        let event: Event = self
            .fleet
            .events()
            .create_event(
                CreateEvent {
                    title: String::from("Saturday group ride"),
                    event_date: test_now() + Duration::days(days_ahead),
                    capacity,
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap();
        self.fleet
            .events()
            .change_event_status(
                ChangeEventStatus {
                    event: event.id,
                    status: EventStatus::Published,
                },
                create_test_actor(),
                create_test_cause(),
            )
            .unwrap()
    }
}
