// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed row identifiers.
//!
//! Identifiers are assigned by the store. Wrapping them keeps a rental id
//! from being passed where a bicycle id is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw store identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Identifies a rider.
    RiderId
}

entity_id! {
    /// Identifies a bicycle.
    BicycleId
}

entity_id! {
    /// Identifies a rental.
    RentalId
}

entity_id! {
    /// Identifies a payment entry.
    PaymentId
}

entity_id! {
    /// Identifies an event.
    EventId
}

entity_id! {
    /// Identifies an event registration.
    ParticipantId
}

entity_id! {
    /// Identifies a maintenance record.
    MaintenanceId
}
