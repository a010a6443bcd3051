// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Logs a failed operation. Rule violations are expected traffic; store
/// failures are not.
pub fn log_failure(operation: &'static str, err: &CoreError) {
    match err {
        CoreError::DomainViolation(violation) => {
            debug!(operation, error = %violation, "Operation rejected");
        }
        CoreError::Storage(failure) => {
            warn!(operation, error = %failure, "Operation aborted by store");
        }
    }
}

/// Builds the audit event for a committed operation.
pub fn audit_event(
    actor: Actor,
    cause: Cause,
    name: &str,
    details: String,
    before: StateSnapshot,
    after: StateSnapshot,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        cause,
        Action::new(name.to_string(), Some(details)),
        before,
        after,
    )
}
