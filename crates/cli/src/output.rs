// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON rendering of command results.

use color_eyre::Result;
use fleet::AuditRecord;
use serde::Serialize;
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;

pub fn render<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Audit types carry no serde derives; they are flattened here.
pub fn audit_records(records: &[AuditRecord]) -> Result<Value> {
    records
        .iter()
        .map(|record| {
            Ok(json!({
                "id": record.id,
                "recorded_at": record.recorded_at.format(&Rfc3339)?,
                "actor": {
                    "id": record.event.actor.id,
                    "kind": record.event.actor.kind.as_str(),
                },
                "cause": {
                    "id": record.event.cause.id,
                    "description": record.event.cause.description,
                },
                "action": record.event.action.name,
                "details": record.event.action.details,
                "before": record.event.before.data,
                "after": record.event.after.data,
            }))
        })
        .collect::<Result<Vec<Value>>>()
        .map(Value::Array)
}
