// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;

use clap::Parser;
use serde_json::Value;

use crate::args::Args;
use crate::commands::run;

fn fleet(database: &Path, command: &[&str]) -> color_eyre::Result<Value> {
    let mut argv: Vec<&str> = vec!["fleet", "--database", database.to_str().unwrap()];
    argv.extend_from_slice(command);
    let args = Args::try_parse_from(argv).unwrap();
    Ok(serde_json::from_str(&run(&args)?)?)
}

#[test]
fn test_rental_flow_through_the_command_line() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fleet.db");

    let rider = fleet(&db, &["rider", "register", "--name", "Ada", "--tier", "1"]).unwrap();
    let bicycle = fleet(
        &db,
        &["bicycle", "register", "--code", "BK-0001", "--rate", "8000", "--site", "Central"],
    )
    .unwrap();
    let rider_id = rider["id"].as_i64().unwrap().to_string();
    let bicycle_id = bicycle["id"].as_i64().unwrap().to_string();
    assert_eq!(bicycle["status"], "available");

    let rental = fleet(
        &db,
        &["rental", "start", "--rider", &rider_id, "--bicycle", &bicycle_id],
    )
    .unwrap();
    assert_eq!(rental["discount_percentage"], 10);
    let rental_id = rental["id"].as_i64().unwrap().to_string();

    let shown = fleet(&db, &["bicycle", "show", "--bicycle", &bicycle_id]).unwrap();
    assert_eq!(shown["status"], "rented");

    let err = fleet(
        &db,
        &["rental", "start", "--rider", &rider_id, "--bicycle", &bicycle_id],
    )
    .unwrap_err();
    assert!(err.to_string().contains("already"), "unexpected error: {err}");

    let cancelled = fleet(&db, &["rental", "cancel", "--rental", &rental_id]).unwrap();
    assert_eq!(cancelled["status"], "cancelled");

    let history = fleet(&db, &["rider", "rentals", "--rider", &rider_id]).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);

    let audit = fleet(&db, &["audit", "--limit", "1"]).unwrap();
    assert_eq!(audit[0]["action"], "CancelRental");
    assert_eq!(audit[0]["actor"]["kind"], "operator");
}

#[test]
fn test_unknown_bicycle_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fleet.db");

    let result = fleet(&db, &["bicycle", "retire", "--bicycle", "99"]);

    assert!(result.is_err());
}

#[test]
fn test_in_memory_when_no_database_given() {
    let args = Args::try_parse_from(["fleet", "rider", "register", "--name", "Ada"]).unwrap();

    let rider: Value = serde_json::from_str(&run(&args).unwrap()).unwrap();

    assert_eq!(rider["name"], "Ada");
    assert_eq!(rider["tier"], Value::Null);
}
