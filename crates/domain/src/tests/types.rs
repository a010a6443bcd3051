// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime, macros::date, macros::datetime};

use crate::{
    BicycleCode, BicycleId, DomainError, Location, MaintenanceId, MaintenanceKind,
    MaintenanceRecord, Tier, validate_event_fields, validate_hourly_rate, validate_rider_name,
};

const NOW: OffsetDateTime = datetime!(2026-05-01 12:00 UTC);

#[test]
fn test_tier_accepts_one_through_six() {
    for value in 1..=6 {
        assert_eq!(Tier::new(value).unwrap().value(), value);
    }
}

#[test]
fn test_tier_rejects_out_of_range() {
    assert_eq!(Tier::new(0), Err(DomainError::InvalidTier(0)));
    assert_eq!(Tier::new(7), Err(DomainError::InvalidTier(7)));
}

#[test]
fn test_bicycle_code_is_trimmed() {
    let code: BicycleCode = BicycleCode::new("  BK-042 ").unwrap();

    assert_eq!(code.as_str(), "BK-042");
}

#[test]
fn test_bicycle_code_rejects_bad_input() {
    assert!(BicycleCode::new("   ").is_err());
    assert!(BicycleCode::new("BK 042").is_err());
    assert!(BicycleCode::new(&"X".repeat(33)).is_err());
    assert!(BicycleCode::new(&"X".repeat(32)).is_ok());
}

#[test]
fn test_location_range_checks() {
    assert!(Location::new(37.56, 126.97).is_ok());
    assert!(Location::new(-90.0, 180.0).is_ok());
    assert!(Location::new(90.1, 0.0).is_err());
    assert!(Location::new(0.0, -180.5).is_err());
    assert!(Location::new(f64::NAN, 0.0).is_err());
}

#[test]
fn test_field_validators() {
    assert_eq!(validate_hourly_rate(0), Err(DomainError::InvalidHourlyRate(0)));
    assert!(validate_hourly_rate(1).is_ok());
    assert!(validate_rider_name(" ").is_err());
    assert!(validate_rider_name("Ana").is_ok());
    assert!(validate_event_fields("", None).is_err());
    assert_eq!(
        validate_event_fields("Night Ride", Some(0)),
        Err(DomainError::InvalidCapacity(0))
    );
    assert!(validate_event_fields("Night Ride", Some(20)).is_ok());
}

#[test]
fn test_maintenance_record_completes_once() {
    let mut record: MaintenanceRecord = MaintenanceRecord {
        id: MaintenanceId::new(1),
        bicycle: BicycleId::new(1),
        kind: MaintenanceKind::BrakeService,
        description: None,
        cost: 12_000,
        performed_by: String::from("workshop"),
        performed_at: NOW,
        next_due_date: Some(date!(2026 - 08 - 01)),
        completed_at: None,
    };

    assert!(record.is_open());
    assert!(record.complete(NOW + Duration::hours(2)));
    assert!(!record.complete(NOW + Duration::hours(3)));
    assert_eq!(record.completed_at, Some(NOW + Duration::hours(2)));
    assert!(!record.is_due(date!(2026 - 07 - 31)));
    assert!(record.is_due(date!(2026 - 08 - 01)));
}

#[test]
fn test_error_display_names_the_resource() {
    let err: DomainError = DomainError::BicycleNotAvailable {
        bicycle: BicycleId::new(4),
        status: String::from("rented"),
    };

    assert_eq!(err.to_string(), "Bicycle 4 is not available (status: rented)");
}
