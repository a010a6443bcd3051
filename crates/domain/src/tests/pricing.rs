// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime, macros::datetime};

use crate::{
    DomainError, PriceQuote, Tier, billed_hours, compute_rental_price, discount_percentage,
    validate_rental_window,
};

const START: OffsetDateTime = datetime!(2026-05-01 09:00 UTC);

fn tier(value: u8) -> Option<Tier> {
    Some(Tier::new(value).unwrap())
}

#[test]
fn test_discount_percentage_by_tier() {
    assert_eq!(discount_percentage(tier(1)), 10);
    assert_eq!(discount_percentage(tier(2)), 10);
    assert_eq!(discount_percentage(tier(3)), 5);
    assert_eq!(discount_percentage(tier(4)), 5);
    assert_eq!(discount_percentage(tier(5)), 0);
    assert_eq!(discount_percentage(tier(6)), 0);
    assert_eq!(discount_percentage(None), 0);
}

#[test]
fn test_ninety_minutes_without_tier_bills_two_hours() {
    let quote: PriceQuote =
        compute_rental_price(START, START + Duration::minutes(90), 5000, None).unwrap();

    assert_eq!(
        quote,
        PriceQuote {
            billed_hours: 2,
            subtotal: 10_000,
            discount_percentage: 0,
            discount_amount: 0,
            total_amount: 10_000,
        }
    );
}

#[test]
fn test_tier_one_exact_hour_gets_ten_percent() {
    let quote: PriceQuote =
        compute_rental_price(START, START + Duration::hours(1), 8000, tier(1)).unwrap();

    assert_eq!(quote.billed_hours, 1);
    assert_eq!(quote.subtotal, 8000);
    assert_eq!(quote.discount_percentage, 10);
    assert_eq!(quote.discount_amount, 800);
    assert_eq!(quote.total_amount, 7200);
}

#[test]
fn test_one_second_bills_one_hour() {
    assert_eq!(billed_hours(START, START + Duration::seconds(1)).unwrap(), 1);
    assert_eq!(
        billed_hours(START, START + Duration::nanoseconds(1)).unwrap(),
        1
    );
}

#[test]
fn test_hour_boundary_rounds_up_only_past_the_hour() {
    assert_eq!(billed_hours(START, START + Duration::hours(3)).unwrap(), 3);
    assert_eq!(
        billed_hours(START, START + Duration::hours(3) + Duration::seconds(1)).unwrap(),
        4
    );
}

#[test]
fn test_zero_or_negative_elapsed_is_rejected() {
    assert!(matches!(
        billed_hours(START, START),
        Err(DomainError::InvalidRentalWindow { .. })
    ));
    assert!(matches!(
        compute_rental_price(START, START - Duration::minutes(5), 1000, None),
        Err(DomainError::InvalidRentalWindow { .. })
    ));
}

#[test]
fn test_subtotal_is_monotonic_in_elapsed_time() {
    let mut previous: u64 = 0;
    for minutes in (1..=600).step_by(7) {
        let quote: PriceQuote =
            compute_rental_price(START, START + Duration::minutes(minutes), 1500, tier(3))
                .unwrap();
        assert!(quote.subtotal >= previous, "subtotal dropped at {minutes} min");
        assert!(quote.total_amount <= quote.subtotal);
        previous = quote.subtotal;
    }
}

#[test]
fn test_discount_rounds_down() {
    // 3 hours at 333 = 999; 5% = 49.95
    let quote: PriceQuote =
        compute_rental_price(START, START + Duration::minutes(150), 333, tier(4)).unwrap();

    assert_eq!(quote.subtotal, 999);
    assert_eq!(quote.discount_amount, 49);
    assert_eq!(quote.total_amount, 950);
}

#[test]
fn test_subtotal_overflow_is_reported() {
    let result = compute_rental_price(START, START + Duration::hours(2), u64::MAX, None);

    assert!(matches!(result, Err(DomainError::AmountOverflow { .. })));
}

#[test]
fn test_validate_rental_window() {
    let now: OffsetDateTime = START + Duration::hours(2);

    assert!(validate_rental_window(START, now, now).is_ok());
    assert!(matches!(
        validate_rental_window(now, START, now),
        Err(DomainError::InvalidRentalWindow { .. })
    ));
    assert!(matches!(
        validate_rental_window(START, START, now),
        Err(DomainError::InvalidRentalWindow { .. })
    ));
    let future_start: OffsetDateTime = now + Duration::minutes(1);
    assert!(matches!(
        validate_rental_window(future_start, future_start + Duration::hours(1), now),
        Err(DomainError::InvalidRentalWindow { .. })
    ));
}
