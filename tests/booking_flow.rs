//! End-to-end booking scenarios through the `Hotel` aggregate.
//!
//! Exercises the combined Catalog + Directory + Ledger transitions: points
//! accrual on booking, the clamped deduction on cancellation, the
//! no-points administrative checkout, and the derived reports.

use testresult::TestResult;

use innkeeper::prelude::*;

fn open_hotel(dir: &std::path::Path) -> Result<Hotel, HotelError> {
    Hotel::open(Store::new(StorePaths::in_dir(dir)))
}

fn customer(name: &str) -> Customer {
    Customer::new(name, "x@example.com", "0123456789", "123456789012", "pw")
}

fn assert_flags_match_ledger(hotel: &Hotel) {
    for room in hotel.catalog().rooms() {
        assert_eq!(
            room.is_booked(),
            hotel.ledger().occupant(room.number()).is_some(),
            "room {} booked flag disagrees with ledger",
            room.number()
        );
    }
}

#[test]
fn standard_room_booking_and_cancellation_round_trip_points() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("alice", customer("Alice"))?;

    let confirmation = hotel.book(101, "alice")?;
    assert_eq!(confirmation.points_earned, 300);
    let alice = hotel.directory().get("alice").ok_or("alice missing")?;
    assert_eq!(alice.points(), 300);
    assert_eq!(alice.tier(), LoyaltyTier::Silver);
    assert_flags_match_ledger(&hotel);

    let cancellation = hotel.cancel(101, "alice")?;
    assert_eq!(cancellation.points_deducted, 300);
    assert_eq!(cancellation.new_balance, 0);
    assert_eq!(
        hotel.catalog().get(101).map(Room::is_booked),
        Some(false),
        "room 101 should be available again"
    );
    assert_flags_match_ledger(&hotel);

    Ok(())
}

#[test]
fn deluxe_booking_reaches_gold_and_checkout_keeps_points() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("bob", customer("Bob"))?;

    hotel.book(201, "bob")?;
    let bob = hotel.directory().get("bob").ok_or("bob missing")?;
    assert_eq!(bob.points(), 500);
    assert_eq!(bob.tier(), LoyaltyTier::Gold);

    let occupant = hotel.checkout(201)?;
    assert_eq!(occupant, "bob");
    assert_eq!(hotel.ledger().occupant(201), None);
    assert_eq!(
        hotel.directory().get("bob").map(Customer::points),
        Some(500),
        "checkout must not adjust points"
    );
    assert_flags_match_ledger(&hotel);

    Ok(())
}

#[test]
fn double_booking_is_rejected_and_leaves_state_unchanged() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("alice", customer("Alice"))?;
    hotel.register("bob", customer("Bob"))?;
    hotel.book(301, "alice")?;

    let result = hotel.book(301, "bob");

    assert!(matches!(result, Err(HotelError::RoomAlreadyBooked { .. })));
    assert_eq!(hotel.ledger().occupant(301), Some("alice"));
    assert_eq!(hotel.directory().get("bob").map(Customer::points), Some(0));
    assert_flags_match_ledger(&hotel);

    Ok(())
}

#[test]
fn occupancy_report_with_three_bookings() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("alice", customer("Alice"))?;
    for room in [101, 202, 303] {
        hotel.book(room, "alice")?;
    }

    let report = OccupancyReport::generate(hotel.catalog(), hotel.ledger())?;

    assert_eq!(report.total_rooms, 15);
    assert_eq!(report.booked_rooms, 3);
    assert_eq!(report.available_rooms, 12);

    let mut rendered = Vec::new();
    report.write_to(&mut rendered)?;
    let rendered = String::from_utf8(rendered)?;
    assert!(rendered.contains("12"), "{rendered}");
    assert!(rendered.contains("20.00%"), "{rendered}");

    Ok(())
}

#[test]
fn popularity_report_counts_by_type_with_name_tiebreak() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("alice", customer("Alice"))?;
    // One Suite, one Deluxe: tie on count, Deluxe first alphabetically.
    hotel.book(103, "alice")?;
    hotel.book(202, "alice")?;

    let report = PopularRoomTypes::generate(hotel.catalog(), hotel.ledger());

    assert_eq!(
        report.counts(),
        &[(RoomType::Deluxe, 1), (RoomType::Suite, 1)]
    );

    Ok(())
}

#[test]
fn booking_accumulates_points_to_platinum() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut hotel = open_hotel(dir.path())?;
    hotel.register("carol", customer("Carol"))?;

    hotel.book(103, "carol")?; // Suite: 800
    hotel.book(203, "carol")?; // Suite: 1600

    let carol = hotel.directory().get("carol").ok_or("carol missing")?;
    assert_eq!(carol.points(), 1600);
    assert_eq!(carol.tier(), LoyaltyTier::Platinum);

    Ok(())
}
