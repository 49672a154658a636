//! Booking validation and pricing.
//!
//! These functions are pure: every lookup they depend on is resolved by the
//! caller and passed in through [`BookingContext`], so the rules can be
//! tested without a store.

use chrono::NaiveDate;
use entities::{Booking, BookingDates, Room, User, ValidationErrors};

pub const ROOM_NOT_FOUND: &str = "Room not found";
pub const ROOM_OCCUPIED: &str = "This room is occupied for these dates";
pub const USER_NOT_FOUND: &str = "User not found";
pub const DATE_TO_BEFORE_DATE_FROM: &str = "Date to can't be less than date from";
pub const PAST_DATE_FROM: &str = "Can't edit past date from";

/// Everything the booking rules look at besides the candidate itself.
#[derive(Debug, Clone, Copy)]
pub struct BookingContext<'a> {
    /// The referenced room, if it exists.
    pub room: Option<&'a Room>,
    /// The referenced user, if it exists.
    pub user: Option<&'a User>,
    /// Number of other bookings of the room overlapping the candidate.
    pub overlapping: u64,
    /// The stored version of the booking when updating.
    pub before: Option<&'a Booking>,
    /// Current calendar day.
    pub today: NaiveDate,
}

/// The error map reported when a room is taken for the requested dates.
pub fn room_occupied() -> ValidationErrors {
    ValidationErrors::single("roomID", ROOM_OCCUPIED)
}

/// Checks a candidate booking. An empty map means the booking is valid.
pub fn validate_booking(candidate: &Booking, ctx: &BookingContext<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match ctx.room {
        None => errors.add("roomID", ROOM_NOT_FOUND),
        Some(_) if ctx.overlapping > 0 => errors.add("roomID", ROOM_OCCUPIED),
        Some(_) => {}
    }

    if ctx.user.is_none() {
        errors.add("userID", USER_NOT_FOUND);
    }

    if candidate.date_to < candidate.date_from {
        errors.add("dateTo", DATE_TO_BEFORE_DATE_FROM);
    }

    if ctx.before.is_some_and(|before| before.date_from < ctx.today) {
        errors.add("dateFrom", PAST_DATE_FROM);
    }

    errors
}

/// Total cost of a stay: nightly price times the number of nights.
pub fn total_cost(dates: &BookingDates, nightly_price: f64) -> f64 {
    nightly_price * dates.nights() as f64
}

/// Fills in the server-computed fields of a validated booking.
pub fn evaluate_booking(candidate: &mut Booking, nightly_price: f64) {
    candidate.total_cost = total_cost(&candidate.dates(), nightly_price);
}
