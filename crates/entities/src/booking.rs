//! Booking entity definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inclusive range of calendar days.
///
/// This is also the projection of a booking exposed to other users when they
/// look at a room: the dates it is taken, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDates {
    /// First day.
    pub date_from: NaiveDate,
    /// Last day.
    pub date_to: NaiveDate,
}

impl BookingDates {
    /// Creates a date range.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self { date_from, date_to }
    }

    /// Returns true if the two ranges share at least one day.
    pub fn overlaps(&self, other: &BookingDates) -> bool {
        self.date_from <= other.date_to && self.date_to >= other.date_from
    }

    /// Number of nights between the two dates.
    pub fn nights(&self) -> i64 {
        (self.date_to - self.date_from).num_days()
    }
}

/// A reservation of a room by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier.
    pub id: Uuid,
    /// Booked room.
    #[serde(rename = "roomID")]
    pub room_id: Uuid,
    /// Owner of the booking.
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    /// Arrival day.
    pub date_from: NaiveDate,
    /// Departure day.
    pub date_to: NaiveDate,
    /// Total cost computed at booking time.
    #[serde(default)]
    pub total_cost: f64,
}

impl Booking {
    /// Creates a new booking with no cost computed yet.
    pub fn new(room_id: Uuid, user_id: Uuid, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            date_from,
            date_to,
            total_cost: 0.0,
        }
    }

    /// Returns the booked date range.
    pub fn dates(&self) -> BookingDates {
        BookingDates::new(self.date_from, self.date_to)
    }
}
