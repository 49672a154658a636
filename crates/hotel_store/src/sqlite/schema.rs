use chrono::{Datelike, NaiveDate};
use entities::{Booking, Hotel, Room, RoomType, User};
use sqlx::FromRow;
use uuid::Uuid;

use crate::StoreError;

/// Database schema. Ids are uuid strings. Booking dates are day numbers
/// counted from 0001-01-01 (see [`day_number`]), so range predicates compare
/// integers.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS hotels (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
    id TEXT PRIMARY KEY,
    room_type INTEGER NOT NULL,
    base_price REAL NOT NULL,
    price REAL NOT NULL,
    hotel_id TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rooms_hotel_id ON rooms(hotel_id);

CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    room_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    date_from INTEGER NOT NULL,
    date_to INTEGER NOT NULL,
    total_cost REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_bookings_room_dates ON bookings(room_id, date_from, date_to);
CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);
"#;

fn parse_id(table: &'static str, raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::corrupt(table, raw, e))
}

/// Stored form of a calendar date.
pub fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn parse_date(table: &'static str, id: &str, days: i32) -> Result<NaiveDate, StoreError> {
    NaiveDate::from_num_days_from_ce_opt(days)
        .ok_or_else(|| StoreError::corrupt(table, id, format!("day {days} out of range")))
}

/// Database row for User
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id("users", &row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
        })
    }
}

/// Database row for Hotel
#[derive(Debug, FromRow)]
pub struct HotelRow {
    pub id: String,
    pub name: String,
    pub location: String,
}

impl TryFrom<HotelRow> for Hotel {
    type Error = StoreError;

    fn try_from(row: HotelRow) -> Result<Self, Self::Error> {
        Ok(Hotel {
            id: parse_id("hotels", &row.id)?,
            name: row.name,
            location: row.location,
        })
    }
}

/// Database row for Room
#[derive(Debug, FromRow)]
pub struct RoomRow {
    pub id: String,
    pub room_type: i32,
    pub base_price: f64,
    pub price: f64,
    pub hotel_id: String,
}

impl TryFrom<RoomRow> for Room {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let room_type = RoomType::try_from(row.room_type)
            .map_err(|e| StoreError::corrupt("rooms", row.id.as_str(), e))?;
        Ok(Room {
            id: parse_id("rooms", &row.id)?,
            room_type,
            base_price: row.base_price,
            price: row.price,
            hotel_id: parse_id("rooms", &row.hotel_id)?,
        })
    }
}

/// Database row for Booking
#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub date_from: i32,
    pub date_to: i32,
    pub total_cost: f64,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: parse_id("bookings", &row.id)?,
            room_id: parse_id("bookings", &row.room_id)?,
            user_id: parse_id("bookings", &row.user_id)?,
            date_from: parse_date("bookings", &row.id, row.date_from)?,
            date_to: parse_date("bookings", &row.id, row.date_to)?,
            total_cost: row.total_cost,
        })
    }
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            room_id: booking.room_id.to_string(),
            user_id: booking.user_id.to_string(),
            date_from: day_number(booking.date_from),
            date_to: day_number(booking.date_to),
            total_cost: booking.total_cost,
        }
    }
}
