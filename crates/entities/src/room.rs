//! Room entity definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of room. The discriminant is the wire code used by clients and by the
/// price service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RoomType {
    Single = 5,
    Double = 10,
    SeaSide = 15,
    Deluxe = 20,
}

impl RoomType {
    /// All room types, cheapest first.
    pub const ALL: [RoomType; 4] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::SeaSide,
        RoomType::Deluxe,
    ];

    /// Returns the wire code of this room type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a room type by wire code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// Error returned when a wire code does not name a room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRoomType(pub i32);

impl fmt::Display for InvalidRoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid room type code {}", self.0)
    }
}

impl std::error::Error for InvalidRoomType {}

impl TryFrom<i32> for RoomType {
    type Error = InvalidRoomType;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(InvalidRoomType(code))
    }
}

impl From<RoomType> for i32 {
    fn from(room_type: RoomType) -> Self {
        room_type.code()
    }
}

/// A bookable room of a hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier.
    pub id: Uuid,
    /// Kind of room.
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Price entered by the hotel administrator.
    pub base_price: f64,
    /// Nightly price as quoted by the price service.
    pub price: f64,
    /// Owning hotel.
    #[serde(rename = "hotelID")]
    pub hotel_id: Uuid,
}

impl Room {
    /// Creates a new room with no quoted price yet.
    pub fn new(room_type: RoomType, base_price: f64, hotel_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_type,
            base_price,
            price: 0.0,
            hotel_id,
        }
    }

    /// Sets the quoted nightly price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }
}
