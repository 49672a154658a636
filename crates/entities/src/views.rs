//! Request-scoped views that embed resolved references.
//!
//! None of these are persisted. They are assembled for a single response and
//! dropped once serialized.

use serde::{Deserialize, Serialize};

use crate::{Booking, BookingDates, Hotel, Room, User};

/// A booking together with the room and user it points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingUnfolded {
    #[serde(flatten)]
    pub booking: Booking,
    /// `None` if the room no longer exists.
    pub room: Option<Room>,
    /// `None` if the user no longer exists.
    pub user: Option<User>,
}

/// A room together with its hotel and the dates it is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomUnfolded {
    #[serde(flatten)]
    pub room: Room,
    /// `None` if the hotel no longer exists.
    pub hotel: Option<Hotel>,
    pub bookings: Vec<BookingDates>,
}

/// A hotel together with its rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelWithRooms {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}
