//! Query filters and their entity bindings.

use entities::{Booking, BookingDates, Hotel, Room, User};
use uuid::Uuid;

use crate::Entity;

/// Filter options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Filter by exact email.
    pub email: Option<String>,
}

impl UserFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Filter options for listing hotels.
#[derive(Debug, Clone, Default)]
pub struct HotelFilter {
    /// Filter by exact location.
    pub location: Option<String>,
}

impl HotelFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Filter options for listing rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    /// Filter by owning hotel.
    pub hotel_id: Option<Uuid>,
}

impl RoomFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by owning hotel.
    pub fn with_hotel(mut self, hotel_id: Uuid) -> Self {
        self.hotel_id = Some(hotel_id);
        self
    }
}

/// Filter options for listing bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Filter by room.
    pub room_id: Option<Uuid>,
    /// Keep only bookings sharing at least one day with this range.
    pub overlapping: Option<BookingDates>,
    /// Leave out this booking, so that a booking being edited does not
    /// conflict with its own stored version.
    pub exclude_id: Option<Uuid>,
}

impl BookingFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by owner.
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Filters by room.
    pub fn with_room(mut self, room_id: Uuid) -> Self {
        self.room_id = Some(room_id);
        self
    }

    /// Keeps only bookings overlapping the range.
    pub fn overlapping(mut self, dates: BookingDates) -> Self {
        self.overlapping = Some(dates);
        self
    }

    /// Leaves out one booking.
    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    /// The filter that finds bookings conflicting with `booking`: same room,
    /// another id, overlapping dates.
    pub fn conflicts_with(booking: &Booking) -> Self {
        Self::new()
            .with_room(booking.room_id)
            .overlapping(booking.dates())
            .excluding(booking.id)
    }
}

impl Entity for User {
    type Filter = UserFilter;
    const KIND: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.email.as_ref().is_none_or(|email| &self.email == email)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl Entity for Hotel {
    type Filter = HotelFilter;
    const KIND: &'static str = "Hotel";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn matches(&self, filter: &HotelFilter) -> bool {
        filter
            .location
            .as_ref()
            .is_none_or(|location| &self.location == location)
    }
}

impl Entity for Room {
    type Filter = RoomFilter;
    const KIND: &'static str = "Room";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn matches(&self, filter: &RoomFilter) -> bool {
        filter.hotel_id.is_none_or(|id| self.hotel_id == id)
    }
}

impl Entity for Booking {
    type Filter = BookingFilter;
    const KIND: &'static str = "Booking";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn matches(&self, filter: &BookingFilter) -> bool {
        filter.user_id.is_none_or(|id| self.user_id == id)
            && filter.room_id.is_none_or(|id| self.room_id == id)
            && filter.exclude_id.is_none_or(|id| self.id != id)
            && filter
                .overlapping
                .is_none_or(|dates| self.dates().overlaps(&dates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(room_id: Uuid, from: &str, to: &str) -> Booking {
        Booking::new(
            room_id,
            Uuid::new_v4(),
            from.parse().unwrap(),
            to.parse().unwrap(),
        )
    }

    #[test]
    fn test_booking_filter_matches() {
        let room_id = Uuid::new_v4();
        let existing = booking(room_id, "2024-02-01", "2024-02-05");

        let candidate = booking(room_id, "2024-02-03", "2024-02-10");
        assert!(existing.matches(&BookingFilter::conflicts_with(&candidate)));

        let elsewhere = booking(Uuid::new_v4(), "2024-02-03", "2024-02-10");
        assert!(!existing.matches(&BookingFilter::conflicts_with(&elsewhere)));

        let later = booking(room_id, "2024-02-06", "2024-02-10");
        assert!(!existing.matches(&BookingFilter::conflicts_with(&later)));
    }

    #[test]
    fn test_booking_does_not_conflict_with_itself() {
        let existing = booking(Uuid::new_v4(), "2024-02-01", "2024-02-05");
        assert!(!existing.matches(&BookingFilter::conflicts_with(&existing)));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let user = User::new("Alex", "Xela", "hello@mail.ru");
        assert!(user.matches(&UserFilter::new()));
        assert!(!user.matches(&UserFilter::new().with_email("other@mail.ru")));

        let hotel = Hotel::new("Hotel 1", "Berlin");
        assert!(hotel.matches(&HotelFilter::new()));
        assert!(!hotel.matches(&HotelFilter::new().with_location("Paris")));
    }
}
