//! Composition of records with the records they reference.
//!
//! A missing reference is not an error: the corresponding field of the view
//! is left empty. A `None` input yields `None`.

use entities::{Booking, BookingUnfolded, Hotel, HotelWithRooms, Room, RoomUnfolded};
use hotel_store::{BookingFilter, Repository, RoomFilter, Store, StoreResult};

/// Resolves the room and user of a booking.
pub async fn to_unfolded_booking<S: Store>(
    store: &S,
    booking: Option<Booking>,
) -> StoreResult<Option<BookingUnfolded>> {
    let Some(booking) = booking else {
        return Ok(None);
    };

    let room = store.rooms().get_by_id(booking.room_id).await?;
    let user = store.users().get_by_id(booking.user_id).await?;

    Ok(Some(BookingUnfolded {
        booking,
        room,
        user,
    }))
}

/// Resolves the hotel of a room and the dates it is booked.
pub async fn to_unfolded_room<S: Store>(
    store: &S,
    room: Option<Room>,
) -> StoreResult<Option<RoomUnfolded>> {
    let Some(room) = room else {
        return Ok(None);
    };

    let hotel = store.hotels().get_by_id(room.hotel_id).await?;
    let bookings = store
        .bookings()
        .get(&BookingFilter::new().with_room(room.id))
        .await?
        .iter()
        .map(Booking::dates)
        .collect();

    Ok(Some(RoomUnfolded {
        room,
        hotel,
        bookings,
    }))
}

/// Resolves the rooms of a hotel.
pub async fn to_hotel_with_rooms<S: Store>(
    store: &S,
    hotel: Option<Hotel>,
) -> StoreResult<Option<HotelWithRooms>> {
    let Some(hotel) = hotel else {
        return Ok(None);
    };

    let rooms = store
        .rooms()
        .get(&RoomFilter::new().with_hotel(hotel.id))
        .await?;

    Ok(Some(HotelWithRooms { hotel, rooms }))
}
