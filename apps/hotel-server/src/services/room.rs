//! Room operations.

use entities::{Room, RoomType, RoomUnfolded, ValidationErrors};
use hotel_store::{Repository, RoomFilter, Store};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::Caller;
use crate::services::compose::to_unfolded_room;
use crate::state::AppState;

pub const INVALID_ROOM_TYPE: &str = "Invalid room type";
pub const NEGATIVE_BASE_PRICE: &str = "Price can't be less than 0";
pub const HOTEL_NOT_FOUND: &str = "Hotel not found";

/// Body of room create and update requests.
///
/// The room type is taken as a raw code so that an unknown code is reported
/// as a field error rather than a malformed body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomParams {
    #[serde(rename = "type")]
    pub room_type: i32,
    pub base_price: f64,
    #[serde(rename = "hotelID")]
    pub hotel_id: Uuid,
}

/// Query parameters for listing rooms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomQuery {
    #[serde(rename = "hotelID")]
    pub hotel_id: Option<Uuid>,
}

/// Checks room parameters and resolves the room type.
async fn validate_room<S: Store>(
    state: &AppState<S>,
    params: &RoomParams,
) -> ServerResult<RoomType> {
    let mut errors = ValidationErrors::new();

    let room_type = RoomType::from_code(params.room_type);
    if room_type.is_none() {
        errors.add("type", INVALID_ROOM_TYPE);
    }
    if params.base_price < 0.0 {
        errors.add("basePrice", NEGATIVE_BASE_PRICE);
    }
    if state.store.hotels().get_by_id(params.hotel_id).await?.is_none() {
        errors.add("hotelID", HOTEL_NOT_FOUND);
    }

    errors.into_result()?;
    room_type.ok_or(ServerError::InvalidRequest(INVALID_ROOM_TYPE.to_string()))
}

/// Creates a room, quoting its price from the price service, and returns it
/// as stored together with its hotel.
pub async fn create_room<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    params: RoomParams,
) -> ServerResult<RoomUnfolded> {
    caller.require_admin()?;

    let room_type = validate_room(state, &params).await?;
    let price = state.prices.room_price(room_type).await?;
    let room = Room::new(room_type, params.base_price, params.hotel_id).with_price(price);
    state.store.rooms().create(&room).await?;

    tracing::info!(room_id = %room.id, hotel_id = %room.hotel_id, price, "Room created");

    get_room(state, room.id).await
}

/// Gets a room with its hotel and booked dates.
pub async fn get_room<S: Store>(state: &AppState<S>, id: Uuid) -> ServerResult<RoomUnfolded> {
    let room = state.store.rooms().get_by_id(id).await?;
    to_unfolded_room(&state.store, room)
        .await?
        .ok_or(ServerError::NotFound)
}

/// Lists rooms, optionally of one hotel.
pub async fn list_rooms<S: Store>(
    state: &AppState<S>,
    query: RoomQuery,
) -> ServerResult<Vec<Room>> {
    let filter = match query.hotel_id {
        Some(hotel_id) => RoomFilter::new().with_hotel(hotel_id),
        None => RoomFilter::new(),
    };
    Ok(state.store.rooms().get(&filter).await?)
}

/// Replaces a room's fields and re-quotes its price.
pub async fn update_room<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
    params: RoomParams,
) -> ServerResult<RoomUnfolded> {
    caller.require_admin()?;

    if state.store.rooms().get_by_id(id).await?.is_none() {
        return Err(ServerError::NotFound);
    }

    let room_type = validate_room(state, &params).await?;
    let price = state.prices.room_price(room_type).await?;
    let mut room = Room::new(room_type, params.base_price, params.hotel_id).with_price(price);
    room.id = id;
    state.store.rooms().update_by_id(id, &room).await?;

    tracing::info!(room_id = %id, price, "Room updated");

    get_room(state, id).await
}

/// Deletes a room. Bookings of the room are kept.
pub async fn delete_room<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<()> {
    caller.require_admin()?;
    state.store.rooms().delete_by_id(id).await?;

    tracing::info!(room_id = %id, "Room deleted");

    Ok(())
}
