//! Hotel operations.

use entities::{Hotel, HotelWithRooms};
use hotel_store::{HotelFilter, Repository, Store};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::Caller;
use crate::services::compose::to_hotel_with_rooms;
use crate::state::AppState;

/// Body of hotel create and update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct HotelParams {
    pub name: String,
    pub location: String,
}

/// Query parameters for listing hotels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelQuery {
    pub location: Option<String>,
}

/// Creates a hotel and returns it as stored, with no rooms yet.
pub async fn create_hotel<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    params: HotelParams,
) -> ServerResult<HotelWithRooms> {
    caller.require_admin()?;

    let hotel = Hotel::new(params.name, params.location);
    hotel.validate().into_result()?;
    state.store.hotels().create(&hotel).await?;

    tracing::info!(hotel_id = %hotel.id, name = %hotel.name, "Hotel created");

    get_hotel(state, hotel.id).await
}

/// Gets a hotel with its rooms.
pub async fn get_hotel<S: Store>(state: &AppState<S>, id: Uuid) -> ServerResult<HotelWithRooms> {
    let hotel = state.store.hotels().get_by_id(id).await?;
    to_hotel_with_rooms(&state.store, hotel)
        .await?
        .ok_or(ServerError::NotFound)
}

/// Lists hotels, optionally in one location.
pub async fn list_hotels<S: Store>(
    state: &AppState<S>,
    query: HotelQuery,
) -> ServerResult<Vec<Hotel>> {
    let filter = match query.location {
        Some(location) => HotelFilter::new().with_location(location),
        None => HotelFilter::new(),
    };
    Ok(state.store.hotels().get(&filter).await?)
}

/// Renames or relocates a hotel.
pub async fn update_hotel<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
    params: HotelParams,
) -> ServerResult<HotelWithRooms> {
    caller.require_admin()?;

    let mut hotel = state
        .store
        .hotels()
        .get_by_id(id)
        .await?
        .ok_or(ServerError::NotFound)?;
    hotel.name = params.name;
    hotel.location = params.location;
    hotel.validate().into_result()?;

    state.store.hotels().update_by_id(id, &hotel).await?;

    tracing::info!(hotel_id = %id, "Hotel updated");

    get_hotel(state, id).await
}

/// Deletes a hotel. Its rooms are left in place and show no hotel afterwards.
pub async fn delete_hotel<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<()> {
    caller.require_admin()?;
    state.store.hotels().delete_by_id(id).await?;

    tracing::info!(hotel_id = %id, "Hotel deleted");

    Ok(())
}
