//! Hotel endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use entities::{Hotel, HotelWithRooms};
use hotel_store::Store;

use crate::api::parse_id;
use crate::error::ServerResult;
use crate::middleware::Caller;
use crate::services::hotel::{self, HotelParams, HotelQuery};
use crate::state::AppState;

/// Creates a hotel.
pub async fn create_hotel<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Json(params): Json<HotelParams>,
) -> ServerResult<(StatusCode, Json<HotelWithRooms>)> {
    let hotel = hotel::create_hotel(&state, &caller, params).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// Lists hotels.
pub async fn list_hotels<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    _caller: Caller,
    Query(query): Query<HotelQuery>,
) -> ServerResult<Json<Vec<Hotel>>> {
    Ok(Json(hotel::list_hotels(&state, query).await?))
}

/// Gets a hotel with its rooms.
pub async fn get_hotel<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<HotelWithRooms>> {
    let id = parse_id(&id)?;
    Ok(Json(hotel::get_hotel(&state, id).await?))
}

/// Updates a hotel.
pub async fn update_hotel<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(params): Json<HotelParams>,
) -> ServerResult<Json<HotelWithRooms>> {
    let id = parse_id(&id)?;
    Ok(Json(hotel::update_hotel(&state, &caller, id, params).await?))
}

/// Deletes a hotel.
pub async fn delete_hotel<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&id)?;
    hotel::delete_hotel(&state, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
