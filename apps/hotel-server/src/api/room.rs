//! Room endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use entities::{Room, RoomUnfolded};
use hotel_store::Store;

use crate::api::parse_id;
use crate::error::ServerResult;
use crate::middleware::Caller;
use crate::services::room::{self, RoomParams, RoomQuery};
use crate::state::AppState;

/// Creates a room.
pub async fn create_room<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Json(params): Json<RoomParams>,
) -> ServerResult<(StatusCode, Json<RoomUnfolded>)> {
    let room = room::create_room(&state, &caller, params).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Lists rooms, optionally of one hotel.
pub async fn list_rooms<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    _caller: Caller,
    Query(query): Query<RoomQuery>,
) -> ServerResult<Json<Vec<Room>>> {
    Ok(Json(room::list_rooms(&state, query).await?))
}

/// Gets a room with its hotel and booked dates.
pub async fn get_room<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<RoomUnfolded>> {
    let id = parse_id(&id)?;
    Ok(Json(room::get_room(&state, id).await?))
}

/// Updates a room.
pub async fn update_room<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(params): Json<RoomParams>,
) -> ServerResult<Json<RoomUnfolded>> {
    let id = parse_id(&id)?;
    Ok(Json(room::update_room(&state, &caller, id, params).await?))
}

/// Deletes a room.
pub async fn delete_room<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&id)?;
    room::delete_room(&state, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
