//! User endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use entities::User;
use hotel_store::Store;

use crate::api::parse_id;
use crate::error::ServerResult;
use crate::middleware::Caller;
use crate::services::user::{self, CreateUserParams, UpdateUserParams};
use crate::state::AppState;

/// Registers a user. Open to anonymous callers.
pub async fn create_user<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(params): Json<CreateUserParams>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let user = user::create_user(&state, params).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Lists users.
pub async fn list_users<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
) -> ServerResult<Json<Vec<User>>> {
    Ok(Json(user::list_users(&state, &caller).await?))
}

/// Gets a user by ID.
pub async fn get_user<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(user::get_user(&state, &caller, id).await?))
}

/// Updates a user.
pub async fn update_user<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(params): Json<UpdateUserParams>,
) -> ServerResult<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(user::update_user(&state, &caller, id, params).await?))
}

/// Deletes a user.
pub async fn delete_user<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&id)?;
    user::delete_user(&state, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
