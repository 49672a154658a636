//! Login endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use hotel_store::Store;

use crate::error::ServerResult;
use crate::services::user::{self, LoginParams, LoginResponse};
use crate::state::AppState;

/// Exchanges email and password for a bearer token.
pub async fn login<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(params): Json<LoginParams>,
) -> ServerResult<Json<LoginResponse>> {
    Ok(Json(user::login(&state, params).await?))
}
