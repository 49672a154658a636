//! API endpoints.

pub mod booking;
pub mod hotel;
pub mod login;
pub mod room;
pub mod user;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use hotel_store::Store;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Prefix of all resource endpoints.
pub const API_PREFIX: &str = "/api/v1";

/// Creates the API router with all endpoints.
pub fn create_router<S: Store>() -> Router<Arc<AppState<S>>> {
    let api = Router::new()
        // Public endpoints
        .route("/login", post(login::login))
        // User endpoints
        .route("/user", get(user::list_users).post(user::create_user))
        .route(
            "/user/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        // Hotel endpoints
        .route("/hotel", get(hotel::list_hotels).post(hotel::create_hotel))
        .route(
            "/hotel/{id}",
            get(hotel::get_hotel)
                .put(hotel::update_hotel)
                .delete(hotel::delete_hotel),
        )
        // Room endpoints
        .route("/room", get(room::list_rooms).post(room::create_room))
        .route(
            "/room/{id}",
            get(room::get_room)
                .put(room::update_room)
                .delete(room::delete_room),
        )
        // Booking endpoints
        .route(
            "/booking",
            get(booking::list_bookings).post(booking::create_booking),
        )
        .route(
            "/booking/{id}",
            get(booking::get_booking)
                .put(booking::update_booking)
                .delete(booking::delete_booking),
        );

    Router::new()
        .nest(API_PREFIX, api)
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Parses a path id.
pub(crate) fn parse_id(raw: &str) -> ServerResult<Uuid> {
    raw.parse()
        .map_err(|_| ServerError::InvalidRequest(format!("Invalid id: {raw}")))
}
