//! Booking endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use entities::{Booking, BookingUnfolded};
use hotel_store::Store;

use crate::api::parse_id;
use crate::error::ServerResult;
use crate::middleware::Caller;
use crate::services::booking::{self, BookingParams, BookingQuery};
use crate::state::AppState;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Creates a booking.
pub async fn create_booking<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Json(params): Json<BookingParams>,
) -> ServerResult<(StatusCode, Json<BookingUnfolded>)> {
    let created = booking::create_booking(&state, &caller, params, today()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Lists the bookings visible to the caller.
pub async fn list_bookings<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Query(query): Query<BookingQuery>,
) -> ServerResult<Json<Vec<Booking>>> {
    Ok(Json(booking::list_bookings(&state, &caller, query).await?))
}

/// Gets a booking with its room and user.
pub async fn get_booking<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<BookingUnfolded>> {
    let id = parse_id(&id)?;
    Ok(Json(booking::get_booking(&state, &caller, id).await?))
}

/// Updates a booking.
pub async fn update_booking<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(params): Json<BookingParams>,
) -> ServerResult<Json<BookingUnfolded>> {
    let id = parse_id(&id)?;
    let updated = booking::update_booking(&state, &caller, id, params, today()).await?;
    Ok(Json(updated))
}

/// Deletes a booking.
pub async fn delete_booking<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&id)?;
    booking::delete_booking(&state, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use entities::{Hotel, Room, RoomType};
    use hotel_store::Repository;
    use serde_json::{Value, json};

    use crate::api::test_support::TestApp;
    use crate::services::test_support::{DownPrices, FixedPrice};
    use crate::services::validation::{PAST_DATE_FROM, ROOM_OCCUPIED};

    use super::*;

    async fn add_room(app: &TestApp) -> Room {
        let hotel = Hotel::new("Hotel 1", "Berlin");
        app.state.store.hotels().create(&hotel).await.unwrap();
        let room = Room::new(RoomType::Double, 100.0, hotel.id);
        app.state.store.rooms().create(&room).await.unwrap();
        room
    }

    fn stay(room: &Room, from: &str, to: &str) -> Value {
        json!({ "roomID": room.id, "dateFrom": from, "dateTo": to })
    }

    #[tokio::test]
    async fn test_three_nights_at_150() {
        let app = TestApp::with_prices(Arc::new(FixedPrice(150.0)));
        let room = add_room(&app).await;
        let (user, token) = app.user("guest@mail.ru", false).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2024-01-01", "2024-01-04")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["totalCost"], 450.0);
        assert_eq!(body["userID"], user.id.to_string());
        assert_eq!(body["room"]["id"], room.id.to_string());
        assert_eq!(body["user"]["email"], "guest@mail.ru");

        let id = body["id"].as_str().unwrap().to_string();
        let (status, fetched) = app
            .call(Method::GET, &format!("/api/v1/booking/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn test_overlap_and_reversed_dates() {
        let app = TestApp::new();
        let room = add_room(&app).await;
        let (_, token) = app.user("guest@mail.ru", false).await;

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2099-03-01", "2099-03-05")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2099-03-05", "2099-03-08")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "roomID": ROOM_OCCUPIED }));

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2099-04-05", "2099-04-01")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["dateTo"].is_string());
    }

    #[tokio::test]
    async fn test_past_stay_cannot_be_edited() {
        let app = TestApp::new();
        let room = add_room(&app).await;
        let (_, token) = app.user("guest@mail.ru", false).await;

        let (_, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2024-01-01", "2024-01-04")),
            )
            .await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v1/booking/{id}"),
                Some(&token),
                Some(stay(&room, "2099-01-01", "2099-01-04")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["dateFrom"], PAST_DATE_FROM);
    }

    #[tokio::test]
    async fn test_guests_only_see_their_own() {
        let app = TestApp::new();
        let room = add_room(&app).await;
        let (_, alex) = app.user("alex@mail.ru", false).await;
        let (_, bob) = app.user("bob@mail.ru", false).await;
        let (_, admin) = app.user("admin@mail.ru", true).await;

        let (_, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&alex),
                Some(stay(&room, "2099-01-01", "2099-01-02")),
            )
            .await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(Method::GET, "/api/v1/booking", Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, _) = app
            .call(Method::GET, &format!("/api/v1/booking/{id}"), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/booking/{id}"), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/booking?roomID={}", room.id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/v1/booking/{id}"), Some(&alex), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_price_service_down_is_bad_gateway() {
        let app = TestApp::with_prices(Arc::new(DownPrices));
        let room = add_room(&app).await;
        let (_, token) = app.user("guest@mail.ru", false).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/booking",
                Some(&token),
                Some(stay(&room, "2099-01-01", "2099-01-02")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());

        let (_, body) = app
            .call(Method::GET, "/api/v1/booking", Some(&token), None)
            .await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_concurrent_overlapping_requests() {
        let app = TestApp::new();
        let room = add_room(&app).await;
        let mut tokens = Vec::new();
        for i in 0..6 {
            let (_, token) = app.user(&format!("guest{i}@mail.ru"), false).await;
            tokens.push(token);
        }

        let handles: Vec<_> = tokens
            .into_iter()
            .map(|token| {
                let app = app.clone();
                let body = stay(&room, "2099-06-01", "2099-06-03");
                tokio::spawn(async move {
                    app.call(Method::POST, "/api/v1/booking", Some(&token), Some(body))
                        .await
                })
            })
            .collect();
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        let created = results
            .iter()
            .filter(|(status, _)| *status == StatusCode::CREATED)
            .count();
        assert_eq!(created, 1);
        for (status, body) in results.iter().filter(|(s, _)| *s != StatusCode::CREATED) {
            assert_eq!(*status, StatusCode::BAD_REQUEST);
            assert_eq!(body["roomID"], ROOM_OCCUPIED);
        }
    }
}
