//! Booking operations.

use chrono::NaiveDate;
use entities::{Booking, BookingUnfolded};
use hotel_store::{BookingFilter, BookingRepository, BookingWrite, Repository, Store};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::Caller;
use crate::services::compose::to_unfolded_booking;
use crate::services::validation::{
    BookingContext, evaluate_booking, room_occupied, validate_booking,
};
use crate::state::AppState;

/// Body of booking create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingParams {
    #[serde(rename = "roomID")]
    pub room_id: Uuid,
    /// Only honored for administrators; everyone else books for themselves.
    #[serde(rename = "userID", default)]
    pub user_id: Option<Uuid>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingQuery {
    #[serde(rename = "roomID")]
    pub room_id: Option<Uuid>,
    /// Only honored for administrators.
    #[serde(rename = "userID")]
    pub user_id: Option<Uuid>,
}

/// Loads a booking the caller is allowed to see. Bookings of other users
/// look exactly like missing ones.
async fn load_visible<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<Booking> {
    state
        .store
        .bookings()
        .get_by_id(id)
        .await?
        .filter(|booking| caller.can_access(booking.user_id))
        .ok_or(ServerError::NotFound)
}

/// Validates, prices, and writes a candidate booking.
///
/// `before` is the stored version when updating. The availability check is
/// repeated inside the write, so a booking that raced in after validation
/// still yields the occupied error.
async fn check_and_write<S: Store>(
    state: &AppState<S>,
    mut candidate: Booking,
    before: Option<&Booking>,
    today: NaiveDate,
) -> ServerResult<BookingUnfolded> {
    let store = &state.store;

    let room = store.rooms().get_by_id(candidate.room_id).await?;
    let user = store.users().get_by_id(candidate.user_id).await?;
    let overlapping = match room {
        Some(_) => {
            store
                .bookings()
                .get_count(&BookingFilter::conflicts_with(&candidate))
                .await?
        }
        None => 0,
    };

    let ctx = BookingContext {
        room: room.as_ref(),
        user: user.as_ref(),
        overlapping,
        before,
        today,
    };
    validate_booking(&candidate, &ctx).into_result()?;

    let Some(room) = room else {
        return Err(ServerError::NotFound);
    };
    let nightly_price = state.prices.room_price(room.room_type).await?;
    evaluate_booking(&mut candidate, nightly_price);

    let write = match before {
        Some(before) => store.bookings().update_if_free(before.id, &candidate).await?,
        None => store.bookings().create_if_free(&candidate).await?,
    };
    let id = match write {
        BookingWrite::Committed(id) => id,
        BookingWrite::Occupied => {
            tracing::info!(room_id = %candidate.room_id, "Room taken by a concurrent booking");
            return Err(room_occupied().into());
        }
    };

    let stored = store.bookings().get_by_id(id).await?;
    to_unfolded_booking(store, stored)
        .await?
        .ok_or(ServerError::NotFound)
}

/// Gets a booking with its room and user.
pub async fn get_booking<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<BookingUnfolded> {
    let booking = load_visible(state, caller, id).await?;
    to_unfolded_booking(&state.store, Some(booking))
        .await?
        .ok_or(ServerError::NotFound)
}

/// Lists bookings. Non-administrators only ever see their own.
pub async fn list_bookings<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    query: BookingQuery,
) -> ServerResult<Vec<Booking>> {
    let mut filter = BookingFilter::new();
    if let Some(room_id) = query.room_id {
        filter = filter.with_room(room_id);
    }
    if !caller.is_admin {
        filter = filter.with_user(caller.id);
    } else if let Some(user_id) = query.user_id {
        filter = filter.with_user(user_id);
    }

    Ok(state.store.bookings().get(&filter).await?)
}

/// Creates a booking.
pub async fn create_booking<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    params: BookingParams,
    today: NaiveDate,
) -> ServerResult<BookingUnfolded> {
    let user_id = match params.user_id {
        Some(user_id) if caller.is_admin => user_id,
        _ => caller.id,
    };
    let candidate = Booking::new(params.room_id, user_id, params.date_from, params.date_to);

    let created = check_and_write(state, candidate, None, today).await?;

    tracing::info!(
        booking_id = %created.booking.id,
        room_id = %created.booking.room_id,
        total_cost = created.booking.total_cost,
        "Booking created"
    );

    Ok(created)
}

/// Replaces the room, owner, and dates of a booking and re-prices it.
pub async fn update_booking<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
    params: BookingParams,
    today: NaiveDate,
) -> ServerResult<BookingUnfolded> {
    let before = load_visible(state, caller, id).await?;

    let user_id = if caller.is_admin {
        params.user_id.unwrap_or(before.user_id)
    } else {
        caller.id
    };
    let mut candidate = Booking::new(params.room_id, user_id, params.date_from, params.date_to);
    candidate.id = id;

    let updated = check_and_write(state, candidate, Some(&before), today).await?;

    tracing::info!(booking_id = %id, "Booking updated");

    Ok(updated)
}

/// Deletes a booking.
pub async fn delete_booking<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<()> {
    load_visible(state, caller, id).await?;
    state.store.bookings().delete_by_id(id).await?;

    tracing::info!(booking_id = %id, "Booking deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use entities::{Room, RoomType, User};
    use hotel_store::MemoryStore;

    use super::*;
    use crate::services::test_support::{caller_for, test_state};
    use crate::services::validation::{PAST_DATE_FROM, ROOM_OCCUPIED};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    struct Setup {
        state: Arc<AppState<MemoryStore>>,
        room: Room,
        guest: Caller,
        other: Caller,
        admin: Caller,
    }

    async fn setup() -> Setup {
        let state = test_state();
        let room = Room::new(RoomType::Deluxe, 100.0, Uuid::new_v4());
        state.store.rooms().create(&room).await.unwrap();

        let guest = User::new("Alex", "Xela", "guest@mail.ru");
        let other = User::new("Bob", "Bobson", "other@mail.ru");
        let admin = User::new("Ada", "Admin", "admin@mail.ru").with_admin(true);
        for user in [&guest, &other, &admin] {
            state.store.users().create(user).await.unwrap();
        }

        Setup {
            room,
            guest: caller_for(&guest),
            other: caller_for(&other),
            admin: caller_for(&admin),
            state,
        }
    }

    fn params(room_id: Uuid, from: &str, to: &str) -> BookingParams {
        BookingParams {
            room_id,
            user_id: None,
            date_from: date(from),
            date_to: date(to),
        }
    }

    #[tokio::test]
    async fn test_create_prices_the_stay() {
        let s = setup().await;
        let today = date("2023-12-01");

        // The stub prices a room at its type code times 2, so Deluxe is 40.
        let created = create_booking(
            &s.state,
            &s.guest,
            params(s.room.id, "2024-01-01", "2024-01-04"),
            today,
        )
        .await
        .unwrap();

        assert_eq!(created.booking.total_cost, 120.0);
        assert_eq!(created.booking.user_id, s.guest.id);
        assert_eq!(created.room.map(|r| r.id), Some(s.room.id));
        assert_eq!(created.user.map(|u| u.id), Some(s.guest.id));

        let fetched = get_booking(&s.state, &s.guest, created.booking.id)
            .await
            .unwrap();
        assert_eq!(fetched.booking, created.booking);
    }

    #[tokio::test]
    async fn test_guest_cannot_book_for_someone_else() {
        let s = setup().await;
        let mut request = params(s.room.id, "2024-01-01", "2024-01-02");
        request.user_id = Some(s.other.id);

        let created = create_booking(&s.state, &s.guest, request.clone(), date("2023-12-01"))
            .await
            .unwrap();
        assert_eq!(created.booking.user_id, s.guest.id);

        let mut request = params(s.room.id, "2024-02-01", "2024-02-02");
        request.user_id = Some(s.other.id);
        let created = create_booking(&s.state, &s.admin, request, date("2023-12-01"))
            .await
            .unwrap();
        assert_eq!(created.booking.user_id, s.other.id);
    }

    #[tokio::test]
    async fn test_overlap_is_rejected() {
        let s = setup().await;
        let today = date("2023-12-01");
        create_booking(
            &s.state,
            &s.guest,
            params(s.room.id, "2024-01-01", "2024-01-05"),
            today,
        )
        .await
        .unwrap();

        let err = create_booking(
            &s.state,
            &s.other,
            params(s.room.id, "2024-01-05", "2024-01-07"),
            today,
        )
        .await
        .unwrap_err();

        match err {
            ServerError::Validation(errors) => {
                assert_eq!(errors.get("roomID"), Some(ROOM_OCCUPIED));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_happens_before_pricing() {
        let s = setup().await;
        let err = create_booking(
            &s.state,
            &s.guest,
            params(Uuid::new_v4(), "2024-01-05", "2024-01-01"),
            date("2023-12-01"),
        )
        .await
        .unwrap_err();

        match err {
            ServerError::Validation(errors) => {
                assert!(errors.contains("roomID"));
                assert!(errors.contains("dateTo"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_own_dates_and_rejects_past_start() {
        let s = setup().await;
        let created = create_booking(
            &s.state,
            &s.guest,
            params(s.room.id, "2024-01-10", "2024-01-12"),
            date("2024-01-01"),
        )
        .await
        .unwrap();
        let id = created.booking.id;

        // Extending over its own dates is fine while the stay is in the future.
        let updated = update_booking(
            &s.state,
            &s.guest,
            id,
            params(s.room.id, "2024-01-10", "2024-01-13"),
            date("2024-01-05"),
        )
        .await
        .unwrap();
        assert_eq!(updated.booking.total_cost, 120.0);

        // Once the stay has started, the booking is frozen.
        let err = update_booking(
            &s.state,
            &s.guest,
            id,
            params(s.room.id, "2024-01-10", "2024-01-14"),
            date("2024-01-11"),
        )
        .await
        .unwrap_err();
        match err {
            ServerError::Validation(errors) => {
                assert_eq!(errors.get("dateFrom"), Some(PAST_DATE_FROM));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bookings_of_others_are_invisible() {
        let s = setup().await;
        let today = date("2023-12-01");
        let created = create_booking(
            &s.state,
            &s.guest,
            params(s.room.id, "2024-01-01", "2024-01-02"),
            today,
        )
        .await
        .unwrap();
        let id = created.booking.id;

        assert!(matches!(
            get_booking(&s.state, &s.other, id).await,
            Err(ServerError::NotFound)
        ));
        assert!(matches!(
            delete_booking(&s.state, &s.other, id).await,
            Err(ServerError::NotFound)
        ));
        assert!(matches!(
            update_booking(
                &s.state,
                &s.other,
                id,
                params(s.room.id, "2024-03-01", "2024-03-02"),
                today
            )
            .await,
            Err(ServerError::NotFound)
        ));

        let theirs = list_bookings(&s.state, &s.other, BookingQuery::default())
            .await
            .unwrap();
        assert!(theirs.is_empty());

        let everything = list_bookings(&s.state, &s.admin, BookingQuery::default())
            .await
            .unwrap();
        assert_eq!(everything.len(), 1);

        delete_booking(&s.state, &s.guest, id).await.unwrap();
        assert!(matches!(
            get_booking(&s.state, &s.admin, id).await,
            Err(ServerError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_overlapping_creates() {
        let s = setup().await;

        let handles: Vec<_> = [s.guest.clone(), s.other.clone(), s.admin.clone()]
            .into_iter()
            .map(|caller| {
                let state = Arc::clone(&s.state);
                let request = params(s.room.id, "2024-05-01", "2024-05-03");
                tokio::spawn(async move {
                    create_booking(&state, &caller, request, date("2024-01-01")).await
                })
            })
            .collect();

        let mut created = 0;
        let mut occupied = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(ServerError::Validation(errors)) => {
                    assert_eq!(errors.get("roomID"), Some(ROOM_OCCUPIED));
                    occupied += 1;
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!((created, occupied), (1, 2));
    }
}
