//! SQLite store implementation built on sqlx.

mod schema;

use std::str::FromStr;

use async_trait::async_trait;
use entities::{Booking, Hotel, Room, User};
pub use schema::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, QueryBuilder, Sqlite, SqliteConnection,
};
use uuid::Uuid;

use crate::{
    BookingFilter, BookingRepository, BookingWrite, Entity, HotelFilter, Repository, RoomFilter,
    Store, StoreError, StoreResult, UserFilter, UserRepository,
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, is_admin";
const HOTEL_COLUMNS: &str = "id, name, location";
const ROOM_COLUMNS: &str = "id, room_type, base_price, price, hotel_id";
const BOOKING_COLUMNS: &str = "id, room_id, user_id, date_from, date_to, total_cost";

/// Predicate matching bookings of a room that overlap a date range, other
/// than the booking being written. Binds: room id, own id, date-to, date-from.
const BOOKING_CONFLICT_SQL: &str = "SELECT 1 FROM bookings WHERE room_id = ? AND id != ? AND \
                                    date_from <= ? AND date_to >= ?";

fn map_unique(err: sqlx::Error, entity_type: &'static str, key: &str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            StoreError::already_exists(entity_type, key)
        }
        other => StoreError::Database(other),
    }
}

fn check_affected(rows: u64, entity_type: &'static str, id: Uuid) -> StoreResult<()> {
    if rows == 0 {
        return Err(StoreError::not_found(entity_type, id));
    }
    Ok(())
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// SQLite-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    users: SqliteUsers,
    hotels: SqliteHotels,
    rooms: SqliteRooms,
    bookings: SqliteBookings,
}

impl SqliteStore {
    /// Connects to the database at `url` and creates the schema if needed.
    ///
    /// An in-memory database lives only as long as its connection, so for
    /// `sqlite::memory:` the pool keeps exactly one connection open forever.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        tracing::info!(url = %url, "SQLite store ready");

        Ok(store)
    }

    fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            users: SqliteUsers { pool: pool.clone() },
            hotels: SqliteHotels { pool: pool.clone() },
            rooms: SqliteRooms { pool: pool.clone() },
            bookings: SqliteBookings { pool: pool.clone() },
            pool,
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        Ok(())
    }
}

impl Store for SqliteStore {
    type Users = SqliteUsers;
    type Hotels = SqliteHotels;
    type Rooms = SqliteRooms;
    type Bookings = SqliteBookings;

    fn users(&self) -> &Self::Users {
        &self.users
    }

    fn hotels(&self) -> &Self::Hotels {
        &self.hotels
    }

    fn rooms(&self) -> &Self::Rooms {
        &self.rooms
    }

    fn bookings(&self) -> &Self::Bookings {
        &self.bookings
    }
}

// =============================================================================
// Users
// =============================================================================

/// User table.
#[derive(Debug, Clone)]
pub struct SqliteUsers {
    pool: Pool<Sqlite>,
}

fn push_user_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
    if let Some(email) = &filter.email {
        query.push(" AND email = ").push_bind(email.clone());
    }
}

#[async_trait]
impl Repository<User> for SqliteUsers {
    async fn create(&self, user: &User) -> StoreResult<Uuid> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, is_admin)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, User::KIND, &user.email))?;

        Ok(user.id)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn get(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1 = 1"));
        push_user_filter(&mut query, filter);
        query.push(" ORDER BY rowid");

        let rows: Vec<UserRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn get_count(&self, filter: &UserFilter) -> StoreResult<u64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users WHERE 1 = 1");
        push_user_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn update_by_id(&self, id: Uuid, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ?, password_hash = ?,
             is_admin = ? WHERE id = ?",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, User::KIND, &user.email))?;

        check_affected(result.rows_affected(), User::KIND, id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        check_affected(result.rows_affected(), User::KIND, id)
    }
}

#[async_trait]
impl UserRepository for SqliteUsers {
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }
}

// =============================================================================
// Hotels
// =============================================================================

/// Hotel table.
#[derive(Debug, Clone)]
pub struct SqliteHotels {
    pool: Pool<Sqlite>,
}

fn push_hotel_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &HotelFilter) {
    if let Some(location) = &filter.location {
        query.push(" AND location = ").push_bind(location.clone());
    }
}

#[async_trait]
impl Repository<Hotel> for SqliteHotels {
    async fn create(&self, hotel: &Hotel) -> StoreResult<Uuid> {
        sqlx::query("INSERT INTO hotels (id, name, location) VALUES (?, ?, ?)")
            .bind(hotel.id.to_string())
            .bind(&hotel.name)
            .bind(&hotel.location)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, Hotel::KIND, &hotel.id.to_string()))?;

        Ok(hotel.id)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Hotel>> {
        let row: Option<HotelRow> =
            sqlx::query_as(&format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Hotel::try_from).transpose()
    }

    async fn get(&self, filter: &HotelFilter) -> StoreResult<Vec<Hotel>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE 1 = 1"));
        push_hotel_filter(&mut query, filter);
        query.push(" ORDER BY rowid");

        let rows: Vec<HotelRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Hotel::try_from).collect()
    }

    async fn get_count(&self, filter: &HotelFilter) -> StoreResult<u64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM hotels WHERE 1 = 1");
        push_hotel_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn update_by_id(&self, id: Uuid, hotel: &Hotel) -> StoreResult<()> {
        let result = sqlx::query("UPDATE hotels SET name = ?, location = ? WHERE id = ?")
            .bind(&hotel.name)
            .bind(&hotel.location)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        check_affected(result.rows_affected(), Hotel::KIND, id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        check_affected(result.rows_affected(), Hotel::KIND, id)
    }
}

// =============================================================================
// Rooms
// =============================================================================

/// Room table.
#[derive(Debug, Clone)]
pub struct SqliteRooms {
    pool: Pool<Sqlite>,
}

fn push_room_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &RoomFilter) {
    if let Some(hotel_id) = filter.hotel_id {
        query.push(" AND hotel_id = ").push_bind(hotel_id.to_string());
    }
}

#[async_trait]
impl Repository<Room> for SqliteRooms {
    async fn create(&self, room: &Room) -> StoreResult<Uuid> {
        sqlx::query(
            "INSERT INTO rooms (id, room_type, base_price, price, hotel_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(room.id.to_string())
        .bind(room.room_type.code())
        .bind(room.base_price)
        .bind(room.price)
        .bind(room.hotel_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, Room::KIND, &room.id.to_string()))?;

        Ok(room.id)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Room>> {
        let row: Option<RoomRow> =
            sqlx::query_as(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Room::try_from).transpose()
    }

    async fn get(&self, filter: &RoomFilter) -> StoreResult<Vec<Room>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE 1 = 1"));
        push_room_filter(&mut query, filter);
        query.push(" ORDER BY rowid");

        let rows: Vec<RoomRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Room::try_from).collect()
    }

    async fn get_count(&self, filter: &RoomFilter) -> StoreResult<u64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM rooms WHERE 1 = 1");
        push_room_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn update_by_id(&self, id: Uuid, room: &Room) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE rooms SET room_type = ?, base_price = ?, price = ?, hotel_id = ? WHERE id = ?",
        )
        .bind(room.room_type.code())
        .bind(room.base_price)
        .bind(room.price)
        .bind(room.hotel_id.to_string())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        check_affected(result.rows_affected(), Room::KIND, id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        check_affected(result.rows_affected(), Room::KIND, id)
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// Booking table.
#[derive(Debug, Clone)]
pub struct SqliteBookings {
    pool: Pool<Sqlite>,
}

fn push_booking_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &BookingFilter) {
    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id.to_string());
    }
    if let Some(room_id) = filter.room_id {
        query.push(" AND room_id = ").push_bind(room_id.to_string());
    }
    if let Some(exclude_id) = filter.exclude_id {
        query.push(" AND id != ").push_bind(exclude_id.to_string());
    }
    if let Some(dates) = filter.overlapping {
        query
            .push(" AND date_from <= ")
            .push_bind(day_number(dates.date_to))
            .push(" AND date_to >= ")
            .push_bind(day_number(dates.date_from));
    }
}

/// A booking write that must not overlap another booking of its room.
enum ConditionalWrite<'a> {
    Create(&'a Booking),
    Update(Uuid, &'a Booking),
}

impl SqliteBookings {
    /// Runs a conditional write in a transaction. The write statement comes
    /// first, so SQLite takes the write lock before the overlap predicate is
    /// read. The transaction rolls back when dropped, so a cancelled write
    /// leaves the connection clean.
    async fn write_if_free(&self, write: ConditionalWrite<'_>) -> StoreResult<BookingWrite> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::write_locked(&mut *tx, write).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    async fn write_locked(
        conn: &mut SqliteConnection,
        write: ConditionalWrite<'_>,
    ) -> StoreResult<BookingWrite> {
        match write {
            ConditionalWrite::Create(booking) => {
                let row = BookingRow::from(booking);
                let result = sqlx::query(&format!(
                    "INSERT INTO bookings ({BOOKING_COLUMNS})
                     SELECT ?, ?, ?, ?, ?, ?
                     WHERE NOT EXISTS ({BOOKING_CONFLICT_SQL})"
                ))
                .bind(&row.id)
                .bind(&row.room_id)
                .bind(&row.user_id)
                .bind(row.date_from)
                .bind(row.date_to)
                .bind(row.total_cost)
                .bind(&row.room_id)
                .bind(&row.id)
                .bind(row.date_to)
                .bind(row.date_from)
                .execute(&mut *conn)
                .await
                .map_err(|e| map_unique(e, Booking::KIND, &row.id))?;

                if result.rows_affected() == 0 {
                    return Ok(BookingWrite::Occupied);
                }
                Ok(BookingWrite::Committed(booking.id))
            }
            ConditionalWrite::Update(id, booking) => {
                let mut row = BookingRow::from(booking);
                row.id = id.to_string();
                let result = sqlx::query(&format!(
                    "UPDATE bookings SET room_id = ?, user_id = ?, date_from = ?, date_to = ?,
                     total_cost = ?
                     WHERE id = ? AND NOT EXISTS ({BOOKING_CONFLICT_SQL})"
                ))
                .bind(&row.room_id)
                .bind(&row.user_id)
                .bind(row.date_from)
                .bind(row.date_to)
                .bind(row.total_cost)
                .bind(&row.id)
                .bind(&row.room_id)
                .bind(&row.id)
                .bind(row.date_to)
                .bind(row.date_from)
                .execute(&mut *conn)
                .await?;

                if result.rows_affected() > 0 {
                    return Ok(BookingWrite::Committed(id));
                }

                let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE id = ?")
                    .bind(&row.id)
                    .fetch_one(&mut *conn)
                    .await?;
                if exists == 0 {
                    return Err(StoreError::not_found(Booking::KIND, id));
                }
                Ok(BookingWrite::Occupied)
            }
        }
    }
}

#[async_trait]
impl Repository<Booking> for SqliteBookings {
    async fn create(&self, booking: &Booking) -> StoreResult<Uuid> {
        let row = BookingRow::from(booking);
        sqlx::query(&format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(&row.id)
        .bind(&row.room_id)
        .bind(&row.user_id)
        .bind(row.date_from)
        .bind(row.date_to)
        .bind(row.total_cost)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique(e, Booking::KIND, &row.id))?;

        Ok(booking.id)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn get(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE 1 = 1"
        ));
        push_booking_filter(&mut query, filter);
        query.push(" ORDER BY date_from, rowid");

        let rows: Vec<BookingRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn get_count(&self, filter: &BookingFilter) -> StoreResult<u64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM bookings WHERE 1 = 1");
        push_booking_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn update_by_id(&self, id: Uuid, booking: &Booking) -> StoreResult<()> {
        let row = BookingRow::from(booking);
        let result = sqlx::query(
            "UPDATE bookings SET room_id = ?, user_id = ?, date_from = ?, date_to = ?,
             total_cost = ? WHERE id = ?",
        )
        .bind(&row.room_id)
        .bind(&row.user_id)
        .bind(row.date_from)
        .bind(row.date_to)
        .bind(row.total_cost)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        check_affected(result.rows_affected(), Booking::KIND, id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        check_affected(result.rows_affected(), Booking::KIND, id)
    }
}

#[async_trait]
impl BookingRepository for SqliteBookings {
    async fn create_if_free(&self, booking: &Booking) -> StoreResult<BookingWrite> {
        self.write_if_free(ConditionalWrite::Create(booking)).await
    }

    async fn update_if_free(&self, id: Uuid, booking: &Booking) -> StoreResult<BookingWrite> {
        self.write_if_free(ConditionalWrite::Update(id, booking))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use entities::RoomType;

    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn booking(room_id: Uuid, from: &str, to: &str) -> Booking {
        Booking::new(
            room_id,
            Uuid::new_v4(),
            from.parse().unwrap(),
            to.parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_user_crud() {
        let store = store().await;

        // Create
        let user = User::new("Alex", "Xela", "hello@mail.ru")
            .with_password_hash("hash")
            .with_admin(true);
        let id = store.users().create(&user).await.unwrap();

        // Get
        let fetched = store.users().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, user);
        let by_email = store.users().get_by_email("hello@mail.ru").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(id));

        // Duplicate email
        let dup = User::new("Bob", "Bobson", "hello@mail.ru");
        let err = store.users().create(&dup).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        // Update
        let mut changed = fetched.clone();
        changed.first_name = "Alexander".to_string();
        store.users().update_by_id(id, &changed).await.unwrap();
        let fetched = store.users().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Alexander");
        assert_eq!(fetched.password_hash, "hash");

        // Delete
        store.users().delete_by_id(id).await.unwrap();
        assert!(store.users().get_by_id(id).await.unwrap().is_none());
        let err = store.users().delete_by_id(id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_room_round_trip_and_filter() {
        let store = store().await;
        let hotel = Hotel::new("Hotel 1", "Berlin");
        store.hotels().create(&hotel).await.unwrap();

        let room = Room::new(RoomType::SeaSide, 120.5, hotel.id).with_price(30.0);
        store.rooms().create(&room).await.unwrap();
        let other = Room::new(RoomType::Single, 80.0, Uuid::new_v4());
        store.rooms().create(&other).await.unwrap();

        let fetched = store.rooms().get_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(fetched, room);

        let filter = RoomFilter::new().with_hotel(hotel.id);
        let rooms = store.rooms().get(&filter).await.unwrap();
        assert_eq!(rooms, vec![room]);
        assert_eq!(store.rooms().get_count(&filter).await.unwrap(), 1);
        assert_eq!(
            store.rooms().get_count(&RoomFilter::new()).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_booking_overlap_count() {
        let store = store().await;
        let room_id = Uuid::new_v4();
        let stored = booking(room_id, "2024-02-01", "2024-02-05");
        store.bookings().create(&stored).await.unwrap();

        let candidate = booking(room_id, "2024-02-05", "2024-02-07");
        let count = store
            .bookings()
            .get_count(&BookingFilter::conflicts_with(&candidate))
            .await
            .unwrap();
        assert_eq!(count, 1);

        let count = store
            .bookings()
            .get_count(&BookingFilter::conflicts_with(&stored))
            .await
            .unwrap();
        assert_eq!(count, 0);

        let later = booking(room_id, "2024-02-06", "2024-02-07");
        let count = store
            .bookings()
            .get_count(&BookingFilter::conflicts_with(&later))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_conditional_booking_writes() {
        let store = store().await;
        let room_id = Uuid::new_v4();

        let first = booking(room_id, "2024-02-01", "2024-02-05");
        let write = store.bookings().create_if_free(&first).await.unwrap();
        assert_eq!(write, BookingWrite::Committed(first.id));

        let clash = booking(room_id, "2024-02-03", "2024-02-08");
        let write = store.bookings().create_if_free(&clash).await.unwrap();
        assert_eq!(write, BookingWrite::Occupied);
        assert!(store.bookings().get_by_id(clash.id).await.unwrap().is_none());

        let second = booking(room_id, "2024-02-10", "2024-02-12");
        store.bookings().create_if_free(&second).await.unwrap();

        // Moving the first booking within its own dates is fine.
        let mut shifted = first.clone();
        shifted.date_to = "2024-02-06".parse().unwrap();
        shifted.total_cost = 500.0;
        let write = store
            .bookings()
            .update_if_free(first.id, &shifted)
            .await
            .unwrap();
        assert_eq!(write, BookingWrite::Committed(first.id));
        let fetched = store.bookings().get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(fetched, shifted);

        // Moving it onto the second booking is not.
        let mut onto_second = first.clone();
        onto_second.date_to = "2024-02-11".parse().unwrap();
        let write = store
            .bookings()
            .update_if_free(first.id, &onto_second)
            .await
            .unwrap();
        assert_eq!(write, BookingWrite::Occupied);

        let err = store
            .bookings()
            .update_if_free(Uuid::new_v4(), &shifted)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_overlapping_creates() {
        let store = Arc::new(store().await);
        let room_id = Uuid::new_v4();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let candidate = booking(room_id, "2024-03-01", "2024-03-04");
                tokio::spawn(async move { store.bookings().create_if_free(&candidate).await })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if let BookingWrite::Committed(_) = handle.await.unwrap().unwrap() {
                committed += 1;
            }
        }
        assert_eq!(committed, 1);
    }

    #[tokio::test]
    async fn test_cancelled_write_releases_connection() {
        let store = Arc::new(store().await);

        for yields in 0..5 {
            let writer = Arc::clone(&store);
            let candidate = booking(Uuid::new_v4(), "2024-05-01", "2024-05-03");
            let handle =
                tokio::spawn(async move { writer.bookings().create_if_free(&candidate).await });
            for _ in 0..yields {
                tokio::task::yield_now().await;
            }
            handle.abort();
            let _ = handle.await;

            let next = booking(Uuid::new_v4(), "2024-05-01", "2024-05-03");
            let write = store.bookings().create_if_free(&next).await.unwrap();
            assert_eq!(write, BookingWrite::Committed(next.id), "after {yields} yields");
        }
    }

    #[tokio::test]
    async fn test_overlap_past_year_9999() {
        let store = store().await;
        let room_id = Uuid::new_v4();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        let existing = Booking::new(room_id, Uuid::new_v4(), date(9999, 12, 30), date(10000, 1, 2));
        store.bookings().create_if_free(&existing).await.unwrap();

        let clash = Booking::new(room_id, Uuid::new_v4(), date(10000, 1, 1), date(10000, 1, 1));
        let write = store.bookings().create_if_free(&clash).await.unwrap();
        assert_eq!(write, BookingWrite::Occupied);

        let fetched = store.bookings().get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(fetched, existing);
    }

    #[tokio::test]
    async fn test_booking_filters() {
        let store = store().await;
        let room_id = Uuid::new_v4();
        let mine = booking(room_id, "2024-04-01", "2024-04-02");
        let theirs = booking(room_id, "2024-04-05", "2024-04-06");
        store.bookings().create(&mine).await.unwrap();
        store.bookings().create(&theirs).await.unwrap();

        let filter = BookingFilter::new().with_user(mine.user_id);
        let found = store.bookings().get(&filter).await.unwrap();
        assert_eq!(found, vec![mine.clone()]);

        let filter = BookingFilter::new().with_room(room_id);
        let found = store.bookings().get(&filter).await.unwrap();
        assert_eq!(found, vec![mine, theirs]);
    }
}
