//! Store trait definitions.

use async_trait::async_trait;
use entities::{Booking, Hotel, Room, User};
use uuid::Uuid;

use crate::StoreResult;

/// A record kept in a collection, addressed by an opaque id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Query filter accepted by [`Repository::get`] and
    /// [`Repository::get_count`]. The default value matches everything.
    type Filter: Default + Clone + Send + Sync + 'static;

    /// Human-readable entity name used in errors and logs.
    const KIND: &'static str;

    /// Returns the id of this record.
    fn id(&self) -> Uuid;

    /// Overwrites the id of this record.
    fn set_id(&mut self, id: Uuid);

    /// Returns true if this record satisfies the filter.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Key that must be unique across the collection, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// Generic create/get/update/delete operations on one collection.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Inserts a new record and returns its id.
    async fn create(&self, entity: &T) -> StoreResult<Uuid>;

    /// Gets a record by id. Returns `Ok(None)` if there is none.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Lists records matching the filter.
    async fn get(&self, filter: &T::Filter) -> StoreResult<Vec<T>>;

    /// Counts records matching the filter.
    async fn get_count(&self, filter: &T::Filter) -> StoreResult<u64>;

    /// Replaces the record stored under `id`. The id inside `entity` is
    /// ignored.
    async fn update_by_id(&self, id: Uuid, entity: &T) -> StoreResult<()>;

    /// Deletes the record stored under `id`.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()>;
}

/// User collection with lookup by email.
#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Gets a user by email address.
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Outcome of a conditional booking write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingWrite {
    /// The booking was written under this id.
    Committed(Uuid),
    /// Another booking holds the room for an overlapping range; nothing was
    /// written.
    Occupied,
}

/// Booking collection with availability-checked writes.
#[async_trait]
pub trait BookingRepository: Repository<Booking> {
    /// Inserts the booking unless another booking of the same room overlaps
    /// its dates. The check and the insert are one atomic step.
    async fn create_if_free(&self, booking: &Booking) -> StoreResult<BookingWrite>;

    /// Replaces the booking stored under `id` unless a different booking of
    /// the target room overlaps the new dates. The check and the write are one
    /// atomic step.
    async fn update_if_free(&self, id: Uuid, booking: &Booking) -> StoreResult<BookingWrite>;
}

/// The full set of repositories backing the service.
pub trait Store: Send + Sync + 'static {
    type Users: UserRepository;
    type Hotels: Repository<Hotel>;
    type Rooms: Repository<Room>;
    type Bookings: BookingRepository;

    /// User collection.
    fn users(&self) -> &Self::Users;

    /// Hotel collection.
    fn hotels(&self) -> &Self::Hotels;

    /// Room collection.
    fn rooms(&self) -> &Self::Rooms;

    /// Booking collection.
    fn bookings(&self) -> &Self::Bookings;
}
