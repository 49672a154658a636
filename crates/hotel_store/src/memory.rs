//! In-memory store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Booking, Hotel, Room, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    BookingFilter, BookingRepository, BookingWrite, Entity, Repository, Store, StoreError,
    StoreResult, UserRepository,
};

/// One collection of entities held in a map.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    items: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Entity> MemoryCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(items: &HashMap<Uuid, T>, entity: &T, skip: Option<Uuid>) -> StoreResult<()> {
        let Some(key) = entity.unique_key() else {
            return Ok(());
        };
        let taken = items
            .iter()
            .any(|(id, other)| Some(*id) != skip && other.unique_key() == Some(key));
        if taken {
            return Err(StoreError::already_exists(T::KIND, key));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryCollection<T> {
    async fn create(&self, entity: &T) -> StoreResult<Uuid> {
        let mut items = self.items.write().await;
        let id = entity.id();
        if items.contains_key(&id) {
            return Err(StoreError::already_exists(T::KIND, id.to_string()));
        }
        Self::check_unique(&items, entity, None)?;
        items.insert(id, entity.clone());
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn get(&self, filter: &T::Filter) -> StoreResult<Vec<T>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.matches(filter))
            .cloned()
            .collect())
    }

    async fn get_count(&self, filter: &T::Filter) -> StoreResult<u64> {
        let items = self.items.read().await;
        Ok(items.values().filter(|item| item.matches(filter)).count() as u64)
    }

    async fn update_by_id(&self, id: Uuid, entity: &T) -> StoreResult<()> {
        let mut items = self.items.write().await;
        if !items.contains_key(&id) {
            return Err(StoreError::not_found(T::KIND, id));
        }
        Self::check_unique(&items, entity, Some(id))?;
        let mut entity = entity.clone();
        entity.set_id(id);
        items.insert(id, entity);
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let mut items = self.items.write().await;
        if items.remove(&id).is_none() {
            return Err(StoreError::not_found(T::KIND, id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryCollection<User> {
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.items.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BookingRepository for MemoryCollection<Booking> {
    async fn create_if_free(&self, booking: &Booking) -> StoreResult<BookingWrite> {
        // The write guard is held from the overlap check through the insert.
        let mut bookings = self.items.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(StoreError::already_exists(Booking::KIND, booking.id.to_string()));
        }
        let filter = BookingFilter::conflicts_with(booking);
        if bookings.values().any(|b| b.matches(&filter)) {
            return Ok(BookingWrite::Occupied);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(BookingWrite::Committed(booking.id))
    }

    async fn update_if_free(&self, id: Uuid, booking: &Booking) -> StoreResult<BookingWrite> {
        let mut bookings = self.items.write().await;
        if !bookings.contains_key(&id) {
            return Err(StoreError::not_found(Booking::KIND, id));
        }
        let mut booking = booking.clone();
        booking.id = id;
        let filter = BookingFilter::conflicts_with(&booking);
        if bookings.values().any(|b| b.matches(&filter)) {
            return Ok(BookingWrite::Occupied);
        }
        bookings.insert(id, booking);
        Ok(BookingWrite::Committed(id))
    }
}

/// In-memory store for tests and single-process runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: MemoryCollection<User>,
    hotels: MemoryCollection<Hotel>,
    rooms: MemoryCollection<Room>,
    bookings: MemoryCollection<Booking>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    type Users = MemoryCollection<User>;
    type Hotels = MemoryCollection<Hotel>;
    type Rooms = MemoryCollection<Room>;
    type Bookings = MemoryCollection<Booking>;

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
