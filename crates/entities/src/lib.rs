//! Core entity definitions for the hotel reservation backend.
//!
//! This crate defines the persisted records (users, hotels, rooms and
//! bookings), the request-scoped "unfolded" views assembled from them, and the
//! field-keyed validation error map shared by every controller.

mod booking;
mod hotel;
mod room;
mod user;
mod validation;
mod views;

pub use booking::*;
pub use hotel::*;
pub use room::*;
pub use user::*;
pub use validation::*;
pub use views::*;
