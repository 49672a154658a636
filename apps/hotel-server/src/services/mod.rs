//! Business logic behind the HTTP handlers.
//!
//! Handlers parse requests and pick status codes; everything else lives here.

pub mod booking;
pub mod compose;
pub mod hotel;
pub mod price_client;
pub mod room;
pub mod user;
pub mod validation;
