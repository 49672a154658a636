//! Token and password authentication for the hotel reservation backend.
//!
//! This crate provides:
//! - JWT access token generation and validation, carrying the admin flag
//! - bcrypt password hashing and verification off the async runtime

mod error;
mod jwt;
mod password;

pub use error::*;
pub use jwt::*;
pub use password::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 72;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "hotel-reservation";
