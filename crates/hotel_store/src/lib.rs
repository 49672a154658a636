//! Storage for the hotel reservation backend.
//!
//! This crate provides a generic [`Repository`] abstraction over collections
//! of entities, typed filters for each entity, and two backends: an in-memory
//! store used by tests and single-process runs, and a SQLite store built on
//! sqlx.
//!
//! Booking writes go through [`BookingRepository`], whose conditional writes
//! re-check room availability inside the write itself so that two concurrent
//! requests cannot both book the same room for overlapping dates.

mod error;
mod filters;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use filters::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
