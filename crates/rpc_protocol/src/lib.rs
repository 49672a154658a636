//! JSON-RPC protocol definitions for the room price service
//!
//! This crate defines the JSON-RPC 2.0 envelope and the method types used
//! between the hotel server and the room price service.

mod envelope;
mod error;
mod methods;

pub use envelope::*;
pub use error::*;
pub use methods::*;
