//! Hotel entity definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationErrors;

/// Minimum length of a hotel name.
pub const MIN_HOTEL_NAME_LEN: usize = 2;
/// Minimum length of a hotel location.
pub const MIN_HOTEL_LOCATION_LEN: usize = 2;

/// A hotel. Rooms point back to it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique identifier.
    pub id: Uuid,
    /// Hotel name.
    pub name: String,
    /// Free-form location, usually a city.
    pub location: String,
}

impl Hotel {
    /// Creates a new hotel.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
        }
    }

    /// Validates name and location lengths.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.name.chars().count() < MIN_HOTEL_NAME_LEN {
            errors.add(
                "name",
                format!("Name length should be at least {MIN_HOTEL_NAME_LEN} characters"),
            );
        }
        if self.location.chars().count() < MIN_HOTEL_LOCATION_LEN {
            errors.add(
                "location",
                format!("Location length should be at least {MIN_HOTEL_LOCATION_LEN} characters"),
            );
        }

        errors
    }
}
