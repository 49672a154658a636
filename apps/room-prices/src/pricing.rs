//! Price table.

/// Nightly price for a room type wire code.
///
/// The price is derived from the code alone, so unknown codes are priced the
/// same way as known ones.
pub fn room_price(room_type: i32) -> f64 {
    f64::from(room_type) * 2.0
}
