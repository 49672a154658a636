//! RPC method definitions and request/response types

use serde::{Deserialize, Serialize};

/// All RPC method names
pub mod method_names {
    pub const GET_ROOM_PRICE: &str = "getRoomPrice";
}

/// Path the price service accepts RPC calls on
pub const RPC_PATH: &str = "/rpc";

/// Request for the nightly price of a room type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPriceRequest {
    /// Room type wire code
    #[serde(rename = "type")]
    pub room_type: i32,
}

/// Nightly price of a room type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPriceResponse {
    pub price: f64,
}
