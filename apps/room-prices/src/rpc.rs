//! JSON-RPC request handling

use axum::{Json, http::StatusCode};
use rpc_protocol::{
    JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RoomPriceRequest,
    RoomPriceResponse, method_names,
};
use tracing::debug;

use crate::pricing::room_price;

/// Handle a JSON-RPC request
pub async fn handle_rpc(
    Json(request): Json<JsonRpcRequest>,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let response = match dispatch_method(&request) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(error) => JsonRpcResponse::error(request.id, error),
    };

    (StatusCode::OK, Json(response))
}

/// Dispatch a method call to the appropriate handler
pub fn dispatch_method(request: &JsonRpcRequest) -> Result<serde_json::Value, JsonRpcError> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(JsonRpcError::invalid_request(format!(
            "Unsupported jsonrpc version {:?}",
            request.jsonrpc
        )));
    }

    match request.method.as_str() {
        method_names::GET_ROOM_PRICE => {
            let params: RoomPriceRequest = parse_params(&request.params)?;
            handle_get_room_price(params)
        }

        method => Err(JsonRpcError::method_not_found(method)),
    }
}

/// Parse JSON-RPC params
fn parse_params<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.clone()).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn handle_get_room_price(params: RoomPriceRequest) -> Result<serde_json::Value, JsonRpcError> {
    let price = room_price(params.room_type);
    debug!(room_type = params.room_type, price, "Priced room type");

    serde_json::to_value(RoomPriceResponse { price })
        .map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
