//! Client for the room price service.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use entities::RoomType;
use rpc_protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RPC_PATH, RequestId, RoomPriceRequest,
    RoomPriceResponse, method_names,
};
use thiserror::Error;
use tracing::debug;

/// Why a room could not be priced.
#[derive(Debug, Error)]
pub enum PriceLookupError {
    /// No answer: connection failure or timeout.
    #[error("Price service unreachable: {0}")]
    Network(String),

    #[error("Price service answered with HTTP {0}")]
    Status(u16),

    /// The answer was not a price for the request that was sent.
    #[error("Malformed price answer: {0}")]
    Malformed(String),

    #[error("Price service refused room type {room_type}: {error}")]
    Refused { room_type: i32, error: JsonRpcError },
}

/// Source of nightly room prices.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Returns the nightly price for a room type.
    async fn room_price(&self, room_type: RoomType) -> Result<f64, PriceLookupError>;
}

/// JSON-RPC client for the room price service.
pub struct RpcPriceClient {
    /// Full URL of the RPC endpoint
    endpoint: String,
    http_client: reqwest::Client,
    next_request: AtomicU64,
}

impl RpcPriceClient {
    /// Creates a client for the service at `server_url`. Every lookup,
    /// including reading the answer, is bounded by `timeout`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, PriceLookupError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceLookupError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: format!("{}{RPC_PATH}", server_url.trim_end_matches('/')),
            http_client,
            next_request: AtomicU64::new(1),
        })
    }
}

/// Reads the price out of an answer to request `sent`.
fn price_from(
    reply: JsonRpcResponse,
    sent: &RequestId,
    room_type: i32,
) -> Result<f64, PriceLookupError> {
    if reply.id.as_ref() != Some(sent) {
        return Err(PriceLookupError::Malformed(format!(
            "expected id {sent:?}, got {:?}",
            reply.id
        )));
    }
    if let Some(error) = reply.error {
        return Err(PriceLookupError::Refused { room_type, error });
    }

    let result = reply
        .result
        .ok_or_else(|| PriceLookupError::Malformed("neither price nor error".to_string()))?;
    let answer: RoomPriceResponse =
        serde_json::from_value(result).map_err(|e| PriceLookupError::Malformed(e.to_string()))?;
    Ok(answer.price)
}

#[async_trait]
impl PriceLookup for RpcPriceClient {
    async fn room_price(&self, room_type: RoomType) -> Result<f64, PriceLookupError> {
        let code = room_type.code();
        let id = RequestId::Number(self.next_request.fetch_add(1, Ordering::Relaxed) as i64);
        let params = serde_json::to_value(RoomPriceRequest { room_type: code })
            .map_err(|e| PriceLookupError::Malformed(e.to_string()))?;
        let request = JsonRpcRequest::new(id.clone(), method_names::GET_ROOM_PRICE, params);

        debug!(room_type = code, endpoint = %self.endpoint, "Requesting room price");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| PriceLookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceLookupError::Status(status.as_u16()));
        }

        // The body can still time out after the headers arrived.
        let reply: JsonRpcResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PriceLookupError::Network(e.to_string())
            } else {
                PriceLookupError::Malformed(e.to_string())
            }
        })?;

        let price = price_from(reply, &id, code)?;
        debug!(room_type = code, price, "Room priced");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rpc_protocol::ErrorCode;
    use serde_json::json;

    use super::*;
    use crate::services::test_support::spawn_price_service;

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_error() {
        // Port 9 (discard) is not served on the test host.
        let client =
            RpcPriceClient::new("http://127.0.0.1:9/", Duration::from_millis(200)).unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:9/rpc");

        let err = client.room_price(RoomType::Single).await.unwrap_err();
        assert!(matches!(err, PriceLookupError::Network(_)));
    }

    #[tokio::test]
    async fn test_prices_from_a_live_service() {
        let url = spawn_price_service(Duration::ZERO).await;

        let client = RpcPriceClient::new(&url, Duration::from_secs(2)).unwrap();
        assert_eq!(client.room_price(RoomType::Deluxe).await.unwrap(), 40.0);
        assert_eq!(client.room_price(RoomType::Double).await.unwrap(), 20.0);
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let url = spawn_price_service(Duration::from_secs(5)).await;
        let client = RpcPriceClient::new(&url, Duration::from_millis(100)).unwrap();

        let started = Instant::now();
        let err = client.room_price(RoomType::SeaSide).await.unwrap_err();

        assert!(matches!(err, PriceLookupError::Network(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_answers_are_matched_to_the_request() {
        let sent = RequestId::Number(7);

        let ok = JsonRpcResponse::success(Some(sent.clone()), json!({ "price": 30.0 }));
        assert_eq!(price_from(ok, &sent, 15).unwrap(), 30.0);

        let stray = JsonRpcResponse::success(Some(RequestId::Number(8)), json!({ "price": 1.0 }));
        assert!(matches!(
            price_from(stray, &sent, 15),
            Err(PriceLookupError::Malformed(_))
        ));

        let refused =
            JsonRpcResponse::error(Some(sent.clone()), JsonRpcError::invalid_params("bad type"));
        match price_from(refused, &sent, 3) {
            Err(PriceLookupError::Refused { room_type, error }) => {
                assert_eq!(room_type, 3);
                assert_eq!(error.kind(), Some(ErrorCode::InvalidParams));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
