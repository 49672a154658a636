//! JSON-RPC error object and the codes the price service answers with

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes reserved by JSON-RPC 2.0 that the price service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The body was not a valid request object
    InvalidRequest = -32600,
    /// No such method
    MethodNotFound = -32601,
    /// Params did not match the method
    InvalidParams = -32602,
    /// The service failed while answering
    InternalError = -32603,
}

impl ErrorCode {
    /// Looks up a code received on the wire. Codes outside the set above
    /// yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        [
            Self::InvalidRequest,
            Self::MethodNotFound,
            Self::InvalidParams,
            Self::InternalError,
        ]
        .into_iter()
        .find(|known| *known as i32 == code)
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
        }
    }

    /// The request envelope itself is unusable, e.g. a wrong version tag.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Unknown method {method:?}"))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The code as a known [`ErrorCode`], if it is one.
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let error = JsonRpcError::method_not_found("getHotelPrice");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["code"], -32601);
        assert_eq!(json["message"], "Unknown method \"getHotelPrice\"");
        assert_eq!(error.kind(), Some(ErrorCode::MethodNotFound));
    }

    #[test]
    fn test_foreign_codes_are_kept_verbatim() {
        let error: JsonRpcError =
            serde_json::from_str(r#"{"code": -32099, "message": "busy"}"#).unwrap();

        assert_eq!(error.code, -32099);
        assert_eq!(error.kind(), None);
        assert_eq!(error.to_string(), "busy (code -32099)");
    }
}
