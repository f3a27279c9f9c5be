//! Common JSON response envelope.
//!
//! Every endpoint answers with the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "error": null }
//! { "success": false, "data": null,   "error": { "code": "...", "message": "..." } }
//! ```

use serde::{Deserialize, Serialize};

/// Machine-readable error payload inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

/// The common response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failure response with a code and message.
    pub fn fail(code: &str, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without data (mutations).
    pub fn ok_empty() -> Self {
        ApiResponse {
            success: true,
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let resp = ApiResponse::ok(42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_fail_envelope() {
        let resp = ApiResponse::<()>::fail("NOT_FOUND", "item not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
