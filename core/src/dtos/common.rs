//! Envelope types shared by every request and response.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::API_VERSION;

/// Envelope carried by every request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRequest {
    #[serde(default)]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

impl BaseRequest {
    /// Current API version with a fresh random request id.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for BaseRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope carried by every response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse {
    #[serde(default)]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default)]
    pub status_code: u16,
}

impl BaseResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            request_id: request_id.to_string(),
            message: message.to_string(),
            status_code,
        }
    }
}

/// Response to a create call; `id` is the identifier the server assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseWithIdResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl BaseWithIdResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, id: &str) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub count: u32,
}

impl CountResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, count: u32) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_request_has_version_and_request_id() {
        let request = BaseRequest::new();
        assert_eq!(request.api_version, "v3");
        assert!(Uuid::parse_str(&request.request_id).is_ok());
        assert_ne!(request.request_id, BaseRequest::new().request_id);
    }

    #[test]
    fn empty_message_is_omitted() {
        let json = serde_json::to_value(BaseResponse::new("", "", 200)).unwrap();
        assert_eq!(json, serde_json::json!({"apiVersion": "v3", "statusCode": 200}));
    }

    #[test]
    fn base_with_id_response_is_flat() {
        let response: BaseWithIdResponse = serde_json::from_str(
            r#"{"apiVersion":"v3","requestId":"r1","statusCode":201,"id":"abc"}"#,
        )
        .unwrap();
        assert_eq!(response, BaseWithIdResponse::new("r1", "", 201, "abc"));
    }

    #[test]
    fn count_response_parses() {
        let response: CountResponse =
            serde_json::from_str(r#"{"apiVersion":"v3","statusCode":200,"count":42}"#).unwrap();
        assert_eq!(response.count, 42);
        assert_eq!(response.base.status_code, 200);
    }
}
