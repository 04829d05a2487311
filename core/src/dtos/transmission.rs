//! Notification transmissions: one delivery attempt history per channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::BaseResponse;

/// Delivery channel of a notification. Channel-specific settings (HTTP
/// method, e-mail recipients, MQTT topic, ...) are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "type", default)]
    pub address_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionRecord {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub sent: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub notification_id: String,
    #[serde(default)]
    pub subscription_name: String,
    #[serde(default)]
    pub channel: Address,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub resend_count: u32,
    #[serde(default)]
    pub records: Vec<TransmissionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub transmission: Transmission,
}

impl TransmissionResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, transmission: Transmission) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            transmission,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTransmissionsResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub transmissions: Vec<Transmission>,
}

impl MultiTransmissionsResponse {
    pub fn new(
        request_id: &str,
        message: &str,
        status_code: u16,
        total_count: u32,
        transmissions: Vec<Transmission>,
    ) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            total_count,
            transmissions,
        }
    }
}
