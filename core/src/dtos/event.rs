//! Events and the readings they carry.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{BaseRequest, BaseResponse};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub origin: i64,
    pub device_name: String,
    pub resource_name: String,
    pub profile_name: String,
    pub value_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub units: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub device_name: String,
    pub profile_name: String,
    pub source_name: String,
    #[serde(default)]
    pub origin: i64,
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, serde_json::Value>,
}

impl Event {
    /// A new event with a random id and the current time as origin.
    pub fn new(profile_name: &str, device_name: &str, source_name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device_name: device_name.to_string(),
            profile_name: profile_name.to_string(),
            source_name: source_name.to_string(),
            origin: now_nanos(),
            readings: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Append a reading of `resource_name`, stamped with this event's device,
    /// profile and origin.
    pub fn add_simple_reading(&mut self, resource_name: &str, value_type: &str, value: impl ToString) {
        self.readings.push(Reading {
            id: Uuid::new_v4().to_string(),
            origin: self.origin,
            device_name: self.device_name.clone(),
            resource_name: resource_name.to_string(),
            profile_name: self.profile_name.clone(),
            value_type: value_type.to_string(),
            value: value.to_string(),
            units: String::new(),
        });
    }
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEventRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    pub event: Event,
}

impl AddEventRequest {
    pub fn new(event: Event) -> Self {
        Self {
            base: BaseRequest::new(),
            event,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub event: Event,
}

impl EventResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, event: Event) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            event,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiEventsResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl MultiEventsResponse {
    pub fn new(
        request_id: &str,
        message: &str,
        status_code: u16,
        total_count: u32,
        events: Vec<Event>,
    ) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            total_count,
            events,
        }
    }
}

/// Number of events stored for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCountResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub device_name: String,
}

impl EventCountResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, count: u32, device_name: &str) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            count,
            device_name: device_name.to_string(),
        }
    }
}

/// Acknowledges that an event was pushed to the cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPushedByIdResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub id: String,
}

impl UpdateEventPushedByIdResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, id: &str) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            id: id.to_string(),
        }
    }
}
