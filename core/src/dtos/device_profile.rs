//! Device profiles and the device resources they declare.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{BaseRequest, BaseResponse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProperties {
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub read_write: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub assertion: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub media_type: String,
}

/// One readable/writable value a device exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub properties: ResourceProperties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOperation {
    pub device_resource: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, String>,
}

/// A named group of resource operations read or written together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommand {
    pub name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub read_write: String,
    #[serde(default)]
    pub resource_operations: Vec<ResourceOperation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manufacturer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub device_resources: Vec<DeviceResource>,
    #[serde(default)]
    pub device_commands: Vec<DeviceCommand>,
}

impl DeviceProfile {
    pub fn resource(&self, name: &str) -> Option<&DeviceResource> {
        self.device_resources.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    pub profile: DeviceProfile,
}

impl DeviceProfileRequest {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            base: BaseRequest::new(),
            profile,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub profile: DeviceProfile,
}

impl DeviceProfileResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, profile: DeviceProfile) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            profile,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDeviceProfilesResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub profiles: Vec<DeviceProfile>,
}

impl MultiDeviceProfilesResponse {
    pub fn new(
        request_id: &str,
        message: &str,
        status_code: u16,
        total_count: u32,
        profiles: Vec<DeviceProfile>,
    ) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            total_count,
            profiles,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResourceResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub resource: DeviceResource,
}

impl DeviceResourceResponse {
    pub fn new(request_id: &str, message: &str, status_code: u16, resource: DeviceResource) -> Self {
        Self {
            base: BaseResponse::new(request_id, message, status_code),
            resource,
        }
    }
}
