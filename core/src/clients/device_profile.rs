//! Client for the core-metadata device profile API.
//!
//! Device resources are looked up far more often than profiles change, so
//! `device_resource_by_profile_name_and_resource_name` memoizes its results
//! per client in a [`ResourceCache`]. The cache is never invalidated on its
//! own; call [`DeviceProfileClient::clean_resources_cache`] after changing a
//! profile's resources.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{composite_key, ResourceCache};
use crate::dtos::{
    BaseResponse, BaseWithIdResponse, DeviceProfileRequest, DeviceProfileResponse,
    DeviceResourceResponse, MultiDeviceProfilesResponse,
};
use crate::error::ApiError;
use crate::http::{AuthInjector, Transport};
use crate::request::{QueryParams, Requester, RoutePath};
use crate::routes::{
    self, API_ALL_DEVICE_PROFILE_ROUTE, API_DEVICE_PROFILE_ROUTE,
    API_DEVICE_PROFILE_UPLOAD_FILE_ROUTE, API_DEVICE_RESOURCE_ROUTE,
};

/// Clones share the device resource cache.
#[derive(Debug, Clone)]
pub struct DeviceProfileClient {
    requester: Requester,
    resources: Arc<ResourceCache<DeviceResourceResponse>>,
}

impl DeviceProfileClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            requester: Requester::new(base_url, transport),
            resources: Arc::new(ResourceCache::new()),
        }
    }

    pub fn with_auth(self, auth: Arc<dyn AuthInjector>) -> Self {
        Self {
            requester: self.requester.with_auth(auth),
            resources: self.resources,
        }
    }

    /// A handle whose calls each give up after `timeout`. It shares this
    /// client's resource cache.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            requester: self.requester.with_timeout(timeout),
            resources: Arc::clone(&self.resources),
        }
    }

    /// Add profiles; one result per request, in order.
    pub fn add(&self, reqs: &[DeviceProfileRequest]) -> Result<Vec<BaseWithIdResponse>, ApiError> {
        self.requester.post_json(API_DEVICE_PROFILE_ROUTE, reqs)
    }

    pub fn update(&self, reqs: &[DeviceProfileRequest]) -> Result<Vec<BaseResponse>, ApiError> {
        self.requester.put_json(API_DEVICE_PROFILE_ROUTE, reqs)
    }

    /// Add a profile by uploading its YAML definition.
    pub fn add_by_yaml(&self, yaml_file: &Path) -> Result<BaseWithIdResponse, ApiError> {
        self.requester
            .post_file(API_DEVICE_PROFILE_UPLOAD_FILE_ROUTE, yaml_file)
    }

    pub fn update_by_yaml(&self, yaml_file: &Path) -> Result<BaseResponse, ApiError> {
        self.requester
            .put_file(API_DEVICE_PROFILE_UPLOAD_FILE_ROUTE, yaml_file)
    }

    pub fn delete_by_name(&self, name: &str) -> Result<BaseResponse, ApiError> {
        self.requester.delete(by_name(name))
    }

    pub fn device_profile_by_name(&self, name: &str) -> Result<DeviceProfileResponse, ApiError> {
        self.requester.get(by_name(name), &QueryParams::new())
    }

    /// Profiles carrying every label in `labels` (all profiles when empty).
    pub fn all_device_profiles<S: AsRef<str>>(
        &self,
        labels: &[S],
        offset: u32,
        limit: i32,
    ) -> Result<MultiDeviceProfilesResponse, ApiError> {
        let query = QueryParams::paginated(offset, limit).labels(labels);
        self.requester.get(API_ALL_DEVICE_PROFILE_ROUTE, &query)
    }

    pub fn device_profiles_by_model(
        &self,
        model: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiDeviceProfilesResponse, ApiError> {
        let path = RoutePath::new(API_DEVICE_PROFILE_ROUTE)
            .segment(routes::MODEL)
            .param(model);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    pub fn device_profiles_by_manufacturer(
        &self,
        manufacturer: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiDeviceProfilesResponse, ApiError> {
        let path = RoutePath::new(API_DEVICE_PROFILE_ROUTE)
            .segment(routes::MANUFACTURER)
            .param(manufacturer);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    pub fn device_profiles_by_manufacturer_and_model(
        &self,
        manufacturer: &str,
        model: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiDeviceProfilesResponse, ApiError> {
        let path = RoutePath::new(API_DEVICE_PROFILE_ROUTE)
            .segment(routes::MANUFACTURER)
            .param(manufacturer)
            .segment(routes::MODEL)
            .param(model);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    /// Resource `resource_name` of profile `profile_name`, served from the
    /// cache after the first successful fetch. Failures are not cached.
    ///
    /// Entries are keyed by `profile:resource`, so names containing `:` can
    /// collide: `("a", "b:c")` and `("a:b", "c")` share one entry.
    pub fn device_resource_by_profile_name_and_resource_name(
        &self,
        profile_name: &str,
        resource_name: &str,
    ) -> Result<DeviceResourceResponse, ApiError> {
        let key = composite_key(profile_name, resource_name);
        if let Some(cached) = self.resources.lookup(&key) {
            tracing::trace!(%key, "device resource cache hit");
            return Ok(cached);
        }
        tracing::trace!(%key, "device resource cache miss");

        let path = RoutePath::new(API_DEVICE_RESOURCE_ROUTE)
            .segment(routes::PROFILE)
            .param(profile_name)
            .segment(routes::RESOURCE)
            .param(resource_name);
        let res: DeviceResourceResponse = self.requester.get(path, &QueryParams::new())?;
        self.resources.store(key, res.clone());
        Ok(res)
    }

    pub fn clean_resources_cache(&self) {
        tracing::trace!(entries = self.resources.len(), "clearing device resource cache");
        self.resources.clear();
    }
}

fn by_name(name: &str) -> RoutePath {
    RoutePath::new(API_DEVICE_PROFILE_ROUTE)
        .segment(routes::NAME)
        .param(name)
}
