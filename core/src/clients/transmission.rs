//! Client for the support-notifications transmission API.

use std::sync::Arc;
use std::time::Duration;

use crate::dtos::{BaseResponse, MultiTransmissionsResponse, TransmissionResponse};
use crate::error::ApiError;
use crate::http::{AuthInjector, Transport};
use crate::request::{QueryParams, Requester, RoutePath};
use crate::routes::{self, API_ALL_TRANSMISSION_ROUTE, API_TRANSMISSION_ROUTE};

/// Queries transmissions (delivery attempts of notifications).
#[derive(Debug, Clone)]
pub struct TransmissionClient {
    requester: Requester,
}

impl TransmissionClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            requester: Requester::new(base_url, transport),
        }
    }

    pub fn with_auth(self, auth: Arc<dyn AuthInjector>) -> Self {
        Self {
            requester: self.requester.with_auth(auth),
        }
    }

    /// A handle whose calls each give up after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            requester: self.requester.with_timeout(timeout),
        }
    }

    pub fn transmission_by_id(&self, id: &str) -> Result<TransmissionResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::ID)
            .param(id);
        self.requester.get(path, &QueryParams::new())
    }

    /// Transmissions created between `start` and `end` (milliseconds).
    pub fn transmissions_by_time_range(
        &self,
        start: i64,
        end: i64,
        offset: u32,
        limit: i32,
    ) -> Result<MultiTransmissionsResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::START)
            .param(start)
            .segment(routes::END)
            .param(end);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    pub fn all_transmissions(
        &self,
        offset: u32,
        limit: i32,
    ) -> Result<MultiTransmissionsResponse, ApiError> {
        self.requester
            .get(API_ALL_TRANSMISSION_ROUTE, &QueryParams::paginated(offset, limit))
    }

    pub fn transmissions_by_status(
        &self,
        status: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiTransmissionsResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::STATUS)
            .param(status);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    /// Delete processed transmissions older than `age` milliseconds.
    pub fn delete_processed_transmissions_by_age(&self, age: i64) -> Result<BaseResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::AGE)
            .param(age);
        self.requester.delete(path)
    }

    pub fn transmissions_by_subscription_name(
        &self,
        subscription_name: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiTransmissionsResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::SUBSCRIPTION)
            .segment(routes::NAME)
            .param(subscription_name);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    pub fn transmissions_by_notification_id(
        &self,
        notification_id: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiTransmissionsResponse, ApiError> {
        let path = RoutePath::new(API_TRANSMISSION_ROUTE)
            .segment(routes::NOTIFICATION)
            .segment(routes::ID)
            .param(notification_id);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }
}
