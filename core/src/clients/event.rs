//! Client for the core-data event API.

use std::sync::Arc;
use std::time::Duration;

use crate::dtos::{
    AddEventRequest, BaseResponse, BaseWithIdResponse, CountResponse, EventCountResponse,
    MultiEventsResponse,
};
use crate::error::ApiError;
use crate::http::{AuthInjector, Transport};
use crate::request::{QueryParams, Requester, RoutePath};
use crate::routes::{self, API_ALL_EVENT_ROUTE, API_EVENT_COUNT_ROUTE, API_EVENT_ROUTE};

#[derive(Debug, Clone)]
pub struct EventClient {
    requester: Requester,
}

impl EventClient {
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

    /// Publish an event on behalf of `service_name`. Profile, device and
    /// source names in the path are taken from the event itself.
    pub fn add(&self, service_name: &str, req: &AddEventRequest) -> Result<BaseWithIdResponse, ApiError> {
        let path = RoutePath::new(API_EVENT_ROUTE)
            .param(service_name)
            .param(&req.event.profile_name)
            .param(&req.event.device_name)
            .param(&req.event.source_name);
        self.requester.post_json(path, req)
    }

    pub fn all_events(&self, offset: u32, limit: i32) -> Result<MultiEventsResponse, ApiError> {
        self.requester
            .get(API_ALL_EVENT_ROUTE, &QueryParams::paginated(offset, limit))
    }

    pub fn event_count(&self) -> Result<CountResponse, ApiError> {
        self.requester.get(API_EVENT_COUNT_ROUTE, &QueryParams::new())
    }

    pub fn event_count_by_device_name(&self, device_name: &str) -> Result<EventCountResponse, ApiError> {
        let path = RoutePath::new(API_EVENT_COUNT_ROUTE)
            .segment(routes::DEVICE)
            .segment(routes::NAME)
            .param(device_name);
        self.requester.get(path, &QueryParams::new())
    }

    pub fn events_by_device_name(
        &self,
        device_name: &str,
        offset: u32,
        limit: i32,
    ) -> Result<MultiEventsResponse, ApiError> {
        let path = by_device_name(device_name);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    pub fn delete_by_device_name(&self, device_name: &str) -> Result<BaseResponse, ApiError> {
        self.requester.delete(by_device_name(device_name))
    }

    /// Events whose origin lies between `start` and `end` (nanoseconds).
    pub fn events_by_time_range(
        &self,
        start: i64,
        end: i64,
        offset: u32,
        limit: i32,
    ) -> Result<MultiEventsResponse, ApiError> {
        let path = RoutePath::new(API_EVENT_ROUTE)
            .segment(routes::START)
            .param(start)
            .segment(routes::END)
            .param(end);
        self.requester.get(path, &QueryParams::paginated(offset, limit))
    }

    /// Delete events older than `age` nanoseconds.
    pub fn delete_by_age(&self, age: i64) -> Result<BaseResponse, ApiError> {
        let path = RoutePath::new(API_EVENT_ROUTE)
            .segment(routes::AGE)
            .param(age);
        self.requester.delete(path)
    }
}

fn by_device_name(device_name: &str) -> RoutePath {
    RoutePath::new(API_EVENT_ROUTE)
        .segment(routes::DEVICE)
        .segment(routes::NAME)
        .param(device_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::Event;
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;
    use crate::test_support::ScriptedTransport;

    const BASE_URL: &str = "http://localhost:59880";
    const MULTI_OK: &str = r#"{"apiVersion":"v3","statusCode":200,"totalCount":0,"events":[]}"#;

    fn client(transport: &Arc<ScriptedTransport>) -> EventClient {
        EventClient::new(BASE_URL, transport.clone())
    }

    #[test]
    fn add_posts_to_event_source_path() {
        let transport = ScriptedTransport::new();
        transport.push_json(201, r#"{"apiVersion":"v3","statusCode":201,"id":"e-1"}"#);
        let mut event = Event::new("Thermostat", "thermo 01", "Temperature");
        event.add_simple_reading("Temperature", "Float32", 21.5);
        let req = AddEventRequest::new(event);

        let res = client(&transport).add("device-virtual", &req).unwrap();
        assert_eq!(res.id, "e-1");

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(
            sent.path,
            format!("{BASE_URL}/api/v3/event/device-virtual/Thermostat/thermo%2001/Temperature")
        );
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["event"]["deviceName"], "thermo 01");
        assert_eq!(body["event"]["readings"][0]["value"], "21.5");
    }

    #[test]
    fn all_events_and_time_range() {
        let transport = ScriptedTransport::new();
        let c = client(&transport);

        transport.push_json(200, MULTI_OK);
        c.all_events(0, 20).unwrap();
        assert_eq!(
            transport.last_request().url(),
            format!("{BASE_URL}/api/v3/event/all?limit=20&offset=0")
        );

        transport.push_json(200, MULTI_OK);
        c.events_by_time_range(100, 200, 1, 2).unwrap();
        assert_eq!(
            transport.last_request().url(),
            format!("{BASE_URL}/api/v3/event/start/100/end/200?limit=2&offset=1")
        );
    }

    #[test]
    fn counts() {
        let transport = ScriptedTransport::new();
        let c = client(&transport);

        transport.push_json(200, r#"{"apiVersion":"v3","statusCode":200,"count":7}"#);
        assert_eq!(c.event_count().unwrap().count, 7);
        assert_eq!(transport.last_request().path, format!("{BASE_URL}/api/v3/event/count"));

        transport.push_json(
            200,
            r#"{"apiVersion":"v3","statusCode":200,"count":3,"deviceName":"thermo-01"}"#,
        );
        let res = c.event_count_by_device_name("thermo-01").unwrap();
        assert_eq!(res.count, 3);
        assert_eq!(res.device_name, "thermo-01");
        assert_eq!(
            transport.last_request().path,
            format!("{BASE_URL}/api/v3/event/count/device/name/thermo-01")
        );
    }

    #[test]
    fn by_device_name_get_and_delete() {
        let transport = ScriptedTransport::new();
        let c = client(&transport);

        transport.push_json(200, MULTI_OK);
        c.events_by_device_name("thermo-01", 0, 5).unwrap();
        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, format!("{BASE_URL}/api/v3/event/device/name/thermo-01"));

        transport.push_json(202, r#"{"apiVersion":"v3","statusCode":202}"#);
        c.delete_by_device_name("thermo-01").unwrap();
        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, format!("{BASE_URL}/api/v3/event/device/name/thermo-01"));
    }

    #[test]
    fn delete_by_age() {
        let transport = ScriptedTransport::new();
        transport.push_json(202, r#"{"apiVersion":"v3","statusCode":202}"#);
        client(&transport).delete_by_age(3_600_000_000_000).unwrap();
        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, format!("{BASE_URL}/api/v3/event/age/3600000000000"));
    }

    #[test]
    fn server_error_is_classified() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            500,
            r#"{"apiVersion":"v3","message":"database unavailable","statusCode":500}"#,
        );
        let err = client(&transport).event_count().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn malformed_body_is_deserialization_error() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, "not json");
        let err = client(&transport).all_events(0, 1).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
