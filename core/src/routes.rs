//! Route prefixes, path segment names and query keys of the v3 REST API.

pub const API_VERSION: &str = "v3";

pub const API_TRANSMISSION_ROUTE: &str = "/api/v3/transmission";
pub const API_ALL_TRANSMISSION_ROUTE: &str = "/api/v3/transmission/all";

pub const API_DEVICE_PROFILE_ROUTE: &str = "/api/v3/deviceprofile";
pub const API_ALL_DEVICE_PROFILE_ROUTE: &str = "/api/v3/deviceprofile/all";
pub const API_DEVICE_PROFILE_UPLOAD_FILE_ROUTE: &str = "/api/v3/deviceprofile/uploadfile";
pub const API_DEVICE_RESOURCE_ROUTE: &str = "/api/v3/deviceresource";

pub const API_EVENT_ROUTE: &str = "/api/v3/event";
pub const API_ALL_EVENT_ROUTE: &str = "/api/v3/event/all";
pub const API_EVENT_COUNT_ROUTE: &str = "/api/v3/event/count";

// Path segments
pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const START: &str = "start";
pub const END: &str = "end";
pub const STATUS: &str = "status";
pub const AGE: &str = "age";
pub const SUBSCRIPTION: &str = "subscription";
pub const NOTIFICATION: &str = "notification";
pub const MODEL: &str = "model";
pub const MANUFACTURER: &str = "manufacturer";
pub const PROFILE: &str = "profile";
pub const RESOURCE: &str = "resource";
pub const DEVICE: &str = "device";
pub const COUNT: &str = "count";

// Query keys
pub const OFFSET: &str = "offset";
pub const LIMIT: &str = "limit";
pub const LABELS: &str = "labels";

pub const COMMA_SEPARATOR: &str = ",";

/// Multipart field carrying an uploaded profile definition.
pub const UPLOAD_FILE_FIELD: &str = "file";
