//! In-memory stand-in for the platform's core-data, core-metadata and
//! support-notifications REST services.
//!
//! Records are kept as raw JSON so the server stays independent of the client
//! crate's DTOs; integration tests catch schema drift between the two.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_VERSION: &str = "v3";

/// Multipart field carrying an uploaded profile definition.
pub const UPLOAD_FILE_FIELD: &str = "file";

#[derive(Default)]
struct Store {
    profiles: BTreeMap<String, Value>,
    transmissions: Vec<Value>,
    events: Vec<Value>,
}

/// Shared server state. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    resource_lookups: Arc<AtomicUsize>,
    response_delay_ms: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transmission record; these are produced server-side in the real
    /// service, so there is no API to create them.
    pub async fn seed_transmission(&self, transmission: Value) {
        self.store.write().await.transmissions.push(transmission);
    }

    /// Number of device resource lookups served so far.
    pub fn resource_lookups(&self) -> usize {
        self.resource_lookups.load(Ordering::SeqCst)
    }

    /// Hold every subsequent response for `delay` before answering.
    pub fn set_response_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.response_delay_ms.store(millis, Ordering::SeqCst);
    }

    fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms.load(Ordering::SeqCst))
    }
}

type Reply = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_limit")]
    limit: i64,
    labels: Option<String>,
}

fn default_limit() -> i64 {
    20
}

impl Page {
    fn apply(&self, items: Vec<Value>) -> Vec<Value> {
        let items = items.into_iter().skip(self.offset);
        match usize::try_from(self.limit) {
            Ok(limit) => items.take(limit).collect(),
            Err(_) => items.collect(),
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        // core-metadata
        .route("/api/v3/deviceprofile", post(add_profiles).put(update_profiles))
        .route("/api/v3/deviceprofile/all", get(all_profiles))
        .route(
            "/api/v3/deviceprofile/uploadfile",
            post(upload_profile).put(upload_profile_update),
        )
        .route(
            "/api/v3/deviceprofile/name/{name}",
            get(profile_by_name).delete(delete_profile_by_name),
        )
        .route("/api/v3/deviceprofile/model/{model}", get(profiles_by_model))
        .route(
            "/api/v3/deviceprofile/manufacturer/{manufacturer}",
            get(profiles_by_manufacturer),
        )
        .route(
            "/api/v3/deviceprofile/manufacturer/{manufacturer}/model/{model}",
            get(profiles_by_manufacturer_and_model),
        )
        .route(
            "/api/v3/deviceresource/profile/{profile}/resource/{resource}",
            get(resource_by_profile_and_name),
        )
        // support-notifications
        .route("/api/v3/transmission/all", get(all_transmissions))
        .route("/api/v3/transmission/id/{id}", get(transmission_by_id))
        .route("/api/v3/transmission/status/{status}", get(transmissions_by_status))
        .route(
            "/api/v3/transmission/start/{start}/end/{end}",
            get(transmissions_by_time_range),
        )
        .route(
            "/api/v3/transmission/subscription/name/{name}",
            get(transmissions_by_subscription),
        )
        .route(
            "/api/v3/transmission/notification/id/{id}",
            get(transmissions_by_notification),
        )
        .route("/api/v3/transmission/age/{age}", delete(delete_transmissions_by_age))
        // core-data
        .route(
            "/api/v3/event/{service}/{profile}/{device}/{source}",
            post(add_event),
        )
        .route("/api/v3/event/all", get(all_events))
        .route("/api/v3/event/count", get(event_count))
        .route("/api/v3/event/count/device/name/{name}", get(event_count_by_device))
        .route(
            "/api/v3/event/device/name/{name}",
            get(events_by_device).delete(delete_events_by_device),
        )
        .route("/api/v3/event/start/{start}/end/{end}", get(events_by_time_range))
        .route("/api/v3/event/age/{age}", delete(delete_events_by_age))
        .layer(middleware::from_fn_with_state(state.clone(), delay_responses))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn delay_responses(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let delay = state.response_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    next.run(request).await
}

fn base(status: StatusCode) -> Value {
    json!({ "apiVersion": API_VERSION, "statusCode": status.as_u16() })
}

/// Response envelope with `fields` merged in.
fn envelope(status: StatusCode, fields: Value) -> Value {
    let mut body = base(status);
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), fields) {
        body.extend(fields);
    }
    body
}

fn error_envelope(status: StatusCode, message: impl Into<String>) -> Value {
    envelope(status, json!({ "message": message.into() }))
}

fn reply(status: StatusCode, fields: Value) -> Reply {
    (status, Json(envelope(status, fields)))
}

fn error(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, Json(error_envelope(status, message)))
}

fn multi(key: &str, page: &Page, items: Vec<Value>) -> Reply {
    let total = items.len();
    reply(
        StatusCode::OK,
        json!({ "totalCount": total, key: page.apply(items) }),
    )
}

fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn int_field(value: &Value, field: &str) -> i64 {
    value.get(field).and_then(Value::as_i64).unwrap_or_default()
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

// --- device profiles ---

fn insert_profile(store: &mut Store, mut profile: Value) -> (StatusCode, Value) {
    let name = str_field(&profile, "name").to_string();
    if name.is_empty() {
        let status = StatusCode::BAD_REQUEST;
        return (status, error_envelope(status, "profile name is required"));
    }
    if store.profiles.contains_key(&name) {
        let status = StatusCode::CONFLICT;
        return (status, error_envelope(status, format!("device profile {name} already exists")));
    }
    let id = Uuid::new_v4().to_string();
    profile["id"] = json!(id);
    store.profiles.insert(name, profile);
    let status = StatusCode::CREATED;
    (status, envelope(status, json!({ "id": id })))
}

fn replace_profile(store: &mut Store, mut profile: Value) -> (StatusCode, Value) {
    let name = str_field(&profile, "name").to_string();
    match store.profiles.get_mut(&name) {
        Some(existing) => {
            profile["id"] = existing["id"].clone();
            *existing = profile;
            (StatusCode::OK, base(StatusCode::OK))
        }
        None => {
            let status = StatusCode::NOT_FOUND;
            (status, error_envelope(status, format!("device profile {name} does not exist")))
        }
    }
}

async fn add_profiles(State(state): State<AppState>, Json(reqs): Json<Vec<Value>>) -> Reply {
    let mut store = state.store.write().await;
    let results: Vec<Value> = reqs
        .into_iter()
        .map(|req| insert_profile(&mut store, req.get("profile").cloned().unwrap_or(Value::Null)).1)
        .collect();
    (StatusCode::MULTI_STATUS, Json(Value::Array(results)))
}

async fn update_profiles(State(state): State<AppState>, Json(reqs): Json<Vec<Value>>) -> Reply {
    let mut store = state.store.write().await;
    let results: Vec<Value> = reqs
        .into_iter()
        .map(|req| replace_profile(&mut store, req.get("profile").cloned().unwrap_or(Value::Null)).1)
        .collect();
    (StatusCode::MULTI_STATUS, Json(Value::Array(results)))
}

/// Profile definition from the `file` field of a multipart upload. Only the
/// JSON flavour of YAML is understood.
async fn uploaded_profile(mut multipart: Multipart) -> Result<Value, Reply> {
    let bad_request = |message: String| error(StatusCode::BAD_REQUEST, message);
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FILE_FIELD) {
            continue;
        }
        let contents = field.text().await.map_err(|e| bad_request(e.to_string()))?;
        return serde_json::from_str(&contents)
            .map_err(|e| bad_request(format!("unreadable profile file: {e}")));
    }
    Err(bad_request(format!("missing {UPLOAD_FILE_FIELD} field")))
}

async fn upload_profile(State(state): State<AppState>, multipart: Multipart) -> Reply {
    let profile = match uploaded_profile(multipart).await {
        Ok(profile) => profile,
        Err(reply) => return reply,
    };
    let (status, body) = insert_profile(&mut *state.store.write().await, profile);
    (status, Json(body))
}

async fn upload_profile_update(State(state): State<AppState>, multipart: Multipart) -> Reply {
    let profile = match uploaded_profile(multipart).await {
        Ok(profile) => profile,
        Err(reply) => return reply,
    };
    let (status, body) = replace_profile(&mut *state.store.write().await, profile);
    (status, Json(body))
}

async fn profile_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Reply {
    let store = state.store.read().await;
    match store.profiles.get(&name) {
        Some(profile) => reply(StatusCode::OK, json!({ "profile": profile })),
        None => error(StatusCode::NOT_FOUND, format!("device profile {name} does not exist")),
    }
}

async fn delete_profile_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Reply {
    let mut store = state.store.write().await;
    match store.profiles.remove(&name) {
        Some(_) => reply(StatusCode::OK, json!({})),
        None => error(StatusCode::NOT_FOUND, format!("device profile {name} does not exist")),
    }
}

async fn filtered_profiles(state: &AppState, page: &Page, keep: impl Fn(&Value) -> bool) -> Reply {
    let store = state.store.read().await;
    let profiles = store.profiles.values().filter(|&p| keep(p)).cloned().collect();
    multi("profiles", page, profiles)
}

async fn all_profiles(State(state): State<AppState>, Query(page): Query<Page>) -> Reply {
    let wanted: Vec<String> = page
        .labels
        .as_deref()
        .map(|labels| labels.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    filtered_profiles(&state, &page, |profile| {
        let labels = profile.get("labels").and_then(Value::as_array);
        wanted.iter().all(|label| {
            labels.is_some_and(|labels| labels.iter().any(|l| l.as_str() == Some(label)))
        })
    })
    .await
}

async fn profiles_by_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_profiles(&state, &page, |p| str_field(p, "model") == model).await
}

async fn profiles_by_manufacturer(
    State(state): State<AppState>,
    Path(manufacturer): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_profiles(&state, &page, |p| str_field(p, "manufacturer") == manufacturer).await
}

async fn profiles_by_manufacturer_and_model(
    State(state): State<AppState>,
    Path((manufacturer, model)): Path<(String, String)>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_profiles(&state, &page, |p| {
        str_field(p, "manufacturer") == manufacturer && str_field(p, "model") == model
    })
    .await
}

async fn resource_by_profile_and_name(
    State(state): State<AppState>,
    Path((profile, resource)): Path<(String, String)>,
) -> Reply {
    state.resource_lookups.fetch_add(1, Ordering::SeqCst);
    let store = state.store.read().await;
    let found = store
        .profiles
        .get(&profile)
        .and_then(|p| p.get("deviceResources"))
        .and_then(Value::as_array)
        .and_then(|resources| resources.iter().find(|r| str_field(r, "name") == resource));
    match found {
        Some(found) => reply(StatusCode::OK, json!({ "resource": found })),
        None => error(
            StatusCode::NOT_FOUND,
            format!("device resource {resource} of profile {profile} does not exist"),
        ),
    }
}

// --- transmissions ---

async fn filtered_transmissions(
    state: &AppState,
    page: &Page,
    keep: impl Fn(&Value) -> bool,
) -> Reply {
    let store = state.store.read().await;
    let transmissions = store.transmissions.iter().filter(|&t| keep(t)).cloned().collect();
    multi("transmissions", page, transmissions)
}

async fn all_transmissions(State(state): State<AppState>, Query(page): Query<Page>) -> Reply {
    filtered_transmissions(&state, &page, |_| true).await
}

async fn transmission_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let store = state.store.read().await;
    match store.transmissions.iter().find(|t| str_field(t, "id") == id) {
        Some(transmission) => reply(StatusCode::OK, json!({ "transmission": transmission })),
        None => error(StatusCode::NOT_FOUND, format!("transmission {id} does not exist")),
    }
}

async fn transmissions_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_transmissions(&state, &page, |t| str_field(t, "status") == status).await
}

async fn transmissions_by_time_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(i64, i64)>,
    Query(page): Query<Page>,
) -> Reply {
    if start > end {
        return error(StatusCode::BAD_REQUEST, "end must not be before start");
    }
    filtered_transmissions(&state, &page, |t| (start..=end).contains(&int_field(t, "created"))).await
}

async fn transmissions_by_subscription(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_transmissions(&state, &page, |t| str_field(t, "subscriptionName") == name).await
}

async fn transmissions_by_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_transmissions(&state, &page, |t| str_field(t, "notificationId") == id).await
}

/// Processed means no further resend is pending.
async fn delete_transmissions_by_age(State(state): State<AppState>, Path(age): Path<i64>) -> Reply {
    let cutoff = now_millis().saturating_sub(age);
    let mut store = state.store.write().await;
    store
        .transmissions
        .retain(|t| str_field(t, "status") == "RESENDING" || int_field(t, "created") >= cutoff);
    reply(StatusCode::ACCEPTED, json!({}))
}

// --- events ---

async fn add_event(
    State(state): State<AppState>,
    Path((_service, profile, device, source)): Path<(String, String, String, String)>,
    Json(req): Json<Value>,
) -> Reply {
    let Some(event) = req.get("event") else {
        return error(StatusCode::BAD_REQUEST, "missing event");
    };
    if str_field(event, "profileName") != profile
        || str_field(event, "deviceName") != device
        || str_field(event, "sourceName") != source
    {
        return error(StatusCode::BAD_REQUEST, "event does not match request path");
    }
    let mut event = event.clone();
    let id = match str_field(&event, "id") {
        "" => Uuid::new_v4().to_string(),
        id => id.to_string(),
    };
    event["id"] = json!(id);
    state.store.write().await.events.push(event);
    reply(StatusCode::CREATED, json!({ "id": id }))
}

async fn filtered_events(state: &AppState, page: &Page, keep: impl Fn(&Value) -> bool) -> Reply {
    let store = state.store.read().await;
    let events = store.events.iter().filter(|&e| keep(e)).cloned().collect();
    multi("events", page, events)
}

async fn all_events(State(state): State<AppState>, Query(page): Query<Page>) -> Reply {
    filtered_events(&state, &page, |_| true).await
}

async fn event_count(State(state): State<AppState>) -> Reply {
    let count = state.store.read().await.events.len();
    reply(StatusCode::OK, json!({ "count": count }))
}

async fn event_count_by_device(State(state): State<AppState>, Path(name): Path<String>) -> Reply {
    let store = state.store.read().await;
    let count = store
        .events
        .iter()
        .filter(|e| str_field(e, "deviceName") == name)
        .count();
    reply(StatusCode::OK, json!({ "count": count, "deviceName": name }))
}

async fn events_by_device(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(page): Query<Page>,
) -> Reply {
    filtered_events(&state, &page, |e| str_field(e, "deviceName") == name).await
}

async fn delete_events_by_device(State(state): State<AppState>, Path(name): Path<String>) -> Reply {
    let mut store = state.store.write().await;
    store.events.retain(|e| str_field(e, "deviceName") != name);
    reply(StatusCode::ACCEPTED, json!({}))
}

async fn events_by_time_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(i64, i64)>,
    Query(page): Query<Page>,
) -> Reply {
    if start > end {
        return error(StatusCode::BAD_REQUEST, "end must not be before start");
    }
    filtered_events(&state, &page, |e| (start..=end).contains(&int_field(e, "origin"))).await
}

async fn delete_events_by_age(State(state): State<AppState>, Path(age): Path<i64>) -> Reply {
    let cutoff = now_millis().saturating_mul(1_000_000).saturating_sub(age);
    let mut store = state.store.write().await;
    store.events.retain(|e| int_field(e, "origin") >= cutoff);
    reply(StatusCode::ACCEPTED, json!({}))
}
