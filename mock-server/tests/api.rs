use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn thermostat() -> Value {
    json!({
        "apiVersion": "v3",
        "profile": {
            "name": "Thermostat",
            "manufacturer": "Acme",
            "model": "TH-100",
            "labels": ["hvac"],
            "deviceResources": [
                {"name": "Temperature", "properties": {"valueType": "Float32", "readWrite": "R"}}
            ]
        }
    })
}

// --- unknown routes ---

#[tokio::test]
async fn unknown_route_is_404_with_empty_body() {
    let resp = app().oneshot(get("/api/v3/nothing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- device profiles ---

#[tokio::test]
async fn all_profiles_empty() {
    let resp = app().oneshot(get("/api/v3/deviceprofile/all")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["profiles"], json!([]));
}

#[tokio::test]
async fn add_profile_returns_multi_status() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v3/deviceprofile", &json!([thermostat()])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::MULTI_STATUS);
    let body = body_json(resp).await;
    assert_eq!(body[0]["statusCode"], 201);
    assert!(body[0]["id"].is_string());
}

#[tokio::test]
async fn add_duplicate_profile_reports_conflict_entry() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v3/deviceprofile",
            &json!([thermostat(), thermostat()]),
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body[0]["statusCode"], 201);
    assert_eq!(body[1]["statusCode"], 409);
    assert!(body[1]["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn profile_by_name_not_found() {
    let resp = app()
        .oneshot(get("/api/v3/deviceprofile/name/Missing"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["statusCode"], 404);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn profile_lifecycle() {
    use tower::Service;

    let state = AppState::new();
    let mut app = app_with_state(state.clone()).into_service();

    // add
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/v3/deviceprofile", &json!([thermostat()])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::MULTI_STATUS);

    // by manufacturer and model
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v3/deviceprofile/manufacturer/Acme/model/TH-100?offset=0&limit=5"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["profiles"][0]["name"], "Thermostat");

    // label filter that matches nothing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v3/deviceprofile/all?labels=hvac,camera"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["totalCount"], 0);

    // device resource lookup is counted
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v3/deviceresource/profile/Thermostat/resource/Temperature"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["resource"]["properties"]["valueType"], "Float32");
    assert_eq!(state.resource_lookups(), 1);

    // update
    let mut updated = thermostat();
    updated["profile"]["model"] = json!("TH-200");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/v3/deviceprofile", &json!([updated])))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await[0]["statusCode"], 200);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v3/deviceprofile/model/TH-200"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["totalCount"], 1);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete("/api/v3/deviceprofile/name/Thermostat"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // gone after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v3/deviceprofile/name/Thermostat"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- transmissions ---

#[tokio::test]
async fn transmissions_filter_and_page() {
    let state = AppState::new();
    for (id, status, created) in [("t1", "SENT", 1000), ("t2", "FAILED", 2000), ("t3", "SENT", 3000)] {
        state
            .seed_transmission(json!({
                "id": id,
                "status": status,
                "created": created,
                "subscriptionName": "alerts",
                "notificationId": "n-1"
            }))
            .await;
    }

    let resp = app_with_state(state.clone())
        .oneshot(get("/api/v3/transmission/status/SENT?offset=1&limit=5"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["transmissions"][0]["id"], "t3");

    let resp = app_with_state(state.clone())
        .oneshot(get("/api/v3/transmission/start/1500/end/3000"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["totalCount"], 2);

    let resp = app_with_state(state)
        .oneshot(get("/api/v3/transmission/start/3000/end/1000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transmission_age_delete_keeps_resending() {
    let state = AppState::new();
    state
        .seed_transmission(json!({"id": "old", "status": "SENT", "created": 1}))
        .await;
    state
        .seed_transmission(json!({"id": "retry", "status": "RESENDING", "created": 1}))
        .await;

    let resp = app_with_state(state.clone())
        .oneshot(delete("/api/v3/transmission/age/1000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app_with_state(state)
        .oneshot(get("/api/v3/transmission/all"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["transmissions"][0]["id"], "retry");
}

// --- events ---

#[tokio::test]
async fn add_event_and_count() {
    let state = AppState::new();
    let event = json!({
        "apiVersion": "v3",
        "event": {
            "deviceName": "thermo 01",
            "profileName": "Thermostat",
            "sourceName": "Temperature",
            "origin": 5,
            "readings": []
        }
    });
    let resp = app_with_state(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/v3/event/virtual-svc/Thermostat/thermo%2001/Temperature",
            &event,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(body_json(resp).await["id"].is_string());

    let resp = app_with_state(state.clone())
        .oneshot(get("/api/v3/event/count/device/name/thermo%2001"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["deviceName"], "thermo 01");

    let resp = app_with_state(state)
        .oneshot(get("/api/v3/event/count"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["count"], 1);
}

#[tokio::test]
async fn add_event_with_mismatched_path_is_rejected() {
    let event = json!({
        "event": {"deviceName": "d1", "profileName": "P", "sourceName": "S"}
    });
    let resp = app()
        .oneshot(json_request("POST", "/api/v3/event/virtual-svc/P/other/S", &event))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn huge_negative_age_does_not_overflow() {
    let state = AppState::new();
    state
        .seed_transmission(json!({"id": "retry", "status": "RESENDING", "created": 1}))
        .await;

    let resp = app_with_state(state.clone())
        .oneshot(delete(&format!("/api/v3/transmission/age/{}", i64::MIN)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app_with_state(state)
        .oneshot(delete(&format!("/api/v3/event/age/{}", i64::MIN)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

// --- profile uploads ---

fn upload(method: &str, contents: &str) -> Request<String> {
    let boundary = "mock-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"profile.yaml\"\r\n\
         Content-Type: application/octet-stream\r\n\
         \r\n\
         {contents}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method(method)
        .uri("/api/v3/deviceprofile/uploadfile")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn uploaded_profile_is_stored_and_updated() {
    let state = AppState::new();
    let profile = r#"{"name": "Uploaded", "manufacturer": "Acme", "model": "U-1"}"#;

    let resp = app_with_state(state.clone())
        .oneshot(upload("POST", profile))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = app_with_state(state.clone())
        .oneshot(upload("POST", profile))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app_with_state(state.clone())
        .oneshot(upload("PUT", r#"{"name": "Uploaded", "model": "U-2"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with_state(state)
        .oneshot(get("/api/v3/deviceprofile/name/Uploaded"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["profile"]["model"], "U-2");
    assert_eq!(body["profile"]["id"], id.as_str());
}

#[tokio::test]
async fn upload_rejects_unreadable_file() {
    let resp = app().oneshot(upload("POST", "name: [unterminated")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"]
        .as_str()
        .unwrap()
        .contains("unreadable profile file"));

    let resp = app().oneshot(upload("PUT", r#"{"name": "Nobody"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
