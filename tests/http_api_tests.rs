#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use roster_tool::{
    DocumentStore, MemoryBackend, RESTRICTED_SLOTS_KEY, STAFF_AVAILABILITY_KEY, http_api,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn seeded_router() -> axum::Router {
    let staff = json!({
        "Alice": { "max_shifts": 3, "booked_dates": ["2024-01-01"] },
    });
    let slots = json!({ "Monday": ["12:00-14:00"] });
    let backend = MemoryBackend::new()
        .with_document(
            STAFF_AVAILABILITY_KEY,
            &serde_json::to_vec_pretty(&staff).unwrap(),
        )
        .with_document(
            RESTRICTED_SLOTS_KEY,
            &serde_json::to_vec_pretty(&slots).unwrap(),
        );
    let state = http_api::AppState::new(DocumentStore::new(backend));
    http_api::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn staff_lifecycle_via_http_api() {
    let app = seeded_router();
    let carol = json!({ "Carol": { "max_shifts": 4, "booked_dates": [] } });

    // Add a new staff member
    let response = app
        .clone()
        .oneshot(post_json("/add-staff", &carol))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));

    // The member shows up in the document
    let response = app.clone().oneshot(get("/staff-availability")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert_eq!(doc["Carol"]["max_shifts"], json!(4));

    // Adding the same name again conflicts
    let response = app
        .clone()
        .oneshot(post_json("/add-staff", &carol))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("conflict"));

    // Remove the member
    let response = app
        .clone()
        .oneshot(post_json("/remove-staff", &json!({ "staffName": "Carol" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second removal reports the absence
    let response = app
        .clone()
        .oneshot(post_json("/remove-staff", &json!({ "staffName": "Carol" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn update_max_shifts_for_missing_member_returns_not_found() {
    let app = seeded_router();

    let response = app
        .oneshot(post_json(
            "/update-max-shifts",
            &json!({ "staffName": "Mallory", "maxShifts": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_max_shifts_changes_only_that_field() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(post_json(
            "/update-max-shifts",
            &json!({ "staffName": "Alice", "maxShifts": 7 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/staff-availability")).await.unwrap();
    let doc = response_json(response).await;
    assert_eq!(doc["Alice"]["max_shifts"], json!(7));
    assert_eq!(doc["Alice"]["booked_dates"], json!(["2024-01-01"]));
}

#[tokio::test]
async fn update_staff_availability_requires_both_fields() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(post_json("/update-staff-availability", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("invalid_request"));

    // upsert works for a name that does not exist yet
    let response = app
        .clone()
        .oneshot(post_json(
            "/update-staff-availability",
            &json!({ "staffName": "Dana", "updatedData": { "max_shifts": 2 } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/staff-availability")).await.unwrap();
    let doc = response_json(response).await;
    assert_eq!(doc["Dana"]["max_shifts"], json!(2));
}

#[tokio::test]
async fn update_booked_dates_replaces_whole_document() {
    let app = seeded_router();
    let replacement = json!({ "Eve": { "max_shifts": 1, "booked_dates": [] } });

    let response = app
        .clone()
        .oneshot(post_json("/update-booked-dates", &replacement))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/staff-availability")).await.unwrap();
    let doc = response_json(response).await;
    assert_eq!(doc, replacement);
}

#[tokio::test]
async fn restricted_slots_round_trip() {
    let app = seeded_router();

    let response = app.clone().oneshot(get("/restricted-slots")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let slots = response_json(response).await;
    assert_eq!(slots["Monday"], json!(["12:00-14:00"]));

    let replacement = json!({ "Tuesday": ["09:00-11:00"] });
    let response = app
        .clone()
        .oneshot(post_json("/restricted-slots", &replacement))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/restricted-slots")).await.unwrap();
    let slots = response_json(response).await;
    assert_eq!(slots, replacement);
}

#[tokio::test]
async fn save_then_download_schedule() {
    let app = seeded_router();
    let payload = json!({
        "dates": [
            "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04",
            "2024-01-05", "2024-01-06", "2024-01-07",
        ],
        "scheduleData": {
            "Lunch1": { "Monday": "Staff A" },
            "Bothams2": { "Tuesday": "Staff B" },
        },
    });

    let response = app
        .clone()
        .oneshot(post_json("/save-schedule", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["filePath"], json!("schedule.xlsx"));

    let response = app
        .oneshot(get("/download-schedule?date=2024-01-07"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Schedule_2024-01-07.xlsx"));
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn download_schedule_requires_date_parameter() {
    let app = seeded_router();

    let response = app.oneshot(get("/download-schedule")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_schedule_before_any_save_is_not_found() {
    let app = seeded_router();

    let response = app
        .oneshot(get("/download-schedule?date=2024-01-07"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
