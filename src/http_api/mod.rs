use std::{io::Read, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    DocumentStore, ExportError, SCHEDULE_WORKBOOK_KEY, ScheduleData, StaffAvailabilityDoc,
    StoreError, build_schedule_sheet, write_workbook,
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct AppState {
    store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn with_shared(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn store(&self) -> &DocumentStore {
        &self.store
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    CorruptData(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(message) => ApiError::NotFound(message),
            StoreError::Conflict(message) => ApiError::Conflict(message),
            StoreError::CorruptData(message) => ApiError::CorruptData(message),
            StoreError::Unavailable(err) => ApiError::Unavailable(err.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::CorruptData(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_data", message)
            }
            ApiError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_unavailable",
                message,
            ),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        let body = Json(ErrorBody { error, message });
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/staff-availability", get(get_staff_availability))
        .route("/update-booked-dates", post(update_booked_dates))
        .route("/update-staff-availability", post(update_staff_availability))
        .route("/add-staff", post(add_staff))
        .route("/remove-staff", post(remove_staff))
        .route("/update-max-shifts", post(update_max_shifts))
        .route(
            "/restricted-slots",
            get(get_restricted_slots).post(put_restricted_slots),
        )
        .route("/save-schedule", post(save_schedule))
        .route("/download-schedule", get(download_schedule))
        // the service fronts a browser SPA on another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: DocumentStore) -> std::io::Result<()> {
    let state = AppState::new(store);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_staff_availability(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let doc = state.store().staff_availability()?;
    Ok(Json(Value::Object(doc)))
}

async fn update_booked_dates(
    State(state): State<AppState>,
    Json(doc): Json<StaffAvailabilityDoc>,
) -> Result<Json<Value>, ApiError> {
    tracing::debug!(staff = doc.len(), "replacing booked dates");
    state.store().replace_booked_dates(&doc)?;
    Ok(Json(json!({
        "success": true,
        "message": "Booked dates updated successfully"
    })))
}

async fn update_staff_availability(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(name) = payload
        .get("staffName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
    else {
        return Err(ApiError::invalid("staffName is required"));
    };
    let Some(record) = payload.get("updatedData") else {
        return Err(ApiError::invalid("updatedData is required"));
    };
    state
        .store()
        .update_staff_availability(name, record.clone())?;
    Ok(Json(json!({
        "success": true,
        "message": "Staff availability updated successfully!"
    })))
}

async fn add_staff(
    State(state): State<AppState>,
    Json(payload): Json<StaffAvailabilityDoc>,
) -> Result<Json<Value>, ApiError> {
    let Some((name, record)) = payload.into_iter().next() else {
        return Err(ApiError::invalid(
            "request body must contain the new staff member",
        ));
    };
    tracing::debug!(%name, "adding staff member");
    state.store().add_staff_member(&name, record)?;
    Ok(Json(json!({
        "success": true,
        "message": "New staff member added"
    })))
}

async fn remove_staff(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(name) = payload
        .get("staffName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
    else {
        return Err(ApiError::invalid("staffName is required"));
    };
    state.store().remove_staff_member(name)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Staff member {name} removed")
    })))
}

async fn update_max_shifts(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(name) = payload
        .get("staffName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
    else {
        return Err(ApiError::invalid("staffName is required"));
    };
    let Some(max_shifts) = payload.get("maxShifts").and_then(Value::as_number) else {
        return Err(ApiError::invalid("maxShifts must be a number"));
    };
    state.store().set_max_shifts(name, max_shifts.clone())?;
    Ok(Json(json!({
        "success": true,
        "message": "Max shifts updated successfully"
    })))
}

async fn get_restricted_slots(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let doc = state.store().restricted_slots()?;
    Ok(Json(doc))
}

async fn put_restricted_slots(
    State(state): State<AppState>,
    Json(doc): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    state.store().put_restricted_slots(&doc)?;
    Ok(Json(json!({
        "success": true,
        "message": "Restricted slots updated successfully"
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveSchedulePayload {
    dates: Vec<String>,
    schedule_data: ScheduleData,
}

async fn save_schedule(
    State(state): State<AppState>,
    Json(payload): Json<SaveSchedulePayload>,
) -> Result<Json<Value>, ApiError> {
    let sheet = build_schedule_sheet(&payload.dates, &payload.schedule_data);
    // generation failure bails out before any write; a write failure leaves
    // the previously stored workbook untouched
    let bytes = write_workbook(&sheet)?;
    state.store().store_schedule_workbook(&bytes)?;
    tracing::info!(
        sections = sheet.rows.len(),
        bytes = bytes.len(),
        "schedule workbook stored"
    );
    Ok(Json(json!({
        "success": true,
        "message": "Schedule saved successfully!",
        "filePath": SCHEDULE_WORKBOOK_KEY
    })))
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    date: Option<String>,
}

async fn download_schedule(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let Some(date) = query.date.filter(|date| !date.is_empty()) else {
        return Err(ApiError::invalid("date query parameter is required"));
    };
    let mut reader = state.store().open_schedule_workbook()?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| ApiError::Unavailable(err.to_string()))?;
    let disposition = format!("attachment; filename=\"Schedule_{date}.xlsx\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
