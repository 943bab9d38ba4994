use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    ContentRow, EngineError, OccupancySnapshot, PersistenceError, PersistenceResult, PlanRequest,
    PlannedSlot, Platform, SchedulePlanner, SchedulerConfig, SchedulingResult, SlotStore,
    assign_dates, calendar::date_range,
};

/// Slot store shared by every request.
pub type SharedSlotStore = Arc<dyn SlotStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    config: Arc<SchedulerConfig>,
    occupancy: Arc<RwLock<OccupancySnapshot>>,
    store: Option<SharedSlotStore>,
}

impl AppState {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_occupancy(config, OccupancySnapshot::new())
    }

    pub fn with_occupancy(config: SchedulerConfig, occupancy: OccupancySnapshot) -> Self {
        Self {
            config: Arc::new(config),
            occupancy: Arc::new(RwLock::new(occupancy)),
            store: None,
        }
    }

    /// Occupancy loaded from `store`; every commit is written there first.
    pub fn with_store(config: SchedulerConfig, store: SharedSlotStore) -> PersistenceResult<Self> {
        let occupancy = store.snapshot()?;
        let mut state = Self::with_occupancy(config, occupancy);
        state.store = Some(store);
        Ok(state)
    }

    pub fn occupancy(&self) -> Arc<RwLock<OccupancySnapshot>> {
        self.occupancy.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Conflict(String),
    Invalid(String),
    Storage(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<EngineError> for ApiError {
    fn from(value: EngineError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        ApiError::Storage(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Storage(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct OccupyPayload {
    platform: Platform,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rows: Vec<ContentRow>,
    #[serde(default)]
    pub commit: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlanPayload {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub weeks: Option<u32>,
    #[serde(default)]
    pub posts_per_week: Option<u8>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/occupancy", get(get_occupancy).post(occupy_date))
        .route("/schedule", post(schedule_rows))
        .route("/plan", post(plan_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_occupancy(State(state): State<AppState>) -> Json<OccupancySnapshot> {
    let occupancy = state.occupancy();
    let snapshot = occupancy.read().clone();
    Json(snapshot)
}

async fn occupy_date(
    State(state): State<AppState>,
    Json(payload): Json<OccupyPayload>,
) -> Result<(StatusCode, Json<OccupancySnapshot>), ApiError> {
    let occupancy = state.occupancy();
    let mut guard = occupancy.write();
    let stored = match &state.store {
        Some(store) => store.occupy(payload.platform, payload.date)?,
        None => true,
    };
    if !guard.occupy(payload.platform, payload.date) || !stored {
        return Err(ApiError::Conflict(format!(
            "{} is already taken on {}",
            payload.date, payload.platform
        )));
    }
    Ok((StatusCode::CREATED, Json(guard.clone())))
}

async fn schedule_rows(
    State(state): State<AppState>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Json<SchedulingResult>, ApiError> {
    if payload.start_date > payload.end_date {
        return Err(ApiError::invalid(format!(
            "start_date {} must be on or before end_date {}",
            payload.start_date, payload.end_date
        )));
    }
    let range = date_range(payload.start_date, payload.end_date)?;

    let occupancy = state.occupancy();
    // Held across assignment and commit so two requests cannot claim one date.
    let mut guard = occupancy.write();
    let result = assign_dates(&payload.rows, &range, &guard)?;
    if payload.commit && result.can_proceed {
        if let Some(store) = &state.store {
            store.commit_result(&result)?;
        }
        for row in &result.scheduled_rows {
            if let Some(date) = row.assigned_date {
                guard.occupy_all(date);
            }
        }
        info!(rows = result.scheduled_rows.len(), "committed scheduled rows");
    }
    Ok(Json(result))
}

async fn plan_schedule(
    State(state): State<AppState>,
    Json(payload): Json<PlanPayload>,
) -> Result<Json<Vec<PlannedSlot>>, ApiError> {
    let config = &state.config;
    let request = PlanRequest::new(
        payload.start_date,
        payload.weeks.unwrap_or(config.weeks),
        payload.posts_per_week.unwrap_or(config.posts_per_week),
    );
    let committed = state.occupancy().read().clone();
    let plan = SchedulePlanner::new(&config.time_windows).generate(
        &request,
        &committed,
        &mut rand::rng(),
    )?;
    Ok(Json(plan))
}
