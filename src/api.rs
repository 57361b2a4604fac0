use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::dashboard::{Dashboard, EventTab, WorkflowRow};
use crate::feed::types::EventType;
use crate::feed::{FeedCache, FeedError, Snapshot};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FeedCache>,
}

impl AppState {
    pub fn new(cache: FeedCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/workflows", get(get_workflows))
        .route("/api/events", get(get_event_tabs))
        .route("/api/events/{event_type}", get(get_event_tab))
        .route("/admin/refresh", post(admin_refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Feed errors as HTTP: upstream trouble is a 502, a cancelled fetch a 503.
pub struct ApiError(FeedError);

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            FeedError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        };
        warn!(target: "api", kind = self.0.kind(), error = %self.0, "feed unavailable");
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn not_found(message: String) -> Response {
    let body = ErrorBody {
        error: "not_found",
        message,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardOut<'a> {
    schema_version: u32,
    fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    dashboard: &'a Dashboard,
}

fn dashboard_response(snap: &Snapshot) -> Response {
    Json(DashboardOut {
        schema_version: snap.feed.schema_version,
        fetched_at: snap.fetched_at,
        dashboard: &snap.dashboard,
    })
    .into_response()
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snap = state.cache.get().await?;
    Ok(dashboard_response(&snap))
}

async fn get_workflows(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snap = state.cache.get().await?;
    let rows: &[WorkflowRow] = &snap.dashboard.workflows;
    Ok(Json(rows).into_response())
}

async fn get_event_tabs(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snap = state.cache.get().await?;
    let tabs: &[EventTab] = &snap.dashboard.tabs;
    Ok(Json(tabs).into_response())
}

async fn get_event_tab(
    State(state): State<AppState>,
    Path(event_type): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(t) = event_type.parse::<EventType>() else {
        return Ok(not_found(format!("unknown event type: {event_type}")));
    };
    let snap = state.cache.get().await?;
    match snap.dashboard.tab(t) {
        Some(tab) => Ok(Json(tab).into_response()),
        None => Ok(not_found(format!("no entities whose latest event is {t}"))),
    }
}

async fn admin_refresh(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snap = state.cache.refresh().await?;
    Ok(dashboard_response(&snap))
}
