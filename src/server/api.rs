//! api.rs — Rutas HTTP: /health, /model, /suggest, /weather, /cost, /dashboard y /sessions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use super::{
    dashboard::{LiveContext, Services},
    session::SessionRegistry,
};
use crate::error::{SessionLimit, ValidationError};
use crate::models::types::{Dashboard, DashboardQuery, ModelInfo, Suggestion, VehicleType, WeatherReading};
use crate::signal::estimate_cost;

#[derive(Clone)]
pub struct ApiState {
    pub services: Arc<Services>,
    pub sessions: Arc<SessionRegistry>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/model", get(|| async { Json(ModelInfo::default()) }))
        .route("/suggest", get(suggest))
        .route("/weather", get(weather))
        .route("/cost", get(cost))
        .route("/dashboard", get(dashboard))
        .route("/sessions", axum::routing::post(open_session))
        .route("/sessions/:id", axum::routing::delete(close_session))
        .route("/sessions/:id/live", get(live))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// Errores de la API: validación -> 400, tope de sesiones -> 429, resto -> 500 con la causa.
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(v) = self.0.downcast_ref::<ValidationError>() {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": v.to_string() }))).into_response();
        }
        if let Some(l) = self.0.downcast_ref::<SessionLimit>() {
            return (StatusCode::TOO_MANY_REQUESTS, Json(json!({ "error": l.to_string() }))).into_response();
        }
        error!("system error: {:#}", self.0);
        let body = json!({ "error": format!("System Error: {:#}", self.0) });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

async fn suggest(State(st): State<ApiState>, Query(q): Query<SuggestQuery>) -> Json<Vec<Suggestion>> {
    let res = st.services.geocoder.suggest(&q.q).await;
    if let Some(reason) = res.reason() {
        warn!("autocompletado sin resultados para '{}': {reason}", q.q);
    }
    Json(res.into_value())
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize)]
struct WeatherOut {
    #[serde(flatten)]
    reading: WeatherReading,
    fallback: bool,
}

async fn weather(State(st): State<ApiState>, Query(q): Query<WeatherQuery>) -> impl IntoResponse {
    let res = st.services.weather.fetch_weather(q.lat, q.lon).await;
    if let Some(reason) = res.reason() {
        warn!("clima ({}, {}): {reason}", q.lat, q.lon);
    }
    let fallback = res.is_fallback();
    Json(WeatherOut { reading: res.into_value(), fallback })
}

#[derive(Debug, Deserialize)]
pub struct CostQuery {
    pub address: String,
    #[serde(default = "default_vehicle")]
    pub vehicle: VehicleType,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_vehicle() -> VehicleType { VehicleType::Car }
fn default_duration() -> u32 { 2 }

async fn cost(State(st): State<ApiState>, Query(q): Query<CostQuery>) -> Result<Json<serde_json::Value>, ApiError> {
    if !(1..=12).contains(&q.duration) {
        return Err(ValidationError::DurationOutOfRange(q.duration).into());
    }
    let c = estimate_cost(&q.address, q.vehicle, q.duration, &st.services.cfg.signal);
    Ok(Json(json!({ "cost": c })))
}

async fn dashboard(State(st): State<ApiState>, Query(q): Query<DashboardQuery>) -> Result<Response, ApiError> {
    let d = st.services.build_dashboard(&q.address, &q.inputs()).await?;
    Ok(match d {
        Some(d) => Json(d).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[derive(Serialize)]
struct SessionOut {
    id: u64,
    dashboard: Dashboard,
}

async fn open_session(State(st): State<ApiState>, Json(q): Json<DashboardQuery>) -> Result<Response, ApiError> {
    let Some(d) = st.services.build_dashboard(&q.address, &q.inputs()).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let ctx = LiveContext {
        place: d.place.clone(),
        base_occupancy: d.base.occupancy,
        arrival_hour: d.inputs.arrival_hour,
        est_cost: d.est_cost,
    };
    let id = st.sessions.open(st.services.clone(), ctx, d.live.clone()).await?;
    Ok((StatusCode::CREATED, Json(SessionOut { id, dashboard: d })).into_response())
}

async fn live(State(st): State<ApiState>, Path(id): Path<u64>) -> Response {
    match st.sessions.latest(id).await {
        Some(panel) => Json(panel).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn close_session(State(st): State<ApiState>, Path(id): Path<u64>) -> StatusCode {
    if st.sessions.close(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
