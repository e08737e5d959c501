//! Proveedores falsos (geocoder y clima) servidos con Axum en 127.0.0.1:0.
#![allow(dead_code)]

use axum::{
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{collections::HashMap, time::Duration};

use cityspot::models::types::AppCfg;
use cityspot::server::{dashboard::Services, fetch};

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Devuelve siempre 8 resultados (ignora `limit`) salvo:
/// - "Nowhere" -> lista vacía
/// - "Explode" -> HTTP 500
pub fn geocoder() -> Router {
    Router::new().route(
        "/search",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            let query = q.get("q").cloned().unwrap_or_default();
            if query.contains("Explode") {
                return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
            }
            if query.contains("Nowhere") {
                return Json(json!([])).into_response();
            }
            let hits: Vec<Value> = (0..8)
                .map(|i| {
                    let name = if i == 0 { query.clone() } else { format!("{query}, alt {i}") };
                    json!({ "display_name": name, "lat": "28.6315", "lon": "77.2167" })
                })
                .collect();
            Json(Value::Array(hits)).into_response()
        }),
    )
}

pub fn weather_ok(temperature: f64, code: i64) -> Router {
    Router::new().route(
        "/v1/forecast",
        get(move |Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("current_weather").map(String::as_str), Some("true"));
            assert!(q.contains_key("latitude") && q.contains_key("longitude"));
            Json(json!({ "current_weather": { "temperature": temperature, "weathercode": code } }))
        }),
    )
}

pub fn weather_status(status: StatusCode) -> Router {
    Router::new().route("/v1/forecast", get(move || async move { status.into_response() }))
}

pub fn weather_malformed() -> Router {
    Router::new().route(
        "/v1/forecast",
        get(|| async { Json(json!({ "current_weather": { "temp": "hot" } })) }),
    )
}

pub fn weather_slow(delay: Duration) -> Router {
    Router::new().route(
        "/v1/forecast",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({ "current_weather": { "temperature": 10.0, "weathercode": 0 } }))
        }),
    )
}

pub fn cfg(geocoder_url: &str, weather_url: &str) -> AppCfg {
    AppCfg {
        geocoder_url: geocoder_url.to_string(),
        weather_url: weather_url.to_string(),
        geocoder_timeout: Duration::from_secs(2),
        weather_timeout: Duration::from_millis(300),
        refresh: Duration::from_millis(50),
        ..AppCfg::default()
    }
}

pub fn services(cfg: AppCfg) -> Services {
    let client = fetch::build_client(&cfg).unwrap();
    Services::new(client, cfg)
}
