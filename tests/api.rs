mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

use cityspot::models::types::AppCfg;
use cityspot::server::{
    api::{router, ApiState},
    session::SessionRegistry,
};

/// API completa contra proveedores falsos; el clima devuelve lluvia.
async fn app() -> String {
    app_with_session_cap(100).await
}

async fn app_with_session_cap(max_sessions: usize) -> String {
    let geo = common::spawn(common::geocoder()).await;
    let weather = common::spawn(common::weather_ok(22.0, 61)).await;
    let cfg = AppCfg { max_sessions, ..common::cfg(&geo, &weather) };
    let state = ApiState {
        sessions: Arc::new(SessionRegistry::new(cfg.session_ttl, cfg.max_sessions)),
        services: Arc::new(common::services(cfg)),
    };
    common::spawn(router(state)).await
}

async fn get(url: String) -> (StatusCode, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_and_model() {
    let base = app().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "ok");

    let (status, model) = get(format!("{base}/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(model["algorithm"], "Random Forest");
}

#[tokio::test]
async fn dashboard_is_deterministic_for_same_inputs() {
    let base = app().await;
    let url = format!("{base}/dashboard?address=Select%20Citywalk%20Mall,%20Delhi&hour=19&duration=2&day=Friday&vehicle=Car");

    let (status, a) = get(url.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (_, b) = get(url).await;

    assert_eq!(a["base"], b["base"]);
    assert_eq!(a["forecast"], b["forecast"]);
    assert_eq!(a["nearby"], b["nearby"]);
    assert_eq!(a["est_cost"], 160);

    let occ = a["base"]["occupancy"].as_i64().unwrap();
    assert!((65..90).contains(&occ), "punta + Mall: {occ}");
    assert_eq!(a["base"]["profile"], "HighOccupancy");
    assert_eq!(a["confidence"], json!({ "high": 0.10, "medium": 0.30, "low": 0.60 }));
    assert_eq!(a["forecast"].as_array().unwrap().len(), 5);
    assert_eq!(a["history"].as_array().unwrap().len(), 5);
    assert_eq!(a["nearby"].as_array().unwrap().len(), 5);

    let live = &a["live"];
    assert_eq!(live["weather"]["condition"], "Rainy");
    assert_eq!(live["wet_road_alert"], true);
    assert_eq!(live["weather_fallback"], false);
    assert_eq!(live["parking_full"], false);
    assert_eq!(
        live["navigation"],
        "https://www.google.com/maps/search/?api=1&query=28.6315,77.2167"
    );
}

#[tokio::test]
async fn dashboard_not_found_and_blank_are_no_content() {
    let base = app().await;
    let (status, _) = get(format!("{base}/dashboard?address=Nowhere")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(format!("{base}/dashboard?address=")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn dashboard_rejects_invalid_inputs() {
    let base = app().await;
    let (status, body) = get(format!("{base}/dashboard?address=Some%20Town&hour=24")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("24"));

    let (status, _) = get(format!("{base}/dashboard?address=Some%20Town&duration=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn geocoder_failure_surfaces_as_system_error() {
    let base = app().await;
    let (status, body) = get(format!("{base}/dashboard?address=Explode")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("System Error: "));

    // el servicio sigue disponible para otra búsqueda
    let (status, _) = get(format!("{base}/dashboard?address=Some%20Town&hour=10")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cost_and_suggest_endpoints() {
    let base = app().await;
    let (_, c) = get(format!("{base}/cost?address=Connaught%20Place,%20Delhi&vehicle=Bike/Scooter&duration=2")).await;
    assert_eq!(c["cost"], 80);
    let (_, c) = get(format!("{base}/cost?address=Some%20Town&duration=3")).await;
    assert_eq!(c["cost"], 120);

    let (status, s) = get(format!("{base}/suggest?q=Ambience")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(s.as_array().unwrap().len(), 5);
    let (_, s) = get(format!("{base}/suggest?q=Explode")).await;
    assert_eq!(s, json!([]));
}

#[tokio::test]
async fn session_lifecycle() {
    let base = app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/sessions"))
        .json(&json!({ "address": "Khan Market, New Delhi", "hour": 12, "duration": 1, "day": "Sun", "vehicle": "Car" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let id = body["id"].as_u64().unwrap();
    assert_eq!(body["dashboard"]["est_cost"], 80);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let (status, live) = get(format!("{base}/sessions/{id}/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(live["tick"].as_u64().unwrap() >= 1);
    let avail = live["snapshot"]["available_spots"].as_i64().unwrap();
    assert!((0..=320).contains(&avail));

    let resp = client.delete(format!("{base}/sessions/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let (status, _) = get(format!("{base}/sessions/{id}/live")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let resp = client.delete(format!("{base}/sessions/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_cap_answers_too_many_requests() {
    let base = app_with_session_cap(1).await;
    let client = reqwest::Client::new();
    let body = json!({ "address": "Khan Market, New Delhi", "hour": 12 });

    let first = client.post(format!("{base}/sessions")).json(&body).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let id = first.json::<Value>().await.unwrap()["id"].as_u64().unwrap();

    let resp = client.post(format!("{base}/sessions")).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().contains("limit 1"));

    // al cerrar una se libera el hueco
    client.delete(format!("{base}/sessions/{id}")).send().await.unwrap();
    let resp = client.post(format!("{base}/sessions")).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}
