//! In-process stand-in for the forecasting backend.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

const CATALOG: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc. (Google)"),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com, Inc."),
    ("TSLA", "Tesla, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("ACN", "Accenture Plc"),
    ("TCS", "Tata Consultancy Services"),
];

pub const HISTORY: [f64; 2] = [194.03, 194.35];

#[derive(Clone, Default)]
pub struct Recorder {
    pub searches: Arc<Mutex<Vec<String>>>,
    pub predictions: Arc<Mutex<Vec<Value>>>,
}

pub struct StubServer {
    pub base_url: Url,
    pub recorder: Recorder,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

async fn search(State(recorder): State<Recorder>, Query(params): Query<SearchParams>) -> Response {
    recorder.searches.lock().unwrap().push(params.q.clone());
    let q = params.q.to_lowercase();

    match q.as_str() {
        "broken" => Json(json!({ "results": "not-a-list" })).into_response(),
        "bare" => Json(json!({})).into_response(),
        "down" => (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
        _ => {
            let results: Vec<Value> = CATALOG
                .iter()
                .filter(|(symbol, name)| {
                    symbol.to_lowercase().contains(&q) || name.to_lowercase().contains(&q)
                })
                .map(|(symbol, name)| json!({ "symbol": symbol, "name": name }))
                .collect();
            Json(json!({ "results": results })).into_response()
        }
    }
}

fn results(days_ahead: i64, overlap: bool) -> Value {
    let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let historical_dates = vec![start, start + Duration::days(1)];
    let first_future = if overlap { 1 } else { 2 };
    let future_dates: Vec<NaiveDate> = (0..days_ahead)
        .map(|i| start + Duration::days(first_future + i))
        .collect();
    let future_predictions: Vec<f64> = (0..days_ahead).map(|i| 195.0 + i as f64 * 0.5).collect();

    json!({
        "historical_dates": historical_dates,
        "historical_prices": HISTORY,
        "future_dates": future_dates,
        "future_predictions": future_predictions,
        "hist_pred_dates": [historical_dates[1]],
        "hist_pred_prices": [194.1],
        "mae": 0.0,
        "rmse": 0.0213,
    })
}

async fn predict(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.predictions.lock().unwrap().push(body.clone());
    let days_ahead = body["days_ahead"].as_i64().unwrap_or(7);

    match body["ticker"].as_str().unwrap_or_default() {
        "FAIL" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "No data fetched for ticker FAIL" })),
        )
            .into_response(),
        "BARE" => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        "INVALID" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "period"], "msg": "invalid period" }] })),
        )
            .into_response(),
        "NODETAIL" => (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad" }))).into_response(),
        "FLAKY" => Json(json!({ "success": false })).into_response(),
        "EMPTY" => Json(json!({ "success": true })).into_response(),
        "OVERLAP" => Json(json!({ "success": true, "results": results(days_ahead, true) })).into_response(),
        _ => Json(json!({ "success": true, "results": results(days_ahead, false) })).into_response(),
    }
}

pub async fn spawn_backend() -> StubServer {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/stocks/search", get(search))
        .route("/api/predict", post(predict))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: Url::parse(&format!("http://{}/", addr)).unwrap(),
        recorder,
    }
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/", addr)).unwrap()
}
