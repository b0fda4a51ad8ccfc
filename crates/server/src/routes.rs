//! API route handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use forecast_facade::{ForecastError, ForecastInput, ForecastPoint, PredictionInput};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_TEMPERATURE: f64 = 25.0;
const DEFAULT_HUMIDITY: f64 = 70.0;
const DEFAULT_PRECIPITATION: f64 = 0.0;

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// `Some(None)` for an explicit `null`
    #[serde(default, deserialize_with = "explicit_null")]
    pub region: Option<Option<String>>,
    pub district: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "historicalSuspected")]
    pub historical_suspected: Option<Vec<f64>>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default, deserialize_with = "explicit_null")]
    pub region: Option<Option<String>>,
    pub district: Option<String>,
    #[serde(rename = "historicalSuspected")]
    pub historical_suspected: Option<Vec<f64>>,
    pub steps: Option<i64>,
}

/// Request inputs echoed back with a prediction.
#[derive(Debug, Serialize)]
pub struct InputFeatures {
    pub date: NaiveDate,
    pub region: Option<String>,
    pub district: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted: f64,
    pub model_type: String,
    pub timestamp: String,
    pub input_features: InputFeatures,
    pub historical_data_points: usize,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastPoint>,
    pub model_type: String,
    pub timestamp: String,
    pub historical_data_points: usize,
    pub requested_steps: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub model_type: Option<String>,
    pub dataset: &'static str,
    pub dataset_loaded: bool,
    pub dataset_records: usize,
    pub last_date: Option<NaiveDate>,
    pub regions: Vec<String>,
    pub districts: usize,
    pub version: &'static str,
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Resource availability. Always 200; loads anything not yet loaded.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let status = state.run_blocking(|state| Ok(state.cache().status())).await?;
    let label = |ok: bool| if ok { "available" } else { "unavailable" };

    Ok(Json(HealthResponse {
        status: "ok",
        model: label(status.model_available),
        model_type: status.model_type,
        dataset: label(status.dataset_available),
        dataset_loaded: status.dataset_available,
        dataset_records: status.dataset_records,
        last_date: status.last_date,
        regions: status.regions,
        districts: status.district_count,
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let request: PredictRequest = parse_body(&body)?;
    let date = request.date.as_deref().map(parse_request_date).transpose()?;

    let input = PredictionInput {
        region: requested_region(request.region),
        district: request.district.clone(),
        date,
        history: request.historical_suspected.unwrap_or_default(),
    };

    let (prediction, model_type) = state
        .run_blocking(move |state| {
            let service = state.service();
            let prediction = service.predict(input)?;
            Ok((prediction, service.model_type().unwrap_or_default().to_string()))
        })
        .await?;

    Ok(Json(PredictResponse {
        predicted: prediction.predicted,
        model_type,
        timestamp: Utc::now().to_rfc3339(),
        input_features: InputFeatures {
            date: prediction.date,
            region: Some(prediction.region).filter(|r| !r.is_empty()),
            district: request.district,
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            humidity: request.humidity.unwrap_or(DEFAULT_HUMIDITY),
            precipitation: request.precipitation.unwrap_or(DEFAULT_PRECIPITATION),
        },
        historical_data_points: prediction.history_points,
    }))
}

pub async fn forecast(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ForecastResponse>, ApiError> {
    let request: ForecastRequest = parse_body(&body)?;
    let steps = request.steps.map(parse_steps).transpose()?;

    let input = ForecastInput {
        region: requested_region(request.region),
        district: request.district,
        history: request.historical_suspected.unwrap_or_default(),
        steps,
    };

    let (run, model_type) = state
        .run_blocking(move |state| {
            let service = state.service();
            let run = service.forecast(input)?;
            Ok((run, service.model_type().unwrap_or_default().to_string()))
        })
        .await?;

    Ok(Json(ForecastResponse {
        model_type,
        timestamp: Utc::now().to_rfc3339(),
        historical_data_points: run.history_points,
        requested_steps: run.forecast.requested_steps,
        forecast: run.forecast.points,
    }))
}

/// Decode a JSON object body; empty, `null` and `{}` count as no data.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::no_data());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))?;
    match &value {
        Value::Null => return Err(ApiError::no_data()),
        Value::Object(map) if map.is_empty() => return Err(ApiError::no_data()),
        Value::Object(_) => {}
        _ => {
            return Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ))
        }
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e)))
}

/// Keeps an explicit `null` apart from an absent key.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Absent region takes the service default; an explicit `null` means no region.
fn requested_region(region: Option<Option<String>>) -> Option<String> {
    region.map(Option::unwrap_or_default)
}

fn parse_request_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::from(ForecastError::InvalidParameter {
            name: "date".to_string(),
            reason: format!("expected YYYY-MM-DD, got '{}'", raw),
        })
    })
}

fn parse_steps(steps: i64) -> Result<usize, ApiError> {
    usize::try_from(steps).map_err(|_| {
        ApiError::from(ForecastError::InvalidParameter {
            name: "steps".to_string(),
            reason: format!("must be non-negative, got {}", steps),
        })
    })
}
