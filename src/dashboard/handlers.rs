//! API Handlers

use crate::dashboard::types::{ApiError, ApiResponse, FormSchema, HealthData};
use crate::valuation::charts::MarketInsights;
use crate::valuation::flow::{ModelInfo, ValuationReport, ValuationSession};
use crate::valuation::request::{FormFields, RawForm, FORM_BOUNDS};
use crate::valuation::types::{CityType, ParkingType, ValuationError};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

/// Shared state: one session, one user action in flight at a time
pub struct AppState {
    pub session: Arc<ValuationSession>,
    action: Mutex<()>,
}

impl AppState {
    pub fn new(session: ValuationSession) -> Self {
        AppState {
            session: Arc::new(session),
            action: Mutex::new(()),
        }
    }
}

fn failure(status: StatusCode, error: ApiError) -> (StatusCode, Json<ApiResponse<()>>) {
    (status, Json(ApiResponse::error(error)))
}

fn internal(e: tokio::task::JoinError) -> (StatusCode, Json<ApiResponse<()>>) {
    error!("Dashboard task failed: {}", e);
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::new("INTERNAL_ERROR", "The request could not be completed"),
    )
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::success(HealthData {
        status: "ok",
        session_id: state.session.id().to_string(),
        model_loaded: state.session.model().load().is_some(),
        dataset_loaded: state.session.dataset().load().is_some(),
    }))
}

pub async fn get_form() -> Json<ApiResponse<FormSchema>> {
    let b = FORM_BOUNDS;
    Json(ApiResponse::success(FormSchema {
        taxi_distance: b.taxi_distance,
        market_distance: b.market_distance,
        hospital_distance: b.hospital_distance,
        carpet_area: b.carpet_area,
        builtup_area: b.builtup_area,
        rainfall: b.rainfall,
        parking_types: ParkingType::ALL.iter().map(|p| p.label()).collect(),
        city_types: CityType::ALL.iter().map(|c| c.label()).collect(),
        defaults: FormFields::default(),
    }))
}

/// Generate a valuation report from the submitted form
pub async fn create_valuation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawForm>, JsonRejection>,
) -> ApiResult<ValuationReport> {
    let Json(raw) = payload.map_err(|rejection| {
        warn!("Rejected valuation form: {}", rejection.body_text());
        failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("INVALID_FORM", rejection.body_text()),
        )
    })?;

    let fields = raw.validate(&FORM_BOUNDS).map_err(|e| {
        warn!("Rejected valuation form: {}", e);
        failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("INVALID_FORM", e.to_string()),
        )
    })?;

    let _action = state.action.lock().await;
    let session = state.session.clone();
    let run = tokio::task::spawn_blocking(move || session.valuate(&fields))
        .await
        .map_err(internal)?;

    match run.result {
        Ok(report) => Ok(Json(ApiResponse::success(report))),
        Err(e @ ValuationError::PredictionFailure { .. }) => Err(failure(
            StatusCode::OK,
            ApiError::new(e.code(), format!("Error during prediction: {}", e)).with_details(e.to_string()),
        )),
        Err(e) => Err(failure(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new(e.code(), e.to_string()),
        )),
    }
}

/// Chart data, or a notice when no dataset is available
#[derive(Debug, Serialize)]
pub struct InsightsData {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<MarketInsights>,
}

pub async fn get_insights(State(state): State<Arc<AppState>>) -> ApiResult<InsightsData> {
    let _action = state.action.lock().await;
    let session = state.session.clone();
    let insights = tokio::task::spawn_blocking(move || session.insights())
        .await
        .map_err(internal)?;

    let data = match insights {
        Ok(charts) => {
            info!("Serving market insights for {} rows", charts.rows);
            InsightsData {
                available: true,
                notice: None,
                charts: Some(charts),
            }
        }
        Err(e) => InsightsData {
            available: false,
            notice: Some(e.to_string()),
            charts: None,
        },
    };

    Ok(Json(ApiResponse::success(data)))
}

pub async fn get_about(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelInfo>> {
    Json(ApiResponse::success(state.session.about()))
}
