//! API Request/Response Types

use crate::valuation::request::{FieldBounds, FormFields};
use serde::Serialize;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub session_id: String,
    pub model_loaded: bool,
    pub dataset_loaded: bool,
}

/// Everything needed to draw the input form
#[derive(Debug, Serialize)]
pub struct FormSchema {
    pub taxi_distance: FieldBounds,
    pub market_distance: FieldBounds,
    pub hospital_distance: FieldBounds,
    pub carpet_area: FieldBounds,
    pub builtup_area: FieldBounds,
    pub rainfall: FieldBounds,
    pub parking_types: Vec<&'static str>,
    pub city_types: Vec<&'static str>,
    pub defaults: FormFields,
}
