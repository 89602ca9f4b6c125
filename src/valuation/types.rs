//! Core data types for the valuation contract
//! Pure data structures with no behavior

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Parking provision categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkingType {
    Open,
    #[serde(rename = "Not Provided", alias = "NotProvided")]
    NotProvided,
    Covered,
    #[serde(rename = "No Parking", alias = "NoParking")]
    NoParking,
}

impl ParkingType {
    /// Form order, first entry is the default selection
    pub const ALL: [ParkingType; 4] = [
        ParkingType::Open,
        ParkingType::NotProvided,
        ParkingType::Covered,
        ParkingType::NoParking,
    ];

    /// Label used in the historical dataset and by the model artifact
    pub fn label(&self) -> &'static str {
        match self {
            ParkingType::Open => "Open",
            ParkingType::NotProvided => "Not Provided",
            ParkingType::Covered => "Covered",
            ParkingType::NoParking => "No Parking",
        }
    }
}

impl std::fmt::Display for ParkingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// City categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityType {
    #[serde(rename = "CAT A", alias = "CatA")]
    CatA,
    #[serde(rename = "CAT B", alias = "CatB")]
    CatB,
    #[serde(rename = "CAT C", alias = "CatC")]
    CatC,
}

impl CityType {
    pub const ALL: [CityType; 3] = [CityType::CatA, CityType::CatB, CityType::CatC];

    pub fn label(&self) -> &'static str {
        match self {
            CityType::CatA => "CAT A",
            CityType::CatB => "CAT B",
            CityType::CatC => "CAT C",
        }
    }
}

impl std::fmt::Display for CityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Property attributes submitted for one valuation.
///
/// Built fresh per attempt by [`crate::valuation::request::build`] and never
/// mutated afterwards. `builtup_area >= carpet_area` is expected but not
/// checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    pub taxi_distance: u32,
    pub market_distance: u32,
    pub hospital_distance: u32,
    pub carpet_area: u32,
    pub builtup_area: u32,
    pub parking_type: ParkingType,
    pub city_type: CityType,
    pub rainfall: i32, // may be negative, a data-quality placeholder
}

/// Display-only quantities computed from a successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub price_per_area: f64,
    pub area_efficiency_pct: f64,
    pub city_tier: CityType,
}

/// Failure taxonomy of the dashboard.
///
/// None of these terminate the process; each is surfaced to the user and a
/// new attempt needs a new user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Dataset missing or unreadable, charts are skipped
    #[error("Upload '{file}' to visualize market trends.")]
    DataUnavailable { file: String },

    /// Model artifact missing or unreadable, blocks the valuation action only
    #[error("Model '{file}' not found. Please upload the model file.")]
    ModelUnavailable { file: String },

    /// The model call failed, reason is kept verbatim
    #[error("{reason}")]
    PredictionFailure { reason: String },
}

impl ValuationError {
    /// Stable code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            ValuationError::DataUnavailable { .. } => "DATA_UNAVAILABLE",
            ValuationError::ModelUnavailable { .. } => "MODEL_UNAVAILABLE",
            ValuationError::PredictionFailure { .. } => "PREDICTION_FAILED",
        }
    }
}

/// One historical sale row.
///
/// Numeric cells that are empty or malformed read as `None` so a dirty cell
/// only drops the row from the charts that need it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Price_house", default, deserialize_with = "csv::invalid_option")]
    pub price_house: Option<f64>,

    #[serde(rename = "Taxi_dist", default, deserialize_with = "csv::invalid_option")]
    pub taxi_dist: Option<f64>,

    #[serde(rename = "Market_dist", default, deserialize_with = "csv::invalid_option")]
    pub market_dist: Option<f64>,

    #[serde(rename = "Hospital_dist", default, deserialize_with = "csv::invalid_option")]
    pub hospital_dist: Option<f64>,

    #[serde(rename = "Carpet_area", default, deserialize_with = "csv::invalid_option")]
    pub carpet_area: Option<f64>,

    #[serde(rename = "Builtup_area", default, deserialize_with = "csv::invalid_option")]
    pub builtup_area: Option<f64>,

    #[serde(rename = "Parking_type", default)]
    pub parking_type: Option<String>,

    #[serde(rename = "City_type", default)]
    pub city_type: Option<String>,

    #[serde(rename = "Rainfall", default, deserialize_with = "csv::invalid_option")]
    pub rainfall: Option<f64>,
}

/// Read-only table of past sales, loaded once per session
#[derive(Debug, Clone)]
pub struct HistoricalDataset {
    pub source: PathBuf,
    pub records: Vec<HistoricalRecord>,
}

impl HistoricalDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_round_trip_through_serde() {
        let parking: ParkingType = serde_json::from_str("\"Not Provided\"").unwrap();
        assert_eq!(parking, ParkingType::NotProvided);

        let parking: ParkingType = serde_json::from_str("\"NoParking\"").unwrap();
        assert_eq!(parking, ParkingType::NoParking);

        let city: CityType = serde_json::from_str("\"CatB\"").unwrap();
        assert_eq!(city, CityType::CatB);
        assert_eq!(serde_json::to_string(&city).unwrap(), "\"CAT B\"");
    }

    #[test]
    fn test_unknown_category_rejected_at_construction() {
        assert!(serde_json::from_str::<CityType>("\"CAT D\"").is_err());
        assert!(serde_json::from_str::<ParkingType>("\"Garage\"").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ValuationError::ModelUnavailable {
            file: "pipe.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model 'pipe.json' not found. Please upload the model file."
        );
        assert_eq!(err.code(), "MODEL_UNAVAILABLE");

        let err = ValuationError::PredictionFailure {
            reason: "unseen category: CatD".to_string(),
        };
        assert_eq!(err.to_string(), "unseen category: CatD");
    }
}
