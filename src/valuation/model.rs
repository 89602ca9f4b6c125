//! Predictive model capability and the JSON linear pipeline artifact

use crate::valuation::types::PropertySpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Field identifiers the model was fitted against, in order
pub const FEATURE_NAMES: [&str; 8] = [
    "Taxi_dist",
    "Market_dist",
    "Hospital_dist",
    "Carpet_area",
    "Builtup_area",
    "Parking_type",
    "City_type",
    "Rainfall",
];

/// Target column of the historical dataset
pub const TARGET_NAME: &str = "Price_house";

/// One cell of the single-row model input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// Single-row record handed to a model, named cells in fitted order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInput {
    pub fields: Vec<(String, FeatureValue)>,
}

impl ModelInput {
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl From<&PropertySpec> for ModelInput {
    fn from(spec: &PropertySpec) -> Self {
        let values = [
            FeatureValue::Number(spec.taxi_distance as f64),
            FeatureValue::Number(spec.market_distance as f64),
            FeatureValue::Number(spec.hospital_distance as f64),
            FeatureValue::Number(spec.carpet_area as f64),
            FeatureValue::Number(spec.builtup_area as f64),
            FeatureValue::Category(spec.parking_type.label().to_string()),
            FeatureValue::Category(spec.city_type.label().to_string()),
            FeatureValue::Number(spec.rainfall as f64),
        ];

        ModelInput {
            fields: FEATURE_NAMES
                .iter()
                .map(|name| name.to_string())
                .zip(values)
                .collect(),
        }
    }
}

/// Opaque, pre-fitted estimator: one record in, one price out
pub trait PredictiveModel: Send + Sync {
    fn predict(&self, input: &ModelInput) -> Result<f64>;

    /// Human readable model name
    fn name(&self) -> &str {
        "model"
    }
}

/// Standard-scaled numeric feature with a linear coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub feature: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

/// One-hot encoded categorical feature, one weight per known label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub feature: String,
    pub levels: BTreeMap<String, f64>,
}

/// Scaling + one-hot encoding + linear regression, stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPipeline {
    #[serde(default = "default_pipeline_name")]
    pub name: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
    pub intercept: f64,
}

fn default_pipeline_name() -> String {
    "linear regression pipeline".to_string()
}

impl LinearPipeline {
    /// Read an artifact from disk. The structure is trusted as-is.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {:?}", path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to decode model artifact {:?}", path))
    }
}

impl PredictiveModel for LinearPipeline {
    fn predict(&self, input: &ModelInput) -> Result<f64> {
        let names = input.names();
        if names != self.features {
            anyhow::bail!(
                "feature names mismatch: model expects [{}], got [{}]",
                self.features.join(", "),
                names.join(", ")
            );
        }

        let mut estimate = self.intercept;

        for term in &self.numeric {
            let value = match input.get(&term.feature) {
                Some(FeatureValue::Number(v)) => *v,
                Some(FeatureValue::Category(label)) => anyhow::bail!(
                    "could not convert '{}' to a number for feature {}",
                    label,
                    term.feature
                ),
                None => anyhow::bail!("missing feature {}", term.feature),
            };
            // Zero-variance columns are left unscaled
            let scale = if term.scale == 0.0 { 1.0 } else { term.scale };
            estimate += term.coefficient * (value - term.mean) / scale;
        }

        for term in &self.categorical {
            let label = match input.get(&term.feature) {
                Some(FeatureValue::Category(label)) => label.as_str(),
                Some(FeatureValue::Number(v)) => anyhow::bail!(
                    "expected a category for feature {}, got {}",
                    term.feature,
                    v
                ),
                None => anyhow::bail!("missing feature {}", term.feature),
            };
            let weight = term.levels.get(label).with_context(|| {
                format!("unseen category: {} for feature {}", label, term.feature)
            })?;
            estimate += weight;
        }

        if !estimate.is_finite() {
            anyhow::bail!("numeric overflow: prediction is not finite");
        }

        Ok(estimate)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
