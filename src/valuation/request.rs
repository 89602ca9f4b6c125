//! Request building - turn form values into a PropertySpec
//!
//! The form surface owns the range table below; `build` only assembles
//! fields that already passed it.

use crate::valuation::types::{CityType, ParkingType, PropertySpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive range and default for one numeric form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldBounds {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl FieldBounds {
    const fn new(min: i64, max: i64, default: i64) -> Self {
        FieldBounds { min, max, default }
    }

    fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Numeric form inputs with their bounds
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormBounds {
    pub taxi_distance: FieldBounds,
    pub market_distance: FieldBounds,
    pub hospital_distance: FieldBounds,
    pub carpet_area: FieldBounds,
    pub builtup_area: FieldBounds,
    pub rainfall: FieldBounds,
}

pub const FORM_BOUNDS: FormBounds = FormBounds {
    taxi_distance: FieldBounds::new(0, 30_000, 8_200),
    market_distance: FieldBounds::new(0, 30_000, 11_000),
    hospital_distance: FieldBounds::new(0, 30_000, 13_000),
    carpet_area: FieldBounds::new(100, 30_000, 1_500),
    builtup_area: FieldBounds::new(100, 40_000, 1_800),
    rainfall: FieldBounds::new(-500, 2_000, 800),
};

/// Form value rejected by the input surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Raw submission from the form, any omitted field takes its default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForm {
    pub taxi_distance: Option<i64>,
    pub market_distance: Option<i64>,
    pub hospital_distance: Option<i64>,
    pub carpet_area: Option<i64>,
    pub builtup_area: Option<i64>,
    pub parking_type: Option<ParkingType>,
    pub city_type: Option<CityType>,
    pub rainfall: Option<i64>,
}

/// Form values that passed the range table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormFields {
    pub taxi_distance: u32,
    pub market_distance: u32,
    pub hospital_distance: u32,
    pub carpet_area: u32,
    pub builtup_area: u32,
    pub parking_type: ParkingType,
    pub city_type: CityType,
    pub rainfall: i32,
}

impl Default for FormFields {
    fn default() -> Self {
        let b = FORM_BOUNDS;
        // Defaults sit inside their bounds, the casts cannot truncate
        FormFields {
            taxi_distance: b.taxi_distance.default as u32,
            market_distance: b.market_distance.default as u32,
            hospital_distance: b.hospital_distance.default as u32,
            carpet_area: b.carpet_area.default as u32,
            builtup_area: b.builtup_area.default as u32,
            parking_type: ParkingType::ALL[0],
            city_type: CityType::ALL[0],
            rainfall: b.rainfall.default as i32,
        }
    }
}

impl RawForm {
    /// Apply defaults and enforce the range table
    pub fn validate(self, bounds: &FormBounds) -> Result<FormFields, FormError> {
        let defaults = FormFields::default();

        Ok(FormFields {
            taxi_distance: checked("taxi_distance", self.taxi_distance, &bounds.taxi_distance)?,
            market_distance: checked(
                "market_distance",
                self.market_distance,
                &bounds.market_distance,
            )?,
            hospital_distance: checked(
                "hospital_distance",
                self.hospital_distance,
                &bounds.hospital_distance,
            )?,
            carpet_area: checked("carpet_area", self.carpet_area, &bounds.carpet_area)?,
            builtup_area: checked("builtup_area", self.builtup_area, &bounds.builtup_area)?,
            parking_type: self.parking_type.unwrap_or(defaults.parking_type),
            city_type: self.city_type.unwrap_or(defaults.city_type),
            rainfall: checked("rainfall", self.rainfall, &bounds.rainfall)?,
        })
    }
}

fn checked<T: TryFrom<i64>>(
    field: &'static str,
    value: Option<i64>,
    bounds: &FieldBounds,
) -> Result<T, FormError> {
    let value = value.unwrap_or(bounds.default);
    let out_of_range = FormError::OutOfRange {
        field,
        value,
        min: bounds.min,
        max: bounds.max,
    };

    if !bounds.contains(value) {
        return Err(out_of_range);
    }

    T::try_from(value).map_err(|_| out_of_range)
}

/// Assemble the request record. Pure structural copy, no normalization.
pub fn build(fields: &FormFields) -> PropertySpec {
    PropertySpec {
        taxi_distance: fields.taxi_distance,
        market_distance: fields.market_distance,
        hospital_distance: fields.hospital_distance,
        carpet_area: fields.carpet_area,
        builtup_area: fields.builtup_area,
        parking_type: fields.parking_type,
        city_type: fields.city_type,
        rainfall: fields.rainfall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_uses_defaults() {
        let fields = RawForm::default().validate(&FORM_BOUNDS).unwrap();

        assert_eq!(fields, FormFields::default());
        assert_eq!(fields.taxi_distance, 8200);
        assert_eq!(fields.market_distance, 11000);
        assert_eq!(fields.hospital_distance, 13000);
        assert_eq!(fields.carpet_area, 1500);
        assert_eq!(fields.builtup_area, 1800);
        assert_eq!(fields.parking_type, ParkingType::Open);
        assert_eq!(fields.city_type, CityType::CatA);
        assert_eq!(fields.rainfall, 800);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let raw = RawForm {
            carpet_area: Some(99),
            ..RawForm::default()
        };

        let err = raw.validate(&FORM_BOUNDS).unwrap_err();
        assert_eq!(
            err,
            FormError::OutOfRange {
                field: "carpet_area",
                value: 99,
                min: 100,
                max: 30_000,
            }
        );
        assert_eq!(err.to_string(), "carpet_area must be between 100 and 30000, got 99");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let raw = RawForm {
            taxi_distance: Some(0),
            builtup_area: Some(40_000),
            rainfall: Some(-500),
            ..RawForm::default()
        };

        let fields = raw.validate(&FORM_BOUNDS).unwrap();
        assert_eq!(fields.taxi_distance, 0);
        assert_eq!(fields.builtup_area, 40_000);
        assert_eq!(fields.rainfall, -500);
    }

    #[test]
    fn test_builtup_smaller_than_carpet_is_accepted() {
        let raw = RawForm {
            carpet_area: Some(2000),
            builtup_area: Some(1000),
            ..RawForm::default()
        };

        assert!(raw.validate(&FORM_BOUNDS).is_ok());
    }

    #[test]
    fn test_build_copies_fields() {
        let fields = FormFields {
            parking_type: ParkingType::Covered,
            city_type: CityType::CatC,
            rainfall: -10,
            ..FormFields::default()
        };

        let spec = build(&fields);
        assert_eq!(spec.taxi_distance, 8200);
        assert_eq!(spec.carpet_area, 1500);
        assert_eq!(spec.builtup_area, 1800);
        assert_eq!(spec.parking_type, ParkingType::Covered);
        assert_eq!(spec.city_type, CityType::CatC);
        assert_eq!(spec.rainfall, -10);
    }

    #[test]
    fn test_build_is_idempotent() {
        let fields = FormFields::default();
        assert_eq!(build(&fields), build(&fields));
    }
}
