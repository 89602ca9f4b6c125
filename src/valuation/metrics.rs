//! Derived display metrics for a successful valuation

use crate::valuation::types::{DerivedMetrics, PropertySpec};

/// Price per carpet sqft, carpet/built-up ratio and the city tier.
///
/// Both areas are at least 100 by the form bounds, so neither division can
/// hit zero.
pub fn derive(price: f64, spec: &PropertySpec) -> DerivedMetrics {
    let carpet = spec.carpet_area as f64;
    let builtup = spec.builtup_area as f64;

    DerivedMetrics {
        price_per_area: price / carpet,
        area_efficiency_pct: 100.0 * carpet / builtup,
        city_tier: spec.city_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::request::{build, FormFields};
    use crate::valuation::types::CityType;

    #[test]
    fn test_default_form_metrics() {
        let spec = build(&FormFields::default());
        let metrics = derive(4_500_000.0, &spec);

        assert!((metrics.price_per_area - 3000.0).abs() < 1e-9);
        assert!((metrics.area_efficiency_pct - 83.333_333_333).abs() < 1e-6);
        assert_eq!(metrics.city_tier, CityType::CatA);
    }

    #[test]
    fn test_equal_areas_fully_efficient() {
        let spec = build(&FormFields {
            carpet_area: 1000,
            builtup_area: 1000,
            ..FormFields::default()
        });

        let metrics = derive(2_000_000.0, &spec);
        assert_eq!(metrics.area_efficiency_pct, 100.0);
        assert_eq!(metrics.price_per_area, 2000.0);
    }

    #[test]
    fn test_formulas_hold_across_inputs() {
        for (carpet, builtup, price) in [
            (100, 40_000, 1.0),
            (30_000, 100, 9_999_999.99),
            (1234, 1500, 0.0),
        ] {
            let spec = build(&FormFields {
                carpet_area: carpet,
                builtup_area: builtup,
                city_type: CityType::CatC,
                ..FormFields::default()
            });

            let metrics = derive(price, &spec);
            assert!((metrics.price_per_area - price / carpet as f64).abs() < 1e-9);
            assert!(
                (metrics.area_efficiency_pct - 100.0 * carpet as f64 / builtup as f64).abs()
                    < 1e-9
            );
            assert_eq!(metrics.city_tier, CityType::CatC);
        }
    }
}
