//! Market insight series for the chart surface
//!
//! Numbers only, rendering is left to whoever draws them.

use crate::valuation::types::HistoricalDataset;
use serde::Serialize;

const KDE_GRID_POINTS: usize = 100;
const KDE_CUT: f64 = 3.0;

/// Price vs carpet area points for one city category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub city_type: String,
    pub points: Vec<[f64; 2]>,
}

/// Five-number summary of prices for one parking category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub parking_type: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Price histogram with a density curve scaled to bin counts
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInsights {
    pub rows: usize,
    pub price_vs_area: Vec<ScatterSeries>,
    pub parking_impact: Vec<BoxSummary>,
    pub price_distribution: Histogram,
}

/// Compute every chart series from the dataset
pub fn market_insights(dataset: &HistoricalDataset) -> MarketInsights {
    MarketInsights {
        rows: dataset.len(),
        price_vs_area: price_vs_area(dataset),
        parking_impact: parking_impact(dataset),
        price_distribution: price_distribution(dataset),
    }
}

/// Groups keep first-appearance order
fn group_by<'a>(pairs: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (key, value) in pairs {
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => groups.push((key.to_string(), vec![value])),
        }
    }
    groups
}

pub fn price_vs_area(dataset: &HistoricalDataset) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();

    for record in &dataset.records {
        let (Some(area), Some(price), Some(city)) =
            (record.carpet_area, record.price_house, record.city_type.as_deref())
        else {
            continue;
        };

        match series.iter_mut().find(|s| s.city_type == city) {
            Some(s) => s.points.push([area, price]),
            None => series.push(ScatterSeries {
                city_type: city.to_string(),
                points: vec![[area, price]],
            }),
        }
    }

    series
}

pub fn parking_impact(dataset: &HistoricalDataset) -> Vec<BoxSummary> {
    let pairs = dataset.records.iter().filter_map(|record| {
        Some((record.parking_type.as_deref()?, record.price_house?))
    });

    group_by(pairs)
        .into_iter()
        .map(|(parking_type, mut prices)| {
            prices.sort_by(f64::total_cmp);
            BoxSummary {
                parking_type,
                count: prices.len(),
                min: prices[0],
                q1: quantile(&prices, 0.25),
                median: quantile(&prices, 0.5),
                q3: quantile(&prices, 0.75),
                max: prices[prices.len() - 1],
            }
        })
        .collect()
}

/// Linear-interpolated quantile of a sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn price_distribution(dataset: &HistoricalDataset) -> Histogram {
    let prices: Vec<f64> = dataset
        .records
        .iter()
        .filter_map(|record| record.price_house)
        .filter(|price| price.is_finite())
        .collect();

    if prices.is_empty() {
        return Histogram::default();
    }

    let n = prices.len();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Sturges
    let bin_count = ((n as f64).log2().ceil() as usize + 1).max(1);
    let (start, width, bin_count) = if max > min {
        (min, (max - min) / bin_count as f64, bin_count)
    } else {
        (min - 0.5, 1.0, 1)
    };

    let mut counts = vec![0usize; bin_count];
    for price in &prices {
        let idx = ((price - start) / width).floor() as usize;
        counts[idx.min(bin_count - 1)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: start + width * i as f64,
            end: start + width * (i + 1) as f64,
            count,
        })
        .collect();

    Histogram {
        bins,
        kde: density_curve(&prices, width),
    }
}

/// Gaussian KDE with Scott's bandwidth, scaled so it overlays bin counts
fn density_curve(values: &[f64], bin_width: f64) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    if values.len() < 2 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    let bandwidth = std_dev * n.powf(-0.2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - KDE_CUT * bandwidth;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + KDE_CUT * bandwidth;
    let step = (max - min) / (KDE_GRID_POINTS - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..KDE_GRID_POINTS)
        .map(|i| {
            let x = min + step * i as f64;
            let density = norm
                * values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum::<f64>();
            [x, density * n * bin_width]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::HistoricalRecord;
    use std::path::PathBuf;

    fn record(price: Option<f64>, area: Option<f64>, parking: &str, city: &str) -> HistoricalRecord {
        HistoricalRecord {
            price_house: price,
            taxi_dist: Some(5000.0),
            market_dist: Some(9000.0),
            hospital_dist: Some(12000.0),
            carpet_area: area,
            builtup_area: area.map(|a| a * 1.2),
            parking_type: Some(parking.to_string()),
            city_type: Some(city.to_string()),
            rainfall: Some(800.0),
        }
    }

    fn dataset(records: Vec<HistoricalRecord>) -> HistoricalDataset {
        HistoricalDataset {
            source: PathBuf::from("Data.csv"),
            records,
        }
    }

    #[test]
    fn test_scatter_groups_by_city_in_appearance_order() {
        let data = dataset(vec![
            record(Some(100.0), Some(1000.0), "Open", "CAT B"),
            record(Some(200.0), Some(1100.0), "Open", "CAT A"),
            record(Some(300.0), Some(1200.0), "Open", "CAT B"),
            record(None, Some(1300.0), "Open", "CAT A"),
        ]);

        let series = price_vs_area(&data);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].city_type, "CAT B");
        assert_eq!(series[0].points, vec![[1000.0, 100.0], [1200.0, 300.0]]);
        assert_eq!(series[1].points, vec![[1100.0, 200.0]]);
    }

    #[test]
    fn test_box_summary_quantiles() {
        let data = dataset(
            [5.0, 1.0, 4.0, 2.0, 3.0]
                .into_iter()
                .map(|p| record(Some(p), Some(1000.0), "Covered", "CAT A"))
                .chain(std::iter::once(record(Some(7.0), None, "Open", "CAT A")))
                .collect(),
        );

        let boxes = parking_impact(&data);
        assert_eq!(boxes.len(), 2);

        let covered = &boxes[0];
        assert_eq!(covered.parking_type, "Covered");
        assert_eq!(covered.count, 5);
        assert_eq!(covered.min, 1.0);
        assert_eq!(covered.q1, 2.0);
        assert_eq!(covered.median, 3.0);
        assert_eq!(covered.q3, 4.0);
        assert_eq!(covered.max, 5.0);

        let open = &boxes[1];
        assert_eq!(open.count, 1);
        assert_eq!(open.median, 7.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
        assert_eq!(quantile(&[10.0], 0.75), 10.0);
    }

    #[test]
    fn test_histogram_counts_every_price() {
        let data = dataset(
            (0..32)
                .map(|i| record(Some(1_000_000.0 + 50_000.0 * i as f64), Some(900.0), "Open", "CAT C"))
                .collect(),
        );

        let hist = price_distribution(&data);
        // ceil(log2(32)) + 1
        assert_eq!(hist.bins.len(), 6);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 32);
        assert_eq!(hist.bins[0].start, 1_000_000.0);
        assert!((hist.bins[5].end - 2_550_000.0).abs() < 1e-6);

        assert_eq!(hist.kde.len(), KDE_GRID_POINTS);
        assert!(hist.kde.iter().all(|[_, y]| *y >= 0.0));
    }

    #[test]
    fn test_histogram_single_value() {
        let data = dataset(vec![record(Some(42.0), Some(900.0), "Open", "CAT C")]);

        let hist = price_distribution(&data);
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 1);
        assert!(hist.kde.is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let insights = market_insights(&dataset(Vec::new()));

        assert_eq!(insights.rows, 0);
        assert!(insights.price_vs_area.is_empty());
        assert!(insights.parking_impact.is_empty());
        assert_eq!(insights.price_distribution, Histogram::default());
    }
}
