//! Dataset parsing - read the historical sales table from CSV or XLSX

use crate::valuation::types::{HistoricalDataset, HistoricalRecord};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Columns the chart surface cannot do without
pub const REQUIRED_COLUMNS: [&str; 4] = ["Carpet_area", "Price_house", "Parking_type", "City_type"];

/// Load the dataset, picking the parser from the file extension
pub fn load_dataset(path: &Path) -> Result<HistoricalDataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let records = match extension.as_deref() {
        Some("xlsx") | Some("xls") | Some("xlsm") | Some("ods") => parse_workbook(path)?,
        _ => parse_csv(path)?,
    };

    Ok(HistoricalDataset {
        source: path.to_path_buf(),
        records,
    })
}

fn check_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = headers.into_iter().map(str::trim).collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();

    if !missing.is_empty() {
        anyhow::bail!("Dataset is missing columns: {}", missing.join(", "));
    }
    Ok(())
}

/// Parse a CSV dataset into HistoricalRecord structs
pub fn parse_csv(path: &Path) -> Result<Vec<HistoricalRecord>> {
    info!("Parsing dataset CSV from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset {:?}", path))?;

    check_columns(reader.headers()?.iter())?;

    let mut records = Vec::new();
    let mut parse_errors = 0;

    for (idx, result) in reader.deserialize::<HistoricalRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    // Only log first 10 errors
                    warn!("Failed to deserialize row {}: {}", idx, e);
                }
            }
        }
    }

    info!(
        "Parsed {} records from dataset CSV ({} errors)",
        records.len(),
        parse_errors
    );

    Ok(records)
}

/// Parse the first sheet of a workbook into HistoricalRecord structs
pub fn parse_workbook(path: &Path) -> Result<Vec<HistoricalRecord>> {
    info!("Parsing dataset workbook from {:?}", path);

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {:?}", path))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .context("No sheets found in workbook")?
        .clone();
    info!("Reading sheet: {}", sheet_name);

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .context("Workbook sheet is empty")?
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    check_columns(header.iter().map(String::as_str))?;

    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim(), idx))
        .collect();

    let number = |row: &[Data], column: &str| {
        columns
            .get(column)
            .and_then(|&idx| row.get(idx))
            .and_then(cell_number)
    };
    let text = |row: &[Data], column: &str| {
        columns
            .get(column)
            .and_then(|&idx| row.get(idx))
            .and_then(cell_text)
    };

    let records: Vec<HistoricalRecord> = rows
        .map(|row| HistoricalRecord {
            price_house: number(row, "Price_house"),
            taxi_dist: number(row, "Taxi_dist"),
            market_dist: number(row, "Market_dist"),
            hospital_dist: number(row, "Hospital_dist"),
            carpet_area: number(row, "Carpet_area"),
            builtup_area: number(row, "Builtup_area"),
            parking_type: text(row, "Parking_type"),
            city_type: text(row, "City_type"),
            rainfall: number(row, "Rainfall"),
        })
        .collect();

    info!("Parsed {} records from dataset workbook", records.len());

    Ok(records)
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        _ => None,
    }
}
