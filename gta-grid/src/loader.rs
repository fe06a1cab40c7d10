//! Dataset loaders for anomaly grids.
//!
//! # Formats
//!
//! - **JSON**: `{"tempanomalies": [{"lat": 88, "lon": -178, "data": [...]}]}` where each
//!   sample is `{"year": 1880, "value": -0.3}`
//!   where `value` is a number or the string `"NA"`.
//! - **Gzipped JSON**: the same document compressed with gzip.
//! - **CSV** (has headers): `lat,lon,year,value`, one sample per row,
//!   `value` either numeric, `NA` or blank.
//!
//! Every loader normalises missing values to `None` before the data
//! reaches the rest of the engine.

use crate::cell::{Cell, YearValue};
use crate::dataset::GridDataset;
use anyhow::Context;
use flate2::read::GzDecoder;
use gta_utils::error::GridError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawDocument {
    tempanomalies: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    lat: f64,
    lon: f64,
    #[serde(default)]
    data: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    year: i32,
    #[serde(default)]
    value: Option<RawValue>,
}

/// A sample value as found in the source JSON: a number, or a sentinel
/// string such as `"NA"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn normalize(self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(v),
            // Numbers quoted as strings are accepted, anything else is NA
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// Parse a CSV value field; `NA`, blank and unparseable fields are missing.
fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") {
        return None;
    }
    s.parse::<f64>().ok()
}

impl GridDataset {
    /// Load a dataset from the anomaly JSON document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gta_grid::GridDataset;
    ///
    /// let json = r#"{"tempanomalies":[{"lat":0,"lon":0,"data":[
    ///     {"year":1880,"value":"NA"},
    ///     {"year":1881,"value":0.4}
    /// ]}]}"#;
    /// let ds = GridDataset::from_json_str(json).unwrap();
    /// assert_eq!(ds.raw_value(0, 1880), None);
    /// assert_eq!(ds.raw_value(0, 1881), Some(0.4));
    /// ```
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let doc: RawDocument = serde_json::from_str(json)?;

        let mut samples = 0u32;
        let mut missing = 0u32;
        let cells = doc
            .tempanomalies
            .into_iter()
            .map(|raw| {
                let data = raw
                    .data
                    .into_iter()
                    .map(|s| {
                        let value = s.value.and_then(RawValue::normalize);
                        let sample = YearValue::new(s.year, value);
                        samples += 1;
                        if sample.value.is_none() {
                            missing += 1;
                        }
                        sample
                    })
                    .collect();
                Cell::new(raw.lat.round() as i32, raw.lon.round() as i32, data)
            })
            .collect::<Vec<_>>();

        log::info!(
            "[GTA] loader: Loaded {} cells, {} samples ({} NA) from JSON",
            cells.len(),
            samples,
            missing
        );
        GridDataset::new(cells)
    }

    /// Load a dataset from gzip-compressed anomaly JSON.
    pub fn from_gzip_json(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut decoder = GzDecoder::new(bytes);
        let mut json = String::new();
        decoder
            .read_to_string(&mut json)
            .context("failed to decompress gzip dataset")?;
        log::debug!(
            "[GTA] loader: Decompressed {} bytes into {} bytes of JSON",
            bytes.len(),
            json.len()
        );
        Self::from_json_str(&json)
    }

    /// Load a dataset from long-format CSV (`lat,lon,year,value`).
    ///
    /// Cells keep the order in which their `(lat, lon)` pair first appears.
    ///
    /// # Example CSV
    /// ```text
    /// lat,lon,year,value
    /// 0,0,1880,-0.12
    /// 0,0,1881,NA
    /// ```
    pub fn from_csv_str(csv_data: &str) -> anyhow::Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut order: Vec<(i32, i32)> = Vec::new();
        let mut series: HashMap<(i32, i32), Vec<YearValue>> = HashMap::new();
        let mut count = 0u32;
        let mut missing = 0u32;
        for result in rdr.records() {
            let r = result?;
            let lat: i32 = r.get(0).unwrap_or("").trim().parse()?;
            let lon: i32 = r.get(1).unwrap_or("").trim().parse()?;
            let year: i32 = r.get(2).unwrap_or("").trim().parse()?;
            let value = parse_value(r.get(3).unwrap_or(""));
            if value.is_none() {
                missing += 1;
            }

            series
                .entry((lat, lon))
                .or_insert_with(|| {
                    order.push((lat, lon));
                    Vec::new()
                })
                .push(YearValue::new(year, value));
            count += 1;
        }

        let cells = order
            .into_iter()
            .map(|key| {
                let data = series.remove(&key).unwrap_or_default();
                Cell::new(key.0, key.1, data)
            })
            .collect::<Vec<_>>();
        log::info!(
            "[GTA] loader: Loaded {} cells from {} CSV rows ({} NA)",
            cells.len(),
            count,
            missing
        );
        GridDataset::new(cells)
    }

    /// Load a dataset from disk, choosing the format from the file name:
    /// `.json`, `.json.gz` / `.gz`, or `.csv`.
    pub fn load_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let name = path.to_string_lossy().to_ascii_lowercase();
        log::info!("[GTA] loader: Reading dataset {}", path.display());

        if name.ends_with(".gz") {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Self::from_gzip_json(&bytes)
        } else if name.ends_with(".json") {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Self::from_json_str(&json)
        } else if name.ends_with(".csv") {
            let csv_data = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Self::from_csv_str(&csv_data)
        } else {
            Err(GridError::UnsupportedFormat(path.display().to_string()).into())
        }
    }
}
