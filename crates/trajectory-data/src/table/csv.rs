// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CSV ingestion for trajectory tables.
//!
//! Header-driven: `icao`, `flight`, `ts`, `lon` and `lat` are required;
//! every other column becomes a feature column. Timestamps parse either as
//! raw numbers (seconds) or as datetimes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use log::info;
use thiserror::Error;

use super::{BuildError, TableBuilder, TrackSample, TrajectoryTable};

const ICAO_COLUMN: &str = "icao";
const FLIGHT_COLUMN: &str = "flight";
const TIMESTAMP_COLUMN: &str = "ts";
const LONGITUDE_COLUMN: &str = "lon";
const LATITUDE_COLUMN: &str = "lat";

/// Errors that can occur while loading a dataset. Fatal at startup only.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("invalid value for field '{field}' on line {line}: {value}")]
    InvalidValue {
        field: &'static str,
        line: u64,
        value: String,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Load a trajectory table from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<TrajectoryTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = read_table(file)?;
    info!(
        "loaded {} samples for {} aircraft from {}",
        table.len(),
        table.aircraft_count(),
        path.display()
    );
    Ok(table)
}

/// Read a trajectory table from any CSV source.
pub fn read_table<R: Read>(reader: R) -> Result<TrajectoryTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let icao_col = require_column(&headers, ICAO_COLUMN)?;
    let flight_col = require_column(&headers, FLIGHT_COLUMN)?;
    let ts_col = require_column(&headers, TIMESTAMP_COLUMN)?;
    let lon_col = require_column(&headers, LONGITUDE_COLUMN)?;
    let lat_col = require_column(&headers, LATITUDE_COLUMN)?;

    // Every column that is not part of the fixed schema is a feature column.
    let fixed = [icao_col, flight_col, ts_col, lon_col, lat_col];
    let feature_cols: Vec<usize> = (0..headers.len()).filter(|i| !fixed.contains(i)).collect();
    let feature_names: Vec<String> = feature_cols
        .iter()
        .map(|&i| headers[i].to_string())
        .collect();

    let mut builder = TrajectoryTable::builder(feature_names);
    let mut features = Vec::with_capacity(feature_cols.len());

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let icao = &record[icao_col];
        let flight = match &record[flight_col] {
            // Single-flight rows may leave the sub-identifier blank.
            "" => icao,
            id => id,
        };
        let sample = TrackSample {
            ts: parse_timestamp(&record[ts_col])
                .ok_or_else(|| invalid(TIMESTAMP_COLUMN, line, &record[ts_col]))?,
            lon: parse_f64(&record[lon_col])
                .ok_or_else(|| invalid(LONGITUDE_COLUMN, line, &record[lon_col]))?,
            lat: parse_f64(&record[lat_col])
                .ok_or_else(|| invalid(LATITUDE_COLUMN, line, &record[lat_col]))?,
        };

        features.clear();
        for (&col, name) in feature_cols.iter().zip(builder.feature_names()) {
            let value =
                parse_f64(&record[col]).ok_or_else(|| invalid_owned(name, line, &record[col]))?;
            features.push(value);
        }

        builder.push(icao, flight, sample, &features)?;
    }

    Ok(builder.build())
}

fn require_column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(LoadError::MissingColumn(name))
}

fn parse_f64(value: &str) -> Option<f64> {
    value.parse::<f64>().ok()
}

/// Accepts raw seconds, RFC 3339, or `YYYY-MM-DD HH:MM:SS` (taken as UTC).
fn parse_timestamp(value: &str) -> Option<f64> {
    if let Ok(seconds) = value.parse::<f64>() {
        return Some(seconds);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(millis_to_seconds(dt.timestamp_millis()));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| millis_to_seconds(dt.and_utc().timestamp_millis()))
}

#[allow(
    clippy::cast_precision_loss,
    reason = "session timestamps are far below 2^53 ms"
)]
fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

fn invalid(field: &'static str, line: u64, value: &str) -> LoadError {
    LoadError::InvalidValue {
        field,
        line,
        value: value.to_string(),
    }
}

fn invalid_owned(field: &str, line: u64, value: &str) -> LoadError {
    // Feature names are dynamic; report them through the value slot.
    LoadError::InvalidValue {
        field: "feature",
        line,
        value: format!("{field}={value}"),
    }
}
