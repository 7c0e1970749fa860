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

//! Trajectory table storage and lookup.
//!
//! The table is loaded once at startup and treated as immutable for the
//! session. Rows are keyed by (aircraft ICAO address, flight id, row order);
//! all rows of one aircraft form a contiguous block, and within an aircraft
//! all rows of one flight form a contiguous, time-ordered block. `build()`
//! establishes these invariants whatever order the rows arrive in.

mod csv;

pub use self::csv::{load_csv, read_table, LoadError};

use std::collections::HashMap;
use std::ops::Range;

use thiserror::Error;

/// Errors raised by table lookups.
///
/// These are not caught inside the core resolution path: a failed selection
/// propagates to the redraw boundary, which logs it and leaves the previous
/// drawing in place.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("unknown aircraft identifier: {0}")]
    UnknownAircraft(String),

    #[error("unknown flight identifier: {0}")]
    UnknownFlight(String),

    #[error("unknown feature column: {0}")]
    UnknownFeature(String),
}

/// Errors raised while assembling a table.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("row has {got} feature values, expected {expected}")]
    FeatureCount { expected: usize, got: usize },
}

/// One trajectory sample: timestamp (seconds), longitude and latitude in
/// degrees. Feature values live in the table's columnar store, aligned by
/// row index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub ts: f64,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone)]
struct AircraftBlock {
    icao: String,
    rows: Range<usize>,
    flights: Range<usize>,
}

#[derive(Debug, Clone)]
struct FlightBlock {
    id: String,
    owner: usize,
    rows: Range<usize>,
}

/// Read-only trajectory table shared by every view for the session.
#[derive(Debug, Clone)]
pub struct TrajectoryTable {
    samples: Vec<TrackSample>,
    feature_names: Vec<String>,
    /// Column-major feature storage; `features[c][r]` pairs with `samples[r]`.
    features: Vec<Vec<f64>>,
    aircraft: Vec<AircraftBlock>,
    flights: Vec<FlightBlock>,
    aircraft_index: HashMap<String, usize>,
}

impl TrajectoryTable {
    /// Start building a table with the given feature columns.
    #[must_use]
    pub fn builder(feature_names: Vec<String>) -> TableBuilder {
        TableBuilder {
            feature_names,
            rows: Vec::new(),
        }
    }

    /// Total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of distinct aircraft.
    #[must_use]
    pub fn aircraft_count(&self) -> usize {
        self.aircraft.len()
    }

    /// The ordered distinct aircraft identifier sequence. This is the
    /// sequence the label layout and the layout-index space are built from.
    pub fn aircraft_ids(&self) -> impl Iterator<Item = &str> {
        self.aircraft.iter().map(|a| a.icao.as_str())
    }

    /// Declared feature column names, in input order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Check whether a feature column exists.
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.feature_names.iter().any(|n| n == name)
    }

    /// The full row subset of one aircraft, in row order.
    pub fn track(&self, icao: &str) -> Result<TrackView<'_>, TableError> {
        let &idx = self
            .aircraft_index
            .get(icao)
            .ok_or_else(|| TableError::UnknownAircraft(icao.to_string()))?;
        let rows = &self.aircraft[idx].rows;
        Ok(TrackView {
            table: self,
            start: rows.start,
            end: rows.end,
        })
    }

    /// The row subset of one flight. Flight ids are unique per aircraft but
    /// not globally; a bare id resolves to the first match in table order.
    pub fn flight(&self, id: &str) -> Result<TrackView<'_>, TableError> {
        let block = self.flight_block(id)?;
        Ok(TrackView {
            table: self,
            start: block.rows.start,
            end: block.rows.end,
        })
    }

    /// The aircraft a flight belongs to, derived from the flight's row block.
    pub fn flight_owner(&self, id: &str) -> Result<&str, TableError> {
        let block = self.flight_block(id)?;
        Ok(self.aircraft[block.owner].icao.as_str())
    }

    /// Flight ids of one aircraft, in input order. Empty for unknown ids.
    pub fn flights_of(&self, icao: &str) -> impl Iterator<Item = &str> {
        let range = self
            .aircraft_index
            .get(icao)
            .map_or(0..0, |&i| self.aircraft[i].flights.clone());
        self.flights[range].iter().map(|f| f.id.as_str())
    }

    fn flight_block(&self, id: &str) -> Result<&FlightBlock, TableError> {
        self.flights
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| TableError::UnknownFlight(id.to_string()))
    }

    fn feature_column(&self, name: &str) -> Result<&[f64], TableError> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|c| self.features[c].as_slice())
            .ok_or_else(|| TableError::UnknownFeature(name.to_string()))
    }
}

/// A borrowed, ordered row subset for one aircraft or one flight.
#[derive(Debug, Clone, Copy)]
pub struct TrackView<'a> {
    table: &'a TrajectoryTable,
    start: usize,
    end: usize,
}

impl<'a> TrackView<'a> {
    /// Number of rows in the subset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the subset holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The samples of this subset, in row order.
    #[must_use]
    pub fn samples(&self) -> &'a [TrackSample] {
        &self.table.samples[self.start..self.end]
    }

    /// (longitude, latitude) pairs in row order, for the ground track.
    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.samples().iter().map(|s| (s.lon, s.lat))
    }

    /// (timestamp, value) pairs for a feature column, in row order.
    pub fn feature_points(&self, name: &str) -> Result<Vec<[f64; 2]>, TableError> {
        let column = self.table.feature_column(name)?;
        Ok(self
            .samples()
            .iter()
            .zip(&column[self.start..self.end])
            .map(|(s, &v)| [s.ts, v])
            .collect())
    }
}

#[derive(Debug)]
struct RawRow {
    icao: String,
    flight: String,
    sample: TrackSample,
    features: Vec<f64>,
}

/// Row-at-a-time table construction. `build()` groups rows by aircraft and
/// flight (first-appearance order) and sorts each flight by timestamp.
#[derive(Debug)]
pub struct TableBuilder {
    feature_names: Vec<String>,
    rows: Vec<RawRow>,
}

impl TableBuilder {
    /// Add one row. The feature slice must match the declared columns.
    pub fn push(
        &mut self,
        icao: &str,
        flight: &str,
        sample: TrackSample,
        features: &[f64],
    ) -> Result<(), BuildError> {
        if features.len() != self.feature_names.len() {
            return Err(BuildError::FeatureCount {
                expected: self.feature_names.len(),
                got: features.len(),
            });
        }
        self.rows.push(RawRow {
            icao: icao.to_string(),
            flight: flight.to_string(),
            sample,
            features: features.to_vec(),
        });
        Ok(())
    }

    /// Declared feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of rows staged so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows have been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Group and sort the staged rows into an immutable table.
    #[must_use]
    pub fn build(self) -> TrajectoryTable {
        let Self {
            feature_names,
            rows,
        } = self;

        // First-appearance order for aircraft, and for flights within one
        // aircraft, so the label sequence matches the input.
        let mut aircraft_order: HashMap<String, usize> = HashMap::new();
        let mut flight_order: HashMap<(usize, String), usize> = HashMap::new();
        let keys: Vec<(usize, usize)> = rows
            .iter()
            .map(|row| {
                let next = aircraft_order.len();
                let a = *aircraft_order.entry(row.icao.clone()).or_insert(next);
                let next = flight_order.len();
                let f = *flight_order
                    .entry((a, row.flight.clone()))
                    .or_insert(next);
                (a, f)
            })
            .collect();

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&l, &r| {
            keys[l]
                .cmp(&keys[r])
                .then_with(|| rows[l].sample.ts.total_cmp(&rows[r].sample.ts))
        });

        let mut samples = Vec::with_capacity(rows.len());
        let mut features: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); feature_names.len()];
        let mut aircraft: Vec<AircraftBlock> = Vec::new();
        let mut flights: Vec<FlightBlock> = Vec::new();
        let mut aircraft_index = HashMap::new();

        for &src in &order {
            let row = &rows[src];
            let r = samples.len();

            let new_aircraft = aircraft.last().is_none_or(|a: &AircraftBlock| a.icao != row.icao);
            if new_aircraft {
                aircraft_index
                    .entry(row.icao.clone())
                    .or_insert(aircraft.len());
                aircraft.push(AircraftBlock {
                    icao: row.icao.clone(),
                    rows: r..r,
                    flights: flights.len()..flights.len(),
                });
            }
            let new_flight =
                new_aircraft || flights.last().is_none_or(|f: &FlightBlock| f.id != row.flight);
            if new_flight {
                flights.push(FlightBlock {
                    id: row.flight.clone(),
                    owner: aircraft.len() - 1,
                    rows: r..r,
                });
            }

            samples.push(row.sample);
            for (column, value) in features.iter_mut().zip(row.features.iter()) {
                column.push(*value);
            }

            if let Some(a) = aircraft.last_mut() {
                a.rows.end = r + 1;
                a.flights.end = flights.len();
            }
            if let Some(f) = flights.last_mut() {
                f.rows.end = r + 1;
            }
        }

        TrajectoryTable {
            samples,
            feature_names,
            features,
            aircraft,
            flights,
            aircraft_index,
        }
    }
}
