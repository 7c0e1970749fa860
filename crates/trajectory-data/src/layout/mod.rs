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

//! Label panel layout and visibility culling.
//!
//! One label per aircraft on a fixed horizontal column, vertical positions
//! evenly spaced over a range sized to the aircraft count. With flight
//! labels enabled, each flight gets a child label at its parent's vertical
//! coordinate, laid out to the right with the same linspace shape. The
//! identifier ↔ layout index ↔ coordinate mapping is built once here and
//! queried everywhere else; nothing reverse-indexes a coordinate array.

use std::collections::HashMap;

use crate::table::TrajectoryTable;

/// Fixed horizontal coordinate of the aircraft label column.
pub const LABEL_COLUMN_X: f32 = 0.05;
/// Vertical coordinate of the first label row.
const FIRST_ROW_Y: f32 = 0.07;
/// N labels occupy `ROW_SPAN_FACTOR * (N + 1)` vertical units.
const ROW_SPAN_FACTOR: f32 = 0.05;
/// First horizontal coordinate of the flight label columns.
const FLIGHT_COLUMN_X: f32 = 0.12;
/// M flight labels occupy `FLIGHT_SPAN_FACTOR * (M + 1)` horizontal units.
const FLIGHT_SPAN_FACTOR: f32 = 0.07;
/// Labels at or above this coordinate start out hidden. The label list is
/// unbounded while the panel's view range is not; off-range labels are
/// revealed by the cull pass once the view scrolls to them.
const CREATE_VISIBLE_BELOW: f32 = 1.0;
/// Labels within this margin outside the view range stay visible.
pub const CULL_MARGIN: f32 = 0.2;

/// One aircraft label entry.
#[derive(Debug, Clone)]
pub struct AircraftLabel {
    pub icao: String,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// One flight label entry, nested to the right of its owning aircraft.
#[derive(Debug, Clone)]
pub struct FlightLabel {
    pub id: String,
    /// Layout index of the owning aircraft label.
    pub owner: usize,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// The label layout: entries are created once from the table's distinct
/// identifier set; only their visibility flags mutate afterwards.
#[derive(Debug, Clone)]
pub struct LabelLayout {
    aircraft: Vec<AircraftLabel>,
    flights: Vec<FlightLabel>,
    index: HashMap<String, usize>,
}

impl LabelLayout {
    /// Build the layout from the table's aircraft sequence. `flight_labels`
    /// adds the nested per-flight entries.
    #[must_use]
    pub fn new(table: &TrajectoryTable, flight_labels: bool) -> Self {
        let ids: Vec<&str> = table.aircraft_ids().collect();
        let count = ids.len();
        let mut aircraft = Vec::with_capacity(count);
        let mut flights = Vec::new();
        let mut index = HashMap::with_capacity(count);

        for (i, id) in ids.iter().enumerate() {
            let y = linspace_at(FIRST_ROW_Y, ROW_SPAN_FACTOR, count, i);
            // First match wins should an identifier somehow repeat.
            index.entry((*id).to_string()).or_insert(i);
            aircraft.push(AircraftLabel {
                icao: (*id).to_string(),
                x: LABEL_COLUMN_X,
                y,
                visible: y < CREATE_VISIBLE_BELOW,
            });

            if flight_labels {
                let flight_ids: Vec<&str> = table.flights_of(id).collect();
                let columns = flight_ids.len();
                for (j, flight_id) in flight_ids.iter().enumerate() {
                    let x = linspace_at(FLIGHT_COLUMN_X, FLIGHT_SPAN_FACTOR, columns, j);
                    flights.push(FlightLabel {
                        id: (*flight_id).to_string(),
                        owner: i,
                        x,
                        y,
                        visible: y < CREATE_VISIBLE_BELOW,
                    });
                }
            }
        }

        Self {
            aircraft,
            flights,
            index,
        }
    }

    /// Number of aircraft labels; this is also the layout-index bound.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    /// Check if the layout holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// All aircraft labels, in layout-index order.
    #[must_use]
    pub fn aircraft(&self) -> &[AircraftLabel] {
        &self.aircraft
    }

    /// All flight labels. Empty unless flight labels were enabled.
    #[must_use]
    pub fn flights(&self) -> &[FlightLabel] {
        &self.flights
    }

    /// Layout index of an aircraft identifier.
    #[must_use]
    pub fn index_of(&self, icao: &str) -> Option<usize> {
        self.index.get(icao).copied()
    }

    /// The aircraft label at a layout index.
    #[must_use]
    pub fn aircraft_at(&self, index: usize) -> Option<&AircraftLabel> {
        self.aircraft.get(index)
    }

    /// The first flight label matching an id.
    #[must_use]
    pub fn flight_entry(&self, id: &str) -> Option<&FlightLabel> {
        self.flights.iter().find(|f| f.id == id)
    }

    /// Re-evaluate every label against the panel's vertical view range.
    /// A label is visible iff its vertical coordinate lies within
    /// `[low - CULL_MARGIN, high + CULL_MARGIN]`. Returns the visible count.
    pub fn cull(&mut self, low: f32, high: f32) -> usize {
        let lo = low - CULL_MARGIN;
        let hi = high + CULL_MARGIN;
        let mut visible = 0;
        for label in &mut self.aircraft {
            label.visible = (lo..=hi).contains(&label.y);
            visible += usize::from(label.visible);
        }
        for label in &mut self.flights {
            label.visible = (lo..=hi).contains(&label.y);
            visible += usize::from(label.visible);
        }
        visible
    }
}

/// `i`-th of `count` values evenly spaced from `start` over a span of
/// `factor * (count + 1)` units, endpoint excluded.
#[allow(
    clippy::cast_precision_loss,
    reason = "label counts are far below f32 precision limits"
)]
fn linspace_at(start: f32, factor: f32, count: usize, i: usize) -> f32 {
    let span = factor * (count as f32 + 1.0);
    start + i as f32 * (span - start) / count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{TrackSample, TrajectoryTable};

    fn table_with(ids: &[&str]) -> TrajectoryTable {
        let mut builder = TrajectoryTable::builder(vec![]);
        for (i, id) in ids.iter().enumerate() {
            let flight = format!("{id}_1");
            let sample = TrackSample {
                ts: i as f64,
                lon: 4.0,
                lat: 52.0,
            };
            builder.push(id, &flight, sample, &[]).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_one_entry_per_aircraft_strictly_increasing() {
        for count in [1usize, 2, 5, 40] {
            let ids: Vec<String> = (0..count).map(|i| format!("AC{i:03}")).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let layout = LabelLayout::new(&table_with(&refs), false);
            assert_eq!(layout.len(), count);

            let ys: Vec<f32> = layout.aircraft().iter().map(|l| l.y).collect();
            for pair in ys.windows(2) {
                assert!(pair[1] > pair[0]);
            }
            // Constant spacing computed from the count.
            if count > 1 {
                let spacing = ys[1] - ys[0];
                for pair in ys.windows(2) {
                    assert!((pair[1] - pair[0] - spacing).abs() < 1e-5);
                }
            }
            assert!((ys[0] - 0.07).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_table_empty_layout() {
        let layout = LabelLayout::new(&table_with(&[]), true);
        assert!(layout.is_empty());
        assert!(layout.flights().is_empty());
    }

    #[test]
    fn test_overflow_labels_start_hidden() {
        // 40 aircraft span 0.05 * 41 = 2.05 units; labels past 1.0 must
        // start hidden, the rest visible.
        let ids: Vec<String> = (0..40).map(|i| format!("AC{i:03}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let layout = LabelLayout::new(&table_with(&refs), false);
        for label in layout.aircraft() {
            assert_eq!(label.visible, label.y < 1.0);
        }
        assert!(layout.aircraft().iter().any(|l| !l.visible));
    }

    #[test]
    fn test_cull_window_with_margin() {
        let ids: Vec<String> = (0..40).map(|i| format!("AC{i:03}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut layout = LabelLayout::new(&table_with(&refs), false);

        layout.cull(1.0, 1.5);
        for label in layout.aircraft() {
            let expected = label.y >= 0.8 && label.y <= 1.7;
            assert_eq!(label.visible, expected, "y = {}", label.y);
        }
    }

    #[test]
    fn test_flight_labels_share_parent_row() {
        let mut builder = TrajectoryTable::builder(vec![]);
        for (flight, ts) in [("AB_1", 0.0), ("AB_2", 10.0), ("AB_3", 20.0)] {
            let sample = TrackSample {
                ts,
                lon: 4.0,
                lat: 52.0,
            };
            builder.push("ABC123", flight, sample, &[]).unwrap();
        }
        let table = builder.build();
        let layout = LabelLayout::new(&table, true);

        assert_eq!(layout.flights().len(), 3);
        let parent_y = layout.aircraft()[0].y;
        let xs: Vec<f32> = layout.flights().iter().map(|f| f.x).collect();
        for (i, flight) in layout.flights().iter().enumerate() {
            assert_eq!(flight.owner, 0);
            assert!((flight.y - parent_y).abs() < f32::EPSILON);
            // Left-aligned to the right of the parent column.
            assert!(flight.x > LABEL_COLUMN_X);
            if i > 0 {
                assert!(xs[i] > xs[i - 1]);
            }
        }
    }

    #[test]
    fn test_index_mapping_round_trips() {
        let layout = LabelLayout::new(&table_with(&["AAA", "BBB", "CCC"]), false);
        for (i, label) in layout.aircraft().iter().enumerate() {
            assert_eq!(layout.index_of(&label.icao), Some(i));
            assert_eq!(layout.aircraft_at(i).map(|l| l.icao.as_str()), Some(label.icao.as_str()));
        }
        assert_eq!(layout.index_of("ZZZ"), None);
        assert!(layout.aircraft_at(3).is_none());
    }
}
