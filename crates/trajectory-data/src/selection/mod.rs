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

//! Selection state and pick resolution.
//!
//! A pick arrives as a [`PickTarget`] resolved once at dispatch time; the
//! handlers here only mutate [`Selection`]. The selected identifier, its
//! layout index, and the highlight coordinates always move together, so the
//! highlight marker and the drawn track can never disagree.

use log::debug;

use crate::layout::LabelLayout;
use crate::table::{TableError, TrajectoryTable};

/// What a pick event resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// An aircraft label was picked.
    Aircraft(String),
    /// A flight label was picked; `owner` is the aircraft it belongs to.
    Flight { id: String, owner: String },
}

impl PickTarget {
    /// Resolve free text against the table: text matching an aircraft
    /// identifier is an aircraft pick; anything else is treated as a flight
    /// pick with the owner derived from the flight's rows.
    pub fn resolve(text: &str, table: &TrajectoryTable) -> Result<Self, TableError> {
        if table.aircraft_ids().any(|id| id == text) {
            return Ok(Self::Aircraft(text.to_string()));
        }
        let owner = table.flight_owner(text)?;
        Ok(Self::Flight {
            id: text.to_string(),
            owner: owner.to_string(),
        })
    }
}

/// Direction for keyboard stepping through the label sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Next,
    Previous,
}

/// What the views should draw for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKey<'a> {
    Aircraft(&'a str),
    Flight(&'a str),
}

/// The current selection. Starts unselected; once something is selected the
/// state never returns to unselected, it is only replaced.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    icao: Option<String>,
    flight: Option<String>,
    index: Option<usize>,
    highlight: Option<(f32, f32)>,
}

impl Selection {
    /// Currently selected aircraft identifier.
    #[must_use]
    pub fn icao(&self) -> Option<&str> {
        self.icao.as_deref()
    }

    /// Currently selected flight, when the selection came from a flight pick.
    #[must_use]
    pub fn flight(&self) -> Option<&str> {
        self.flight.as_deref()
    }

    /// Layout index of the selected aircraft label.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Layout coordinates of the highlight marker.
    #[must_use]
    pub fn highlight(&self) -> Option<(f32, f32)> {
        self.highlight
    }

    /// Check whether anything has been selected yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.icao.is_some()
    }

    /// What the map and feature views should draw: the flight subset when a
    /// flight is selected, the whole aircraft subset otherwise.
    #[must_use]
    pub fn track_key(&self) -> Option<TrackKey<'_>> {
        if let Some(flight) = self.flight.as_deref() {
            return Some(TrackKey::Flight(flight));
        }
        self.icao.as_deref().map(TrackKey::Aircraft)
    }

    /// Apply a pick event.
    ///
    /// Aircraft path: the highlight moves to the aircraft label. Flight
    /// path: the highlight takes the picked flight label's own coordinates,
    /// while the layout index is the owning aircraft's (flights have no
    /// index of their own).
    pub fn apply_pick(&mut self, target: &PickTarget, layout: &LabelLayout) {
        match target {
            PickTarget::Aircraft(id) => {
                self.icao = Some(id.clone());
                self.flight = None;
                self.index = layout.index_of(id);
                self.highlight = self
                    .index
                    .and_then(|i| layout.aircraft_at(i))
                    .map(|label| (label.x, label.y));
            }
            PickTarget::Flight { id, owner } => {
                self.icao = Some(owner.clone());
                self.flight = Some(id.clone());
                self.index = layout.index_of(owner);
                self.highlight = layout.flight_entry(id).map(|label| (label.x, label.y));
            }
        }
        debug!(
            "selection: icao={:?} flight={:?} index={:?}",
            self.icao, self.flight, self.index
        );
    }

    /// Apply a text submit. Always resolves as an aircraft selection, even
    /// when no such identifier exists: the state updates and the following
    /// redraw surfaces the lookup failure instead of preventing it.
    pub fn apply_submit(&mut self, text: &str, layout: &LabelLayout) {
        self.icao = Some(text.to_string());
        self.flight = None;
        self.index = layout.index_of(text);
        self.highlight = self
            .index
            .and_then(|i| layout.aircraft_at(i))
            .map(|label| (label.x, label.y));
    }

    /// Advance or retreat the layout index by one, clamped to the label
    /// sequence, selecting the aircraft at the new index. No-op before the
    /// first selection or when the index cannot move. Returns whether the
    /// selection changed.
    pub fn step(&mut self, direction: StepDirection, layout: &LabelLayout) -> bool {
        let Some(current) = self.index else {
            return false;
        };
        if layout.is_empty() {
            return false;
        }
        let stepped = match direction {
            StepDirection::Next => (current + 1).min(layout.len() - 1),
            StepDirection::Previous => current.saturating_sub(1),
        };
        if stepped == current {
            return false;
        }
        let Some(label) = layout.aircraft_at(stepped) else {
            return false;
        };
        self.icao = Some(label.icao.clone());
        self.flight = None;
        self.index = Some(stepped);
        self.highlight = Some((label.x, label.y));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{TrackSample, TrajectoryTable};

    fn sample(ts: f64, lon: f64, lat: f64) -> TrackSample {
        TrackSample { ts, lon, lat }
    }

    fn fixture() -> (TrajectoryTable, LabelLayout) {
        let mut builder = TrajectoryTable::builder(vec!["alt".to_string()]);
        builder
            .push("ABC123", "ABC123_1", sample(0.0, 4.7, 52.3), &[1000.0])
            .unwrap();
        builder
            .push("ABC123", "ABC123_2", sample(100.0, 4.9, 52.5), &[3000.0])
            .unwrap();
        builder
            .push("DEF456", "DEF456_1", sample(5.0, 4.1, 51.9), &[500.0])
            .unwrap();
        builder
            .push("GHI789", "GHI789_1", sample(7.0, 3.9, 51.5), &[800.0])
            .unwrap();
        let table = builder.build();
        let layout = LabelLayout::new(&table, true);
        (table, layout)
    }

    #[test]
    fn test_resolve_prefers_aircraft_ids() {
        let (table, _) = fixture();
        assert_eq!(
            PickTarget::resolve("ABC123", &table).unwrap(),
            PickTarget::Aircraft("ABC123".to_string())
        );
        assert_eq!(
            PickTarget::resolve("ABC123_2", &table).unwrap(),
            PickTarget::Flight {
                id: "ABC123_2".to_string(),
                owner: "ABC123".to_string()
            }
        );
        assert!(PickTarget::resolve("ZZZ999", &table).is_err());
    }

    #[test]
    fn test_aircraft_pick_is_idempotent() {
        let (_, layout) = fixture();
        let mut selection = Selection::default();
        let target = PickTarget::Aircraft("DEF456".to_string());

        selection.apply_pick(&target, &layout);
        assert_eq!(selection.icao(), Some("DEF456"));
        assert_eq!(selection.flight(), None);
        assert_eq!(selection.index(), Some(1));
        let first = selection.highlight();

        selection.apply_pick(&target, &layout);
        assert_eq!(selection.icao(), Some("DEF456"));
        assert_eq!(selection.index(), Some(1));
        assert_eq!(selection.highlight(), first);
    }

    #[test]
    fn test_flight_pick_highlights_own_label() {
        let (_, layout) = fixture();
        let mut selection = Selection::default();
        let target = PickTarget::Flight {
            id: "ABC123_2".to_string(),
            owner: "ABC123".to_string(),
        };
        selection.apply_pick(&target, &layout);

        assert_eq!(selection.icao(), Some("ABC123"));
        assert_eq!(selection.flight(), Some("ABC123_2"));
        assert_eq!(selection.index(), Some(0));
        assert_eq!(selection.track_key(), Some(TrackKey::Flight("ABC123_2")));

        // Highlight sits on the flight's own label, not the parent's.
        let flight_label = layout.flight_entry("ABC123_2").unwrap();
        assert_eq!(selection.highlight(), Some((flight_label.x, flight_label.y)));
        let parent = layout.aircraft_at(0).unwrap();
        assert_ne!(selection.highlight(), Some((parent.x, parent.y)));
    }

    #[test]
    fn test_step_clamps_at_both_ends() {
        let (_, layout) = fixture();
        let mut selection = Selection::default();
        selection.apply_pick(&PickTarget::Aircraft("ABC123".to_string()), &layout);

        assert!(!selection.step(StepDirection::Previous, &layout));
        assert_eq!(selection.index(), Some(0));

        assert!(selection.step(StepDirection::Next, &layout));
        assert_eq!(selection.index(), Some(1));
        assert_eq!(selection.icao(), Some("DEF456"));

        assert!(selection.step(StepDirection::Next, &layout));
        assert!(!selection.step(StepDirection::Next, &layout));
        assert_eq!(selection.index(), Some(2));
        assert_eq!(selection.icao(), Some("GHI789"));
    }

    #[test]
    fn test_step_noop_before_first_selection() {
        let (_, layout) = fixture();
        let mut selection = Selection::default();
        assert!(!selection.step(StepDirection::Next, &layout));
        assert!(!selection.step(StepDirection::Previous, &layout));
        assert!(!selection.is_active());
        assert_eq!(selection.track_key(), None);
    }

    #[test]
    fn test_step_clears_flight_selection() {
        let (_, layout) = fixture();
        let mut selection = Selection::default();
        selection.apply_pick(
            &PickTarget::Flight {
                id: "ABC123_2".to_string(),
                owner: "ABC123".to_string(),
            },
            &layout,
        );
        assert!(selection.step(StepDirection::Next, &layout));
        assert_eq!(selection.flight(), None);
        assert_eq!(selection.track_key(), Some(TrackKey::Aircraft("DEF456")));
    }

    #[test]
    fn test_submit_known_id() {
        let (table, layout) = fixture();
        let mut selection = Selection::default();
        selection.apply_submit("ABC123", &layout);

        assert_eq!(selection.index(), Some(0));
        let label = layout.aircraft_at(0).unwrap();
        assert_eq!(selection.highlight(), Some((label.x, label.y)));

        // The worked example: the selected subset is the aircraft's rows.
        let track = table.track("ABC123").unwrap();
        assert_eq!(track.len(), 2);
        let path: Vec<(f64, f64)> = track.positions().collect();
        assert_eq!(path, vec![(4.7, 52.3), (4.9, 52.5)]);
        let points = track.feature_points("alt").unwrap();
        assert_eq!(points, vec![[0.0, 1000.0], [100.0, 3000.0]]);
    }

    #[test]
    fn test_submit_unknown_id_updates_state_then_lookup_fails() {
        let (table, layout) = fixture();
        let mut selection = Selection::default();
        selection.apply_submit("ZZZ999", &layout);

        // State is updated without validation.
        assert_eq!(selection.icao(), Some("ZZZ999"));
        assert_eq!(selection.index(), None);
        assert_eq!(selection.highlight(), None);

        // The downstream lookup is where the failure surfaces.
        match selection.track_key() {
            Some(TrackKey::Aircraft(id)) => assert!(table.track(id).is_err()),
            other => panic!("unexpected key: {other:?}"),
        }

        // Stepping from an index that never existed stays a no-op.
        assert!(!selection.step(StepDirection::Next, &layout));
    }
}
