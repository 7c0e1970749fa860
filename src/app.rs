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

//! The browser application: one owned context struct, one event loop.
//!
//! Every handler (pick, submit, key press, view-range change) runs to
//! completion on the egui update thread and ends in a redraw. Selection
//! changes funnel through a single resolve step; a failed lookup logs a
//! warning, raises the error bubble, and leaves the previously resolved
//! track on screen.

use log::warn;

use trajectory_data::layout::LabelLayout;
use trajectory_data::selection::{PickTarget, Selection, StepDirection, TrackKey};
use trajectory_data::table::{TableError, TrajectoryTable};

use crate::basemap::Basemap;
use crate::config::BrowserConfig;
use crate::feature_view::FeatureView;
use crate::label_panel::{LabelPanel, PanelEvent};
use crate::map_view::{MapView, MapWindow};

/// The selected row subset, resolved once per selection change and redrawn
/// every frame until replaced.
#[derive(Debug, Clone)]
pub struct ResolvedTrack {
    /// Display identifier (flight id for flight picks, ICAO otherwise).
    pub id: String,
    /// (lon, lat) ground-track vertices in row order.
    pub path: Vec<(f64, f64)>,
    /// (timestamp, value) points for the feature chart.
    pub feature_points: Vec<[f64; 2]>,
}

pub struct BrowserApp {
    table: TrajectoryTable,
    layout: LabelLayout,
    selection: Selection,
    label_panel: LabelPanel,
    map_view: MapView,
    feature_view: FeatureView,
    basemap: Basemap,
    feature: String,
    flight_labels: bool,
    list_panel_width: f32,
    chart_height: f32,
    resolved: Option<ResolvedTrack>,
    redraw_error: Option<String>,
}

impl std::fmt::Debug for BrowserApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserApp")
            .field("aircraft_count", &self.table.aircraft_count())
            .field("feature", &self.feature)
            .field("flight_labels", &self.flight_labels)
            .finish_non_exhaustive()
    }
}

impl BrowserApp {
    #[must_use]
    pub fn new(
        table: TrajectoryTable,
        feature: String,
        config: &BrowserConfig,
        basemap: Basemap,
    ) -> Self {
        let layout = LabelLayout::new(&table, config.flight_labels);
        let window = MapWindow {
            lon_min: config.map_lon_min,
            lon_max: config.map_lon_max,
            lat_min: config.map_lat_min,
            lat_max: config.map_lat_max,
        };
        Self {
            table,
            layout,
            selection: Selection::default(),
            label_panel: LabelPanel::new(),
            map_view: MapView::new(window),
            feature_view: FeatureView::new(feature.clone()),
            basemap,
            feature,
            flight_labels: config.flight_labels,
            list_panel_width: config.list_panel_width,
            chart_height: config.chart_height,
            resolved: None,
            redraw_error: None,
        }
    }

    /// Apply a pick event and re-resolve the drawn track.
    pub fn select(&mut self, target: &PickTarget) {
        self.selection.apply_pick(target, &self.layout);
        self.refresh_track();
    }

    /// Apply a text submit. Deliberately unvalidated: an unknown identifier
    /// updates the selection and surfaces as a lookup failure below.
    pub fn submit(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.selection.apply_submit(text, &self.layout);
        self.refresh_track();
    }

    /// Step the selection through the label sequence.
    pub fn step(&mut self, direction: StepDirection) {
        if self.selection.step(direction, &self.layout) {
            self.refresh_track();
        }
    }

    /// The currently drawn track, if any selection has resolved yet.
    #[must_use]
    pub fn resolved_track(&self) -> Option<&ResolvedTrack> {
        self.resolved.as_ref()
    }

    /// The pending redraw error, if the last selection failed to resolve.
    #[must_use]
    pub fn redraw_error(&self) -> Option<&str> {
        self.redraw_error.as_deref()
    }

    /// Resolve the selected row subset once. On failure the previous track
    /// stays on screen (the redraw is left stale) and the error is shown
    /// until a later selection succeeds.
    fn refresh_track(&mut self) {
        let Some(key) = self.selection.track_key() else {
            return;
        };
        match self.resolve(key) {
            Ok(track) => {
                self.resolved = Some(track);
                self.redraw_error = None;
            }
            Err(e) => {
                warn!("selection failed to resolve: {}", e);
                self.redraw_error = Some(e.to_string());
            }
        }
    }

    fn resolve(&self, key: TrackKey<'_>) -> Result<ResolvedTrack, TableError> {
        let (id, view) = match key {
            TrackKey::Aircraft(icao) => (icao, self.table.track(icao)?),
            TrackKey::Flight(flight) => (flight, self.table.flight(flight)?),
        };
        Ok(ResolvedTrack {
            id: id.to_string(),
            path: view.positions().collect(),
            feature_points: view.feature_points(&self.feature)?,
        })
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let direction = ctx.input(|i| {
            if i.key_pressed(egui::Key::N) {
                Some(StepDirection::Next)
            } else if i.key_pressed(egui::Key::P) {
                Some(StepDirection::Previous)
            } else {
                None
            }
        });
        if let Some(direction) = direction {
            self.step(direction);
        }
    }
}

impl eframe::App for BrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::SidePanel::left("track_list")
            .resizable(true)
            .default_width(self.list_panel_width)
            .show(ctx, |ui| {
                let event =
                    self.label_panel
                        .show(ui, &mut self.layout, &self.selection, self.flight_labels);
                match event {
                    Some(PanelEvent::Picked(target)) => self.select(&target),
                    Some(PanelEvent::Submitted(text)) => self.submit(&text),
                    None => {}
                }
            });

        egui::TopBottomPanel::bottom("feature_chart")
            .resizable(true)
            .default_height(self.chart_height)
            .show(ctx, |ui| {
                self.feature_view.show(ui, self.resolved_track());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_view.show(
                ui,
                &self.basemap,
                self.resolved_track(),
                self.redraw_error(),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_data::table::TrackSample;

    fn app() -> BrowserApp {
        let mut builder = TrajectoryTable::builder(vec!["alt".to_string()]);
        for (icao, flight, ts, lon, lat, alt) in [
            ("ABC123", "ABC123_1", 0.0, 4.7, 52.3, 1000.0),
            ("ABC123", "ABC123_1", 10.0, 4.8, 52.4, 2000.0),
            ("DEF456", "DEF456_1", 5.0, 4.1, 51.9, 500.0),
            ("DEF456", "DEF456_1", 15.0, 4.2, 52.0, 900.0),
        ] {
            let sample = TrackSample { ts, lon, lat };
            builder.push(icao, flight, sample, &[alt]).unwrap();
        }
        let config = BrowserConfig {
            flight_labels: true,
            ..BrowserConfig::default()
        };
        BrowserApp::new(
            builder.build(),
            "alt".to_string(),
            &config,
            Basemap::builtin(),
        )
    }

    #[test]
    fn test_submit_resolves_the_worked_example() {
        let mut app = app();
        app.submit("ABC123");

        let track = app.resolved_track().unwrap();
        assert_eq!(track.id, "ABC123");
        assert_eq!(track.path, vec![(4.7, 52.3), (4.8, 52.4)]);
        assert_eq!(track.feature_points, vec![[0.0, 1000.0], [10.0, 2000.0]]);
        assert!(app.redraw_error().is_none());
    }

    #[test]
    fn test_failed_submit_leaves_redraw_stale() {
        let mut app = app();
        app.submit("ABC123");
        app.submit("ZZZ999");

        // The error is surfaced, the previous track stays on screen.
        assert!(app.redraw_error().unwrap().contains("ZZZ999"));
        assert_eq!(app.resolved_track().unwrap().id, "ABC123");

        // A later good selection clears the error.
        app.select(&PickTarget::Aircraft("DEF456".to_string()));
        assert!(app.redraw_error().is_none());
        assert_eq!(app.resolved_track().unwrap().id, "DEF456");
    }

    #[test]
    fn test_flight_pick_draws_the_flight_subset() {
        let mut app = app();
        app.select(&PickTarget::Flight {
            id: "DEF456_1".to_string(),
            owner: "DEF456".to_string(),
        });
        let track = app.resolved_track().unwrap();
        assert_eq!(track.id, "DEF456_1");
        assert_eq!(track.path.len(), 2);
    }

    #[test]
    fn test_step_before_selection_is_a_noop() {
        let mut app = app();
        app.step(StepDirection::Next);
        assert!(app.resolved_track().is_none());
        assert!(app.redraw_error().is_none());
    }

    #[test]
    fn test_step_advances_and_clamps() {
        let mut app = app();
        app.submit("ABC123");
        app.step(StepDirection::Next);
        assert_eq!(app.resolved_track().unwrap().id, "DEF456");
        app.step(StepDirection::Next);
        assert_eq!(app.resolved_track().unwrap().id, "DEF456");
        app.step(StepDirection::Previous);
        assert_eq!(app.resolved_track().unwrap().id, "ABC123");
    }
}
