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

//! Timestamp-vs-feature line chart for the selected track.

use egui_plot::{Line, Plot, PlotPoints};

use crate::app::ResolvedTrack;

/// The feature chart region. The feature column is chosen once at startup
/// and does not change at runtime.
#[derive(Debug)]
pub struct FeatureView {
    feature: String,
}

impl FeatureView {
    #[must_use]
    pub fn new(feature: String) -> Self {
        Self { feature }
    }

    /// Redraw the chart for the selected track. Default axes, no unit
    /// conversion; an empty plot before the first selection.
    pub fn show(&self, ui: &mut egui::Ui, track: Option<&ResolvedTrack>) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(self.feature.to_uppercase())
                    .color(egui::Color32::from_rgb(150, 150, 150))
                    .size(10.0)
                    .monospace(),
            );
        });

        Plot::new("feature_chart").show(ui, |plot_ui| {
            if let Some(track) = track {
                let points = PlotPoints::from(track.feature_points.clone());
                plot_ui.line(Line::new(&self.feature, points));
            }
        });
    }
}
