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

//! The track list: painter-drawn labels, scroll/zoom view range, picking.
//!
//! Labels live in layout coordinates; the panel maps them into its rect
//! through the current vertical view range. Scrolling pans the range and
//! pinch-zoom rescales it about its centre; a range change triggers the
//! layout's cull pass and nothing else. Only visible labels are drawn or
//! hit-tested.

use trajectory_data::layout::LabelLayout;
use trajectory_data::selection::{PickTarget, Selection};

/// Horizontal span of the layout coordinate system mapped across the panel.
const PANEL_X_SPAN: f32 = 0.4;
/// Smallest vertical span the view range may be zoomed down to.
const MIN_VIEW_SPAN: f32 = 0.05;

const HEADER_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);
const DIM_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const AIRCRAFT_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 220, 255);
const FLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 220, 150);
const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(250, 220, 60);

/// Events produced by the panel for the app to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A label was clicked.
    Picked(PickTarget),
    /// Text was submitted through the identifier entry box.
    Submitted(String),
}

/// The label panel region and its view-range state.
#[derive(Debug)]
pub struct LabelPanel {
    view_low: f32,
    view_high: f32,
    input_text: String,
}

impl LabelPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_low: 0.0,
            view_high: 1.0,
            input_text: String::new(),
        }
    }

    /// Draw the panel and return at most one event. `show_input` adds the
    /// identifier entry box (the flight-labels capability).
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        layout: &mut LabelLayout,
        selection: &Selection,
        show_input: bool,
    ) -> Option<PanelEvent> {
        let mut event = None;

        self.draw_header(ui, layout, selection);
        if show_input {
            if let Some(submitted) = self.draw_input(ui) {
                event = Some(PanelEvent::Submitted(submitted));
            }
        }
        ui.add_space(4.0);

        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), ui.available_height()),
            egui::Sense::click(),
        );
        let rect = response.rect;
        let painter = painter.with_clip_rect(rect);

        if response.hovered() {
            self.handle_view_input(ui, rect, layout);
        }

        let span = self.view_high - self.view_low;
        let to_screen = |x: f32, y: f32| {
            egui::pos2(
                rect.left() + x / PANEL_X_SPAN * rect.width(),
                rect.top() + (y - self.view_low) / span * rect.height(),
            )
        };

        // Highlight marker first so the label text stays readable on top.
        if let Some((hx, hy)) = selection.highlight() {
            let pos = to_screen(hx, hy);
            painter.line_segment(
                [pos + egui::vec2(-22.0, 8.0), pos + egui::vec2(22.0, 8.0)],
                egui::Stroke::new(3.0, HIGHLIGHT_COLOR),
            );
        }

        let click = response
            .clicked()
            .then(|| response.interact_pointer_pos())
            .flatten();

        for label in layout.aircraft() {
            if !label.visible {
                continue;
            }
            let drawn = painter.text(
                to_screen(label.x, label.y),
                egui::Align2::CENTER_CENTER,
                &label.icao,
                egui::FontId::monospace(12.0),
                AIRCRAFT_COLOR,
            );
            if click.is_some_and(|pos| drawn.expand(2.0).contains(pos)) {
                event = Some(PanelEvent::Picked(PickTarget::Aircraft(label.icao.clone())));
            }
        }

        for flight in layout.flights() {
            if !flight.visible {
                continue;
            }
            let drawn = painter.text(
                to_screen(flight.x, flight.y),
                egui::Align2::LEFT_CENTER,
                &flight.id,
                egui::FontId::monospace(10.0),
                FLIGHT_COLOR,
            );
            if click.is_some_and(|pos| drawn.expand(2.0).contains(pos)) {
                if let Some(owner) = layout.aircraft_at(flight.owner) {
                    event = Some(PanelEvent::Picked(PickTarget::Flight {
                        id: flight.id.clone(),
                        owner: owner.icao.clone(),
                    }));
                }
            }
        }

        event
    }

    fn draw_header(&self, ui: &mut egui::Ui, layout: &LabelLayout, selection: &Selection) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("◈ TRACK LIST")
                    .color(HEADER_COLOR)
                    .size(14.0)
                    .strong(),
            );
        });
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("TOTAL: {}", layout.len()))
                    .color(DIM_COLOR)
                    .size(10.0)
                    .monospace(),
            );
        });
        let selected = selection
            .flight()
            .or_else(|| selection.icao())
            .unwrap_or("NONE");
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("SELECTED: {selected}"))
                    .color(HIGHLIGHT_COLOR)
                    .size(10.0)
                    .monospace(),
            );
        });
    }

    fn draw_input(&mut self, ui: &mut egui::Ui) -> Option<String> {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.input_text)
                .hint_text("icao or flight id")
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if !submitted {
            return None;
        }
        let text = self.input_text.trim().to_string();
        self.input_text.clear();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Pan on scroll, rescale on pinch-zoom; a change reruns the cull pass.
    fn handle_view_input(&mut self, ui: &egui::Ui, rect: egui::Rect, layout: &mut LabelLayout) {
        let (scroll, zoom) = ui
            .ctx()
            .input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));

        let mut changed = false;
        let span = self.view_high - self.view_low;

        if scroll != 0.0 && rect.height() > 0.0 {
            let delta = -scroll / rect.height() * span;
            self.view_low += delta;
            self.view_high += delta;
            changed = true;
        }

        if (zoom - 1.0).abs() > 0.001 {
            let center = (self.view_low + self.view_high) / 2.0;
            let half = (span / zoom).max(MIN_VIEW_SPAN) / 2.0;
            self.view_low = center - half;
            self.view_high = center + half;
            changed = true;
        }

        if changed {
            let visible = layout.cull(self.view_low, self.view_high);
            log::debug!(
                "view range [{:.2}, {:.2}]: {} labels visible",
                self.view_low,
                self.view_high,
                visible
            );
        }
    }
}

impl Default for LabelPanel {
    fn default() -> Self {
        Self::new()
    }
}
