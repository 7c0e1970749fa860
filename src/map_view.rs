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

//! Ground-track map over a fixed geographic window.
//!
//! The window is a constant regional bounding box from configuration, never
//! derived from the data: longitude maps linearly, latitude through the
//! Mercator function, both normalised to the window. Each frame draws the
//! boundary overlay and then the selected track as a connected path.

use crate::app::ResolvedTrack;
use crate::basemap::Basemap;

/// Boundary overlay color, matching a faint ink-on-paper chart.
const BOUNDARY_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(82, 76, 80, 60);
const TRACK_COLOR: egui::Color32 = egui::Color32::from_rgb(70, 130, 240);
const SEA_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 220, 240);

/// Fixed geographic window, degrees.
#[derive(Debug, Clone, Copy)]
pub struct MapWindow {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapWindow {
    /// Project (lon, lat) into a screen rectangle: linear in longitude,
    /// Mercator in latitude. Points outside the window project outside the
    /// rectangle and are clipped by the painter.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64, rect: egui::Rect) -> egui::Pos2 {
        let x = (lon - self.lon_min) / (self.lon_max - self.lon_min);
        let top = mercator_y(self.lat_max);
        let bottom = mercator_y(self.lat_min);
        let y = (mercator_y(lat) - top) / (bottom - top);
        egui::pos2(
            rect.left() + x as f32 * rect.width(),
            rect.top() + y as f32 * rect.height(),
        )
    }
}

/// Convert latitude to a Mercator Y coordinate (0.0 to 1.0, north up).
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
}

/// The map view region.
#[derive(Debug)]
pub struct MapView {
    window: MapWindow,
}

impl MapView {
    #[must_use]
    pub fn new(window: MapWindow) -> Self {
        Self { window }
    }

    /// Redraw the map: background, boundary overlay, then the selected
    /// track. A pending redraw error renders as a bubble at the top.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        basemap: &Basemap,
        track: Option<&ResolvedTrack>,
        error: Option<&str>,
    ) {
        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), ui.available_height()),
            egui::Sense::hover(),
        );
        let rect = response.rect;
        let painter = painter.with_clip_rect(rect);

        painter.rect_filled(rect, 0.0, SEA_COLOR);

        for line in basemap.polylines() {
            self.draw_path(&painter, rect, line.iter().copied(), 1.0, BOUNDARY_COLOR);
        }

        if let Some(track) = track {
            self.draw_path(
                &painter,
                rect,
                track.path.iter().copied(),
                2.0,
                TRACK_COLOR,
            );

            // Mark the first and last fix so direction of travel is clear.
            if let Some(&(lon, lat)) = track.path.first() {
                let pos = self.window.project(lon, lat, rect);
                painter.circle_stroke(pos, 4.0, egui::Stroke::new(1.5, TRACK_COLOR));
            }
            if let Some(&(lon, lat)) = track.path.last() {
                let pos = self.window.project(lon, lat, rect);
                painter.circle_filled(pos, 4.0, TRACK_COLOR);
            }

            painter.text(
                rect.left_top() + egui::vec2(10.0, 10.0),
                egui::Align2::LEFT_TOP,
                &track.id,
                egui::FontId::monospace(12.0),
                egui::Color32::from_rgb(60, 60, 60),
            );
        }

        if let Some(message) = error {
            Self::draw_error_bubble(&painter, rect, message);
        }
    }

    fn draw_path(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        points: impl Iterator<Item = (f64, f64)>,
        width: f32,
        color: egui::Color32,
    ) {
        let mut previous: Option<egui::Pos2> = None;
        for (lon, lat) in points {
            let pos = self.window.project(lon, lat, rect);
            if let Some(last) = previous {
                painter.line_segment([last, pos], egui::Stroke::new(width, color));
            }
            previous = Some(pos);
        }
    }

    fn draw_error_bubble(painter: &egui::Painter, rect: egui::Rect, message: &str) {
        let pos = rect.center_top() + egui::vec2(0.0, 24.0);
        let galley = painter.layout_no_wrap(
            message.to_string(),
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
        let padding = egui::vec2(12.0, 6.0);
        let bubble = egui::Rect::from_center_size(pos, galley.size() + padding * 2.0);
        painter.rect_filled(bubble, 5.0, egui::Color32::from_rgb(220, 50, 50));
        painter.text(
            pos,
            egui::Align2::CENTER_CENTER,
            message,
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> MapWindow {
        MapWindow {
            lon_min: 3.2,
            lon_max: 5.8,
            lat_min: 51.0,
            lat_max: 54.0,
        }
    }

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 200.0))
    }

    #[test]
    fn test_window_corners_project_to_rect_corners() {
        let window = window();
        let rect = rect();

        let nw = window.project(3.2, 54.0, rect);
        assert!((nw.x - 0.0).abs() < 1e-3);
        assert!((nw.y - 0.0).abs() < 1e-3);

        let se = window.project(5.8, 51.0, rect);
        assert!((se.x - 100.0).abs() < 1e-3);
        assert!((se.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_longitude_is_linear() {
        let window = window();
        let mid = window.project(4.5, 52.0, rect());
        assert!((mid.x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_latitude_increases_downward() {
        let window = window();
        let rect = rect();
        let north = window.project(4.5, 53.5, rect);
        let south = window.project(4.5, 51.5, rect);
        assert!(north.y < south.y);
    }

    #[test]
    fn test_out_of_window_points_project_outside() {
        let window = window();
        let rect = rect();
        let west = window.project(2.0, 52.0, rect);
        assert!(west.x < 0.0);
        let north = window.project(4.5, 55.0, rect);
        assert!(north.y < 0.0);
    }
}
