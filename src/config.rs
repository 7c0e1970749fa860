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

//! Application configuration management.
//!
//! Persistent configuration stored as TOML. Holds the fixed map window,
//! the flight-labels capability flag, and panel geometry. CLI flags
//! override these for the session without being written back.

use serde::{Deserialize, Serialize};

const APP_NAME: &str = "trajectory-browser";
const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Configuration schema version for migrations.
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Western edge of the map window, degrees longitude.
    #[serde(default = "default_lon_min")]
    pub map_lon_min: f64,

    /// Eastern edge of the map window, degrees longitude.
    #[serde(default = "default_lon_max")]
    pub map_lon_max: f64,

    /// Southern edge of the map window, degrees latitude.
    #[serde(default = "default_lat_min")]
    pub map_lat_min: f64,

    /// Northern edge of the map window, degrees latitude.
    #[serde(default = "default_lat_max")]
    pub map_lat_max: f64,

    /// Show per-flight labels and the identifier entry box.
    #[serde(default)]
    pub flight_labels: bool,

    /// Track list panel width in pixels.
    #[serde(default = "default_list_panel_width")]
    pub list_panel_width: f32,

    /// Feature chart panel height in pixels.
    #[serde(default = "default_chart_height")]
    pub chart_height: f32,

    /// GeoJSON file with country boundaries for the map overlay.
    #[serde(default)]
    pub boundaries_path: Option<String>,

    /// Initial window width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

// The default window frames the Schiphol approach region; the extent is a
// fixed regional window, never derived from the data.
fn default_lon_min() -> f64 {
    3.2
}

fn default_lon_max() -> f64 {
    5.8
}

fn default_lat_min() -> f64 {
    51.0
}

fn default_lat_max() -> f64 {
    54.0
}

fn default_list_panel_width() -> f32 {
    280.0
}

fn default_chart_height() -> f32 {
    220.0
}

fn default_window_width() -> f32 {
    1400.0
}

fn default_window_height() -> f32 {
    800.0
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            map_lon_min: default_lon_min(),
            map_lon_max: default_lon_max(),
            map_lat_min: default_lat_min(),
            map_lat_max: default_lat_max(),
            flight_labels: false,
            list_panel_width: default_list_panel_width(),
            chart_height: default_chart_height(),
            boundaries_path: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl BrowserConfig {
    /// Load configuration from disk, creating the default on first run.
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk.
    #[allow(dead_code, reason = "saved from a settings pane follow-up")]
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to the user.
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }
}
