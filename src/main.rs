mod app;
mod basemap;
mod config;
mod feature_view;
mod label_panel;
mod map_view;

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use app::BrowserApp;
use basemap::Basemap;
use config::BrowserConfig;
use trajectory_data::table::load_csv;

/// Interactive browser for flight trajectory datasets.
///
/// Click an ICAO code (or a flight identifier) in the track list to select
/// it; the map shows its ground track and the chart below plots the chosen
/// feature against time. N/P step through the list.
#[derive(Parser, Debug)]
#[command(name = "trajectory-browser", version, about)]
struct Args {
    /// Trajectory dataset (CSV with icao, flight, ts, lon, lat columns)
    data: PathBuf,

    /// Feature column plotted against time
    #[arg(long, default_value = "alt")]
    feature: String,

    /// Show per-flight labels and the identifier entry box
    #[arg(long)]
    flight_labels: bool,

    /// GeoJSON file with country boundaries for the map overlay
    #[arg(long)]
    boundaries: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = BrowserConfig::load().unwrap_or_else(|e| {
        warn!("failed to load configuration, using defaults: {}", e);
        BrowserConfig::default()
    });
    if let Ok(path) = BrowserConfig::get_config_path() {
        info!("configuration: {}", path.display());
    }

    // CLI flags override the stored configuration for this session.
    if args.flight_labels {
        config.flight_labels = true;
    }
    if let Some(path) = &args.boundaries {
        config.boundaries_path = Some(path.display().to_string());
    }

    let table = load_csv(&args.data)?;
    if !table.has_feature(&args.feature) {
        // Kept permissive: the failure surfaces at redraw, not here.
        warn!(
            "feature column '{}' not in the dataset (available: {:?})",
            args.feature,
            table.feature_names()
        );
    }

    let basemap = match &config.boundaries_path {
        Some(path) => Basemap::load_geojson(Path::new(path)).unwrap_or_else(|e| {
            warn!("failed to load boundaries from {}: {}", path, e);
            Basemap::builtin()
        }),
        None => Basemap::builtin(),
    };

    let window_size = [config.window_width, config.window_height];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size)
            .with_title("Trajectory Browser"),
        ..Default::default()
    };

    let app = BrowserApp::new(table, args.feature, &config, basemap);
    eframe::run_native(
        "Trajectory Browser",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )?;
    Ok(())
}
