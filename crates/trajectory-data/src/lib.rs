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

//! Trajectory browser core: dataset access, label layout, selection state.
//!
//! This library holds everything the browser does that is not drawing, so it
//! all runs and tests without a window system. Three layers that can be used
//! independently or composed together:
//!
//! - **Table layer**: the immutable trajectory table, keyed by aircraft and
//!   flight, with CSV ingestion
//! - **Layout layer**: label panel positions and visibility culling
//! - **Selection layer**: pick/submit/step handling and the state the views
//!   redraw from
//!
//! # Quick Start
//!
//! ```
//! use trajectory_data::layout::LabelLayout;
//! use trajectory_data::selection::{PickTarget, Selection};
//! use trajectory_data::table::{TrackSample, TrajectoryTable};
//!
//! let mut builder = TrajectoryTable::builder(vec!["alt".to_string()]);
//! let sample = TrackSample { ts: 0.0, lon: 4.7, lat: 52.3 };
//! builder.push("ABC123", "ABC123_1", sample, &[1000.0]).unwrap();
//! let table = builder.build();
//!
//! let layout = LabelLayout::new(&table, false);
//! let mut selection = Selection::default();
//! let target = PickTarget::resolve("ABC123", &table).unwrap();
//! selection.apply_pick(&target, &layout);
//!
//! assert_eq!(selection.icao(), Some("ABC123"));
//! assert_eq!(selection.index(), Some(0));
//! ```
//!
//! # Loading From CSV
//!
//! ```
//! use trajectory_data::table::read_table;
//!
//! let data = "icao,flight,ts,lon,lat,alt\nABC123,ABC123_1,0,4.7,52.3,1000\n";
//! let table = read_table(data.as_bytes()).unwrap();
//! assert_eq!(table.aircraft_count(), 1);
//! ```

pub mod layout;
pub mod selection;
pub mod table;

pub use layout::{AircraftLabel, FlightLabel, LabelLayout, CULL_MARGIN, LABEL_COLUMN_X};
pub use selection::{PickTarget, Selection, StepDirection, TrackKey};
pub use table::{
    load_csv, read_table, LoadError, TableBuilder, TableError, TrackSample, TrackView,
    TrajectoryTable,
};
