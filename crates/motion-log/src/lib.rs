//! Motion Log Schema
//!
//! Canonical row types for autonomous-driving motion logs and readers that
//! load them from flat CSV tables:
//! - Track points (one row per observed actor per timestep)
//! - Map feature points (one row per polyline/polygon vertex)
//!
//! Optional columns may be absent from a file; the readers record which
//! ones were present so downstream stages can derive or default them.

mod error;
mod map;
mod reader;
mod table;
mod track;

pub use error::SchemaError;
pub use map::{MapFeatureType, MapPoint};
pub use table::{MapTable, OptionalColumns, TrajectoryTable};
pub use track::{ObjectKind, TrackPoint};
