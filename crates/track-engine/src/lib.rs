//! Track Engine
//!
//! Turns raw scenario rows into indexed, speed-annotated frames and
//! partitions tracks into static vehicles, moving vehicles and vulnerable
//! road users.

mod classifier;
mod frame_index;
mod kinematics;
mod stats;

pub use classifier::{
    Classification, ClassifierConfig, TrackAggregate, TrackCategory, TrackClassifier,
};
pub use frame_index::{assign_frame_ids, derive_frame_ids, distinct_frame_ids};
pub use kinematics::{annotate_speeds, fill_missing_velocity, speed_kmh, MPS_TO_KMH};
pub use stats::SceneStats;

use motion_log::TrackPoint;
use serde::{Deserialize, Serialize};

/// A track point after frame indexing and speed derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    /// Source row
    pub point: TrackPoint,
    /// Dense per-scenario frame index
    pub frame_id: i64,
    /// Scalar speed (km/h), 0 when velocity is unknown
    pub speed_kmh: f64,
}

impl TrackFrame {
    pub fn new(point: TrackPoint, frame_id: i64, speed_kmh: f64) -> Self {
        Self {
            point,
            frame_id,
            speed_kmh,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.point.track_id
    }

    pub fn object_type(&self) -> &str {
        &self.point.object_type
    }
}
