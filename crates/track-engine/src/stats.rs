//! Scene-level summary statistics

use crate::{distinct_frame_ids, Classification, TrackFrame};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Summary of one scenario for the statistics panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Distinct frames in the scenario
    pub frame_count: usize,
    /// Nominal duration (frames × frame interval), seconds
    pub duration_s: f64,
    /// Highest speed of any actor in any frame (km/h)
    pub max_speed_kmh: f64,
    /// Spatial extent of all track points (meters)
    pub extent_x_m: f64,
    pub extent_y_m: f64,
    /// Distinct tracks
    pub total_actors: usize,
    pub moving_vehicles: usize,
    pub static_vehicles: usize,
    pub pedestrians: usize,
    pub cyclists: usize,
    /// Map vertices in the scenario
    pub map_features: usize,
}

fn distinct_tracks<'a, I>(frames: I) -> usize
where
    I: IntoIterator<Item = &'a TrackFrame>,
{
    frames
        .into_iter()
        .map(|f| f.track_id())
        .collect::<HashSet<_>>()
        .len()
}

fn extent<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (min, max) = values
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min <= max {
        max - min
    } else {
        0.0
    }
}

impl SceneStats {
    /// Compute statistics for a classified scenario
    pub fn compute(
        frames: &[TrackFrame],
        classification: &Classification,
        map_features: usize,
        frame_interval_s: f64,
    ) -> Self {
        let frame_count = distinct_frame_ids(frames).len();
        let max_speed_kmh = frames
            .iter()
            .map(|f| f.speed_kmh)
            .fold(0.0_f64, f64::max);

        let vrus_of = |needle: &str| {
            distinct_tracks(
                classification
                    .vrus
                    .iter()
                    .filter(|f| f.object_type().contains(needle)),
            )
        };

        Self {
            frame_count,
            duration_s: frame_count as f64 * frame_interval_s,
            max_speed_kmh,
            extent_x_m: extent(frames.iter().map(|f| f.point.x)),
            extent_y_m: extent(frames.iter().map(|f| f.point.y)),
            total_actors: distinct_tracks(frames),
            moving_vehicles: distinct_tracks(&classification.moving_vehicles),
            static_vehicles: classification.static_actors.len(),
            pedestrians: vrus_of("PEDESTRIAN"),
            cyclists: vrus_of("CYCLIST"),
            map_features,
        }
    }
}
