//! Playback
//!
//! Consumer-facing views of a loaded scenario: per-frame actor outlines
//! with labels, motion trails, map polylines, scene statistics and
//! filtered CSV export. Drawing itself belongs to the consumer.

pub mod export;
pub mod map_layers;
pub mod timeline;

pub use export::{
    export_file_name, frame_options, track_id_options, type_options, write_csv, ExportError,
    ExportFilter,
};
pub use map_layers::{map_polylines, MapPolyline, DEFAULT_LAYERS};
pub use timeline::{ActorBox, FrameView, Timeline, Trail};

use scenario_loader::ScenarioBundle;
use serde::{Deserialize, Serialize};
use track_engine::SceneStats;

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Nominal time between frames (seconds)
    pub frame_interval_s: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_interval_s: 0.1,
        }
    }
}

/// Statistics panel for a loaded scenario
pub fn scene_stats(bundle: &ScenarioBundle, config: &PlaybackConfig) -> SceneStats {
    SceneStats::compute(
        &bundle.frames,
        &bundle.classification,
        bundle.map.len(),
        config.frame_interval_s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_log::{MapFeatureType, MapPoint, MapTable, TrackPoint};
    use track_engine::{TrackClassifier, TrackFrame};

    #[test]
    fn test_scene_stats_for_bundle() {
        let frames: Vec<TrackFrame> = (0..5)
            .map(|i| {
                TrackFrame::new(
                    TrackPoint::new("s1", "1", "TYPE_VEHICLE", i as f64, 0.0, 0.0),
                    i,
                    10.0,
                )
            })
            .collect();
        let classification = TrackClassifier::default().classify(&frames);
        let bundle = ScenarioBundle {
            scenario_id: "s1".to_string(),
            has_data: true,
            frames,
            map: MapTable::new(vec![MapPoint {
                scenario_id: "s1".to_string(),
                feature_id: "1".to_string(),
                feature_type: MapFeatureType::RoadEdge,
                x: 0.0,
                y: 0.0,
                order: 0,
            }]),
            classification,
            ..Default::default()
        };

        let stats = scene_stats(&bundle, &PlaybackConfig::default());
        assert_eq!(stats.frame_count, 5);
        assert!((stats.duration_s - 0.5).abs() < 1e-9);
        assert_eq!(stats.moving_vehicles, 1);
        assert_eq!(stats.map_features, 1);
    }
}
