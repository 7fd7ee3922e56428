//! Loaded scenario artifacts

use motion_log::{MapTable, OptionalColumns};
use track_engine::{Classification, TrackFrame};

/// Everything rendering needs for one scenario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioBundle {
    pub scenario_id: String,
    /// False when the trajectory source does not exist
    pub has_data: bool,
    /// All rows of the scenario, stably ordered by frame id
    pub frames: Vec<TrackFrame>,
    /// Optional trajectory columns present in the source
    pub columns: OptionalColumns,
    /// Map features of the scenario (possibly empty)
    pub map: MapTable,
    pub classification: Classification,
}

impl ScenarioBundle {
    /// Sentinel returned when the trajectory source is absent
    pub fn no_data(scenario_id: &str) -> Self {
        Self {
            scenario_id: scenario_id.to_string(),
            ..Default::default()
        }
    }

    pub fn static_actors(&self) -> &[TrackFrame] {
        &self.classification.static_actors
    }

    pub fn moving_vehicles(&self) -> &[TrackFrame] {
        &self.classification.moving_vehicles
    }

    pub fn vrus(&self) -> &[TrackFrame] {
        &self.classification.vrus
    }

    /// No rows for this scenario (unknown id or no data)
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
