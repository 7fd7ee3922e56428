//! Track points and object categories

use serde::{Deserialize, Serialize};

/// Object category derived from the free-form `type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Vehicle,
    Pedestrian,
    Cyclist,
    Other,
}

impl ObjectKind {
    /// Categorise a raw type string such as `TYPE_VEHICLE` for footprint
    /// lookup.
    ///
    /// Matching is by substring and ignores case, so `type_pedestrian` is a
    /// pedestrian here. Track classification does not use this; it matches
    /// `VEHICLE` case-sensitively.
    pub fn from_type(object_type: &str) -> Self {
        let upper = object_type.to_ascii_uppercase();
        if upper.contains("PEDESTRIAN") {
            ObjectKind::Pedestrian
        } else if upper.contains("CYCLIST") {
            ObjectKind::Cyclist
        } else if upper.contains("VEHICLE") {
            ObjectKind::Vehicle
        } else {
            ObjectKind::Other
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Vehicle => "vehicle",
            ObjectKind::Pedestrian => "pedestrian",
            ObjectKind::Cyclist => "cyclist",
            ObjectKind::Other => "other",
        }
    }
}

/// One observation of one actor at one timestep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Recorded episode this row belongs to
    pub scenario_id: String,

    /// Actor identifier, unique within the scenario
    pub track_id: String,

    /// Observation time (seconds)
    pub timestamp: Option<f64>,

    /// Pre-computed dense frame index, if the producer supplied one
    pub frame_id: Option<i64>,

    /// Raw object type, e.g. `TYPE_VEHICLE`
    #[serde(rename = "type")]
    pub object_type: String,

    /// Global position (meters)
    pub x: f64,
    pub y: f64,

    /// Forward-axis orientation (radians)
    pub heading: f64,

    /// Velocity components (m/s)
    pub vx: Option<f64>,
    pub vy: Option<f64>,

    /// Extents (meters)
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,

    /// Whether this actor is the recording vehicle
    pub is_ego: Option<bool>,
}

impl TrackPoint {
    /// Create a point with only the required columns populated
    pub fn new(
        scenario_id: impl Into<String>,
        track_id: impl Into<String>,
        object_type: impl Into<String>,
        x: f64,
        y: f64,
        heading: f64,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            track_id: track_id.into(),
            timestamp: None,
            frame_id: None,
            object_type: object_type.into(),
            x,
            y,
            heading,
            vx: None,
            vy: None,
            length: None,
            width: None,
            height: None,
            is_ego: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_frame_id(mut self, frame_id: i64) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = Some(vx);
        self.vy = Some(vy);
        self
    }

    pub fn with_extent(mut self, length: f64, width: f64) -> Self {
        self.length = Some(length);
        self.width = Some(width);
        self
    }

    /// Category of this point's type string
    pub fn kind(&self) -> ObjectKind {
        ObjectKind::from_type(&self.object_type)
    }
}
