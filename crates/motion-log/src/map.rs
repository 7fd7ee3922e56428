//! HD-map feature points

use serde::{Deserialize, Serialize};

/// Map feature category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapFeatureType {
    RoadEdge,
    RoadLine,
    LaneLine,
    LaneCenter,
    Crosswalk,
    StopSign,
    SpeedBump,
    #[default]
    Unknown,
}

impl MapFeatureType {
    /// Parse a type label; anything unrecognised is `Unknown`
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "ROAD_EDGE" => MapFeatureType::RoadEdge,
            "ROAD_LINE" => MapFeatureType::RoadLine,
            "LANE_LINE" => MapFeatureType::LaneLine,
            "LANE_CENTER" => MapFeatureType::LaneCenter,
            "CROSSWALK" => MapFeatureType::Crosswalk,
            "STOP_SIGN" => MapFeatureType::StopSign,
            "SPEED_BUMP" => MapFeatureType::SpeedBump,
            _ => MapFeatureType::Unknown,
        }
    }

    /// Get the canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            MapFeatureType::RoadEdge => "ROAD_EDGE",
            MapFeatureType::RoadLine => "ROAD_LINE",
            MapFeatureType::LaneLine => "LANE_LINE",
            MapFeatureType::LaneCenter => "LANE_CENTER",
            MapFeatureType::Crosswalk => "CROSSWALK",
            MapFeatureType::StopSign => "STOP_SIGN",
            MapFeatureType::SpeedBump => "SPEED_BUMP",
            MapFeatureType::Unknown => "UNKNOWN",
        }
    }

    /// Whether the feature is a closed area rather than an open line
    pub fn is_polygon(&self) -> bool {
        matches!(self, MapFeatureType::Crosswalk | MapFeatureType::SpeedBump)
    }
}

/// One vertex of a map polyline or polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub scenario_id: String,

    /// Feature the vertex belongs to (`feature_id` or `line_id` column)
    pub feature_id: String,

    #[serde(rename = "type")]
    pub feature_type: MapFeatureType,

    pub x: f64,
    pub y: f64,

    /// Position of the vertex within its feature
    pub order: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(MapFeatureType::parse("ROAD_EDGE"), MapFeatureType::RoadEdge);
        assert_eq!(MapFeatureType::parse("lane_center"), MapFeatureType::LaneCenter);
        assert_eq!(MapFeatureType::parse(" STOP_SIGN "), MapFeatureType::StopSign);
    }

    #[test]
    fn test_parse_unknown_label() {
        assert_eq!(MapFeatureType::parse("DRIVEWAY"), MapFeatureType::Unknown);
        assert_eq!(MapFeatureType::parse(""), MapFeatureType::Unknown);
    }
}
