//! Map features as drawable polylines

use box_geometry::Point2;
use motion_log::{MapFeatureType, MapPoint, MapTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layers the viewer draws when no filter is given
pub const DEFAULT_LAYERS: [MapFeatureType; 2] =
    [MapFeatureType::RoadEdge, MapFeatureType::RoadLine];

/// Ordered vertices of one map feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPolyline {
    pub feature_id: String,
    pub feature_type: MapFeatureType,
    pub points: Vec<Point2>,
}

impl MapPolyline {
    /// Closed area (crosswalk, speed bump) rather than an open line
    pub fn is_polygon(&self) -> bool {
        self.feature_type.is_polygon()
    }
}

/// Group vertices by feature id, each ordered by `order`.
///
/// With `layers`, only vertices of those types are kept. Features come out
/// sorted by id; the type of a feature is that of its first vertex.
pub fn map_polylines(map: &MapTable, layers: Option<&[MapFeatureType]>) -> Vec<MapPolyline> {
    let mut groups: BTreeMap<&str, Vec<&MapPoint>> = BTreeMap::new();
    for point in &map.points {
        if layers.map_or(true, |l| l.contains(&point.feature_type)) {
            groups.entry(point.feature_id.as_str()).or_default().push(point);
        }
    }

    groups
        .into_iter()
        .map(|(feature_id, mut vertices)| {
            let feature_type = vertices[0].feature_type;
            vertices.sort_by_key(|p| p.order);
            MapPolyline {
                feature_id: feature_id.to_string(),
                feature_type,
                points: vertices.iter().map(|p| Point2::new(p.x, p.y)).collect(),
            }
        })
        .collect()
}
