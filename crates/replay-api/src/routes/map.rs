//! Map Routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use motion_log::MapFeatureType;
use playback::{map_polylines, MapPolyline};
use serde::{Deserialize, Serialize};

use crate::{load_with_data, ApiError, SharedState};

/// Query parameters for the map endpoint
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    /// Comma-separated feature types, e.g. `ROAD_EDGE,ROAD_LINE`
    #[serde(rename = "type")]
    pub feature_type: Option<String>,
}

impl MapQuery {
    fn layers(&self) -> Option<Vec<MapFeatureType>> {
        self.feature_type.as_deref().map(|types| {
            types
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(MapFeatureType::parse)
                .collect()
        })
    }
}

/// Response for the map endpoint
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub data: Vec<MapPolyline>,
    pub count: usize,
}

/// Get a scenario's map features as polylines
pub async fn get_map(
    State(state): State<SharedState>,
    Path(scenario_id): Path<String>,
    Query(params): Query<MapQuery>,
) -> Result<Json<MapResponse>, ApiError> {
    let bundle = load_with_data(&state, &scenario_id).await?;
    let layers = params.layers();
    let data = map_polylines(&bundle.map, layers.as_deref());

    Ok(Json(MapResponse {
        count: data.len(),
        data,
    }))
}
