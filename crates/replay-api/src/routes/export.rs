//! Export Routes

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use playback::{
    export_file_name, frame_options, track_id_options, type_options, write_csv, ExportFilter,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{load_with_data, ApiError, SharedState};

/// Query parameters for the export endpoint; absent means ALL
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub track_id: Option<String>,
    pub frame: Option<i64>,
}

impl From<ExportQuery> for ExportFilter {
    fn from(query: ExportQuery) -> Self {
        Self {
            object_type: query.object_type,
            track_id: query.track_id,
            frame_id: query.frame,
        }
    }
}

/// Query parameters for the export picker lists
#[derive(Debug, Deserialize)]
pub struct ExportOptionsQuery {
    /// Restricts `track_ids` to tracks of this exact type
    #[serde(rename = "type")]
    pub object_type: Option<String>,
}

/// Choices for the export filters
#[derive(Debug, Serialize)]
pub struct ExportOptionsResponse {
    pub types: Vec<String>,
    pub track_ids: Vec<String>,
    pub frames: Vec<i64>,
}

/// Sorted distinct types, track ids and frame ids of a scenario
pub async fn export_options(
    State(state): State<SharedState>,
    Path(scenario_id): Path<String>,
    Query(params): Query<ExportOptionsQuery>,
) -> Result<Json<ExportOptionsResponse>, ApiError> {
    let bundle = load_with_data(&state, &scenario_id).await?;

    Ok(Json(ExportOptionsResponse {
        types: type_options(&bundle.frames),
        track_ids: track_id_options(&bundle.frames, params.object_type.as_deref()),
        frames: frame_options(&bundle.frames),
    }))
}

/// Download the filtered scenario table as CSV
pub async fn export_csv(
    State(state): State<SharedState>,
    Path(scenario_id): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bundle = load_with_data(&state, &scenario_id).await?;
    let filter = ExportFilter::from(params);

    let mut body = Vec::new();
    let rows = write_csv(&mut body, &bundle.frames, &bundle.columns, &filter)?;
    metrics::counter!("scenario_exports_total").increment(1);
    info!("Exported {} rows of scenario {}", rows, scenario_id);

    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&scenario_id));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
