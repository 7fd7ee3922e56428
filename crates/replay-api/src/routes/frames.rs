//! Frame Routes

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use playback::{ActorBox, FrameView, Timeline};
use serde::{Deserialize, Serialize};

use crate::{load_with_data, ApiError, SharedState};

/// Query parameters for the frames endpoint
#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// Return a single frame instead of the whole timeline
    pub frame: Option<i64>,
}

/// Everything needed to draw one frame
#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub scenario_id: String,
    pub static_boxes: Vec<ActorBox>,
    pub frame: FrameView,
}

/// Get the playback timeline, or one frame of it
pub async fn get_frames(
    State(state): State<SharedState>,
    Path(scenario_id): Path<String>,
    Query(params): Query<FrameQuery>,
) -> Result<Response, ApiError> {
    let bundle = load_with_data(&state, &scenario_id).await?;
    let geometry = state.read().await.settings.geometry;
    let timeline = Timeline::build(&bundle, &geometry);

    let Some(frame_id) = params.frame else {
        return Ok(Json(timeline).into_response());
    };

    let frame = timeline
        .frame(frame_id)
        .cloned()
        .ok_or_else(|| ApiError::FrameNotFound {
            scenario_id: scenario_id.clone(),
            frame_id,
        })?;

    Ok(Json(FrameSnapshot {
        scenario_id,
        static_boxes: timeline.static_boxes,
        frame,
    })
    .into_response())
}
