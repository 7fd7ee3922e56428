//! Scenario Routes

use axum::{
    extract::{Path, State},
    Json,
};
use playback::scene_stats;
use serde::Serialize;
use track_engine::SceneStats;

use crate::{load_with_data, ApiError, SharedState};

/// Response for the scenario list endpoint
#[derive(Debug, Serialize)]
pub struct ScenarioListResponse {
    pub data: Vec<String>,
    pub count: usize,
}

/// Response for the summary endpoint
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub scenario_id: String,
    pub stats: SceneStats,
}

/// List scenario ids in order of first appearance
pub async fn list_scenarios(
    State(state): State<SharedState>,
) -> Result<Json<ScenarioListResponse>, ApiError> {
    let (loader, source) = {
        let state = state.read().await;
        (state.loader.clone(), state.source())
    };

    let data = tokio::task::spawn_blocking(move || loader.list_scenarios(&source))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

    Ok(Json(ScenarioListResponse {
        count: data.len(),
        data,
    }))
}

/// Statistics for one scenario
pub async fn get_summary(
    State(state): State<SharedState>,
    Path(scenario_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let bundle = load_with_data(&state, &scenario_id).await?;
    let playback_cfg = state.read().await.settings.playback;

    Ok(Json(SummaryResponse {
        scenario_id,
        stats: scene_stats(&bundle, &playback_cfg),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{fixture_router, get_json};
    use crate::{create_router, AppState, ReplaySettings};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn test_list_scenarios() {
        let (_dir, app) = fixture_router();
        let (status, json) = get_json(app, "/api/v1/scenarios").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], serde_json::json!(["s1", "s2"]));
        assert_eq!(json["count"], 2);
    }

    #[tokio::test]
    async fn test_list_without_trajectory_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut settings = ReplaySettings::default();
        settings.paths.traj_file = dir.path().join("missing.csv");
        let app = create_router(Arc::new(RwLock::new(AppState::new(settings))));

        let (status, json) = get_json(app, "/api/v1/scenarios").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 0);
    }

    #[tokio::test]
    async fn test_summary() {
        let (_dir, app) = fixture_router();
        let (status, json) = get_json(app, "/api/v1/scenarios/s1/summary").await;
        assert_eq!(status, StatusCode::OK);

        let stats = &json["stats"];
        assert_eq!(stats["frame_count"], 2);
        assert_eq!(stats["total_actors"], 3);
        assert_eq!(stats["moving_vehicles"], 1);
        assert_eq!(stats["static_vehicles"], 1);
        assert_eq!(stats["pedestrians"], 1);
        assert_eq!(stats["cyclists"], 0);
        assert_eq!(stats["max_speed_kmh"], 18.0);
        assert_eq!(stats["map_features"], 3);
    }

    #[tokio::test]
    async fn test_summary_unknown_scenario_is_no_data() {
        let (_dir, app) = fixture_router();
        let (status, json) = get_json(app, "/api/v1/scenarios/zzz/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No data for scenario zzz");
    }
}
