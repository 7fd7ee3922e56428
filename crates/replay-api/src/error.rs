//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playback::ExportError;
use scenario_loader::LoadError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No data for scenario {0}")]
    NoData(String),
    #[error("Frame {frame_id} not found in scenario {scenario_id}")]
    FrameNotFound { scenario_id: String, frame_id: i64 },
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("Worker task failed: {0}")]
    Task(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoData(_) | ApiError::FrameNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Load(LoadError::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Load(_) | ApiError::Export(_) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
