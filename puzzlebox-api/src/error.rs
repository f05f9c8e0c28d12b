//! API error responses.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use puzzlebox_core::hanoi::MoveRejected;
use puzzlebox_core::lights::PressRejected;
use puzzlebox_core::sliding::SlideRejected;
use puzzlebox_core::ConfigError;

#[derive(Serialize)]
pub struct ErrorModel {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Move(#[from] MoveRejected),
    #[error(transparent)]
    Press(#[from] PressRejected),
    #[error(transparent)]
    Slide(#[from] SlideRejected),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("game state is unavailable")]
    Poisoned,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Move(MoveRejected::Busy | MoveRejected::AlreadySolved)
            | ApiError::Press(PressRejected::AlreadySolved)
            | ApiError::Slide(SlideRejected::AlreadySolved) => StatusCode::CONFLICT,
            ApiError::Move(_) | ApiError::Press(_) | ApiError::Slide(_) | ApiError::Config(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorModel {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
