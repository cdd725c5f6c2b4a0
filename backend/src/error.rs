use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use shared::constants::{UNKNOWN_ITEM_ERROR, UNKNOWN_MODE_ERROR};
use shared::notify::{ErrorResponse, NotifyError};

#[derive(Debug)]
pub enum AppError {
    Notify(NotifyError),
    UnknownMode,
    UnknownItem,
    InvalidRequest(String),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::Notify(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Notify(NotifyError::Disabled) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Notify(NotifyError::InvalidCode) => StatusCode::UNAUTHORIZED,
            AppError::Notify(NotifyError::Transport(_)) => StatusCode::BAD_GATEWAY,
            AppError::UnknownMode | AppError::UnknownItem | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Notify(e) => e.to_string(),
            AppError::UnknownMode => UNKNOWN_MODE_ERROR.to_string(),
            AppError::UnknownItem => UNKNOWN_ITEM_ERROR.to_string(),
            AppError::InvalidRequest(message) => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.message() };
        (self.status(), Json(body)).into_response()
    }
}
