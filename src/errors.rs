use crate::models::{PlanParseError, ShopActionError};
use crate::store::{GoalError, RegistrationError};
use axum::http::StatusCode;
use tracing::{error, warn};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::internal(err)
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PlanParseError> for AppError {
    fn from(err: PlanParseError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ShopActionError> for AppError {
    fn from(err: ShopActionError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "request failed: {}", self.message);
        } else {
            warn!(status = %self.status, "request rejected: {}", self.message);
        }
        (self.status, self.message).into_response()
    }
}
