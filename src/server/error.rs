use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// Failure taxonomy shared by every handler. Each endpoint maps its own
// failures onto exactly one of these at the boundary; the carried cause is
// logged, never rendered.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(anyhow::Error),
    NotFound(anyhow::Error),
    MethodNotAllowed(anyhow::Error),
    Unprocessable(anyhow::Error),
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    status: u16,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::NotFound(_) => "resource not found",
            ApiError::MethodNotAllowed(_) => "method not allowed",
            ApiError::Unprocessable(_) => "unprocessable request",
            ApiError::Internal(_) => "internal server error",
        }
    }

    fn cause(&self) -> &anyhow::Error {
        match self {
            ApiError::BadRequest(err)
            | ApiError::NotFound(err)
            | ApiError::MethodNotAllowed(err)
            | ApiError::Unprocessable(err)
            | ApiError::Internal(err) => err,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("request failed with {status}: {:#}", self.cause());
        let body = ErrorBody {
            success: false,
            error: self.description(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
