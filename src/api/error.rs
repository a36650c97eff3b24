use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::DomainError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Io(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Generation(_) | DomainError::ExternalService(_) => {
                StatusCode::BAD_GATEWAY
            }
            DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DomainError::IndexBuild(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(status = %self.status.as_u16(), error = %self.message, "request failed");
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::io("bad pdf"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::validation("empty"), StatusCode::BAD_REQUEST),
            (DomainError::generation("down"), StatusCode::BAD_GATEWAY),
            (DomainError::external("down"), StatusCode::BAD_GATEWAY),
            (DomainError::timeout("slow"), StatusCode::GATEWAY_TIMEOUT),
            (DomainError::index_build("rejected"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
