use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::service::{Entity, QueryError};
use crate::wire::ErrorBody;

/// A [`QueryError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            QueryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            QueryError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// The client-facing message. Never echoes the looked-up id.
    pub fn detail(&self) -> &'static str {
        match &self.0 {
            QueryError::InvalidCredentials => "Invalid credentials",
            QueryError::NotFound { entity, .. } => match entity {
                Entity::Parent => "No children found",
                Entity::Dependent => "Child not found",
                Entity::Vehicle => "Bus not found",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
