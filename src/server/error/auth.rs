use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Request carried neither an `Authorization: Bearer` header nor a `token` query parameter.
    #[error("Dashboard request is missing a token")]
    MissingToken,

    /// A token was supplied but does not match the configured dashboard token.
    #[error("Dashboard request has an invalid token")]
    InvalidToken,
}

/// Converts authentication errors into HTTP responses.
///
/// Both variants produce the same 401 body so callers cannot tell a missing
/// token from a wrong one. The distinction is kept for debug logging.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorDto {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response()
    }
}
