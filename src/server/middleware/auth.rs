use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::server::{
    error::{auth::AuthError, AppError},
    state::AppState,
};

/// Checks dashboard requests against the configured static token.
pub struct AuthGuard<'a> {
    token: &'a str,
}

impl<'a> AuthGuard<'a> {
    pub fn new(token: &'a str) -> Self {
        Self { token }
    }

    /// Accepts an `Authorization: Bearer <token>` header, or a `token` query
    /// parameter for WebSocket clients that cannot set headers.
    ///
    /// # Returns
    /// - `Ok(())` - The supplied token matches
    /// - `Err(AuthError::MissingToken)` - No token in the header or query
    /// - `Err(AuthError::InvalidToken)` - A token was supplied but does not match
    pub fn require(&self, headers: &HeaderMap, query: Option<&str>) -> Result<(), AuthError> {
        let supplied = bearer_token(headers).or_else(|| query.and_then(query_token));

        match supplied {
            None => Err(AuthError::MissingToken),
            Some(token) if token == self.token => Ok(()),
            Some(_) => Err(AuthError::InvalidToken),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn query_token(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Rejects every request that does not carry the dashboard token.
pub async fn require_dashboard_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    AuthGuard::new(&state.config.dashboard_token)
        .require(request.headers(), request.uri().query())?;

    Ok(next.run(request).await)
}
