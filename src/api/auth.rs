use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::counter;

use crate::errors::AppError;
use crate::AppState;

/// Session check for the protected API.
///
/// With `API_TOKEN` configured every request must carry
/// `Authorization: Bearer <token>`. A missing header is `Unauthorized`; a
/// token that no longer matches is reported as an expired session so the
/// client can send the user back to sign in. An empty `API_TOKEN` disables
/// the check (dev mode).
pub async fn require_session(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check(&state.config.api_token, bearer_token(&req)) {
        Ok(()) => next.run(req).await,
        Err(e) => {
            if matches!(e, AppError::SessionExpired) {
                counter!("session_expired_total").increment(1);
                tracing::info!(path = %req.uri().path(), "Session expired");
            }
            e.into_response()
        }
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn check(expected: &str, presented: Option<&str>) -> Result<(), AppError> {
    if expected.is_empty() {
        return Ok(());
    }
    match presented {
        None => Err(AppError::Unauthorized),
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(AppError::SessionExpired),
    }
}
