use auth::AuthGate;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::router::AppState;

/// Acknowledge a logout.
///
/// Only the shape of the bearer header is checked. The token is neither
/// verified nor revoked; the client is expected to discard it.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(ApiError::unauthorized)?;

    let token = AuthGate::bearer_token(header_value).map_err(|e| {
        tracing::warn!(reason = %e, "Logout rejected");
        ApiError::unauthorized()
    })?;

    state
        .account_service
        .logout(token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "Logged out"))
}
