use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the auth gate and hands the resolved identity to the handler.
///
/// Every rejection produces the same 401 body; the reason is only logged.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let identity = state.auth_gate.authenticate(header_value).map_err(|e| {
        tracing::warn!(reason = %e, "Request rejected by auth gate");
        ApiError::unauthorized()
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
