use auth::AuthenticatedIdentity;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::account::errors::AccountError;
use crate::account::models::ChangePasswordCommand;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let Json(body) = body?;
    let command = ChangePasswordCommand::new(body.current_password, body.new_password)
        .map_err(AccountError::from)?;

    state
        .account_service
        .change_password(&identity, command)
        .await
        .map_err(|e| match e {
            // Wrong current password is a bad request here, not a failed login.
            AccountError::InvalidCredentials => ApiError::BadRequest(
                "Password change failed. Check your current password.".to_string(),
            ),
            _ => ApiError::from(e),
        })
        .map(|_| ApiSuccess::message(StatusCode::OK, "Password changed"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}
