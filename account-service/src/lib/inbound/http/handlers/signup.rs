use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::Profile;
use crate::account::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let Json(body) = body?;

    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::CREATED, "Registration complete"))
}

/// HTTP request body for registration (raw JSON)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    email: String,
    password: String,
    name: String,
    birth_date: String,
    gender: String,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<RegisterCommand, AccountError> {
        let email = EmailAddress::new(self.email)?;
        let profile = Profile::new(self.name, &self.birth_date, self.gender)?;
        Ok(RegisterCommand::new(email, self.password, profile)?)
    }
}
