use auth::AuthenticatedIdentity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::UserProfile;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .account_service
        .get_profile(&identity)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseData {
    pub email: String,
    pub name: String,
    pub birth_date: String,
    pub gender: String,
}

impl From<&UserProfile> for ProfileResponseData {
    fn from(user: &UserProfile) -> Self {
        Self {
            email: user.email.as_str().to_string(),
            name: user.profile.name.clone(),
            birth_date: user.profile.birth_date.format("%Y-%m-%d").to_string(),
            gender: user.profile.gender.clone(),
        }
    }
}
