use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AccountError;

pub mod change_password;
pub mod get_profile;
pub mod health;
pub mod login;
pub mod logout;
pub mod signup;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl ApiSuccess<MessageData> {
    /// `{success: true, message}` body.
    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::new(
            status,
            MessageData {
                success: true,
                message: message.to_string(),
            },
        )
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (
            status,
            Json(MessageData {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidEmail(_) | AccountError::InvalidField(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AccountError::Conflict(_) => {
                ApiError::BadRequest("Email is already registered".to_string())
            }
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AccountError::NotFound(_) => ApiError::NotFound("Account not found".to_string()),
            AccountError::Password(_) | AccountError::Token(_) | AccountError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::errors::FieldError;

    #[test]
    fn test_business_errors_map_to_contract_statuses() {
        let cases = [
            (
                AccountError::Conflict("a@x.com".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AccountError::NotFound("a@x.com".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AccountError::InvalidField(FieldError::EmptyName),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::DatabaseError("connection refused".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn test_internal_error_detail_is_not_exposed() {
        let err = ApiError::from(AccountError::DatabaseError("password=hunter2".to_string()));
        assert_eq!(
            err,
            ApiError::InternalServerError("Database error: password=hunter2".to_string())
        );
        // The detail is only logged; the body carries a fixed message.
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
