use crate::http::marshal_json_vec;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error_code: u32,
}

impl ErrorBody {
    #[inline]
    pub fn new(message: String, error_code: u32) -> Self {
        Self {
            message,
            error_code,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Server service panicked: {0:?}")]
    ServicePanicked(Option<String>),

    #[error("The user was not found")]
    UserNotFound,
    #[error("No users were found with the provided ids")]
    UsersNotMatched,
    #[error("A user with this email already exists")]
    UserAlreadyExists,
    #[error("The field \"{0}\" is required")]
    UserFieldMissing(&'static str),
    #[error("At least one user id must be provided")]
    UserIdsMissing,
}

impl From<&ApiError> for StatusCode {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::ServicePanicked(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UserNotFound | ApiError::UsersNotMatched => StatusCode::NOT_FOUND,
            ApiError::UserAlreadyExists => StatusCode::CONFLICT,
            ApiError::UserFieldMissing(_) | ApiError::UserIdsMissing => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<&ApiError> for u32 {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::ServicePanicked(_) => 50001,
            ApiError::UserNotFound => 40401,
            ApiError::UsersNotMatched => 40402,
            ApiError::UserAlreadyExists => 40901,
            ApiError::UserFieldMissing(_) => 40001,
            ApiError::UserIdsMissing => 40002,
        }
    }
}

/// An error already resolved to what goes on the wire.
#[derive(Debug)]
pub struct ErrorResponse {
    pub status_code: StatusCode,
    pub error_code: u32,
    pub message: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(value: ApiError) -> Self {
        let status_code: StatusCode = (&value).into();
        let error_code: u32 = (&value).into();

        let message = if status_code.is_server_error() {
            tracing::error!(error = value.to_string(), error_code, "Request failed");
            "Internal server error".to_owned()
        } else {
            value.to_string()
        };

        Self {
            status_code,
            error_code,
            message,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let buf: Vec<u8> = marshal_json_vec(&ErrorBody::new(self.message, self.error_code));

        (
            self.status_code,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
            )],
            buf,
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    #[inline]
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}
