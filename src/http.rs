use crate::{
    errors::{ApiError, ErrorResponse},
    ENCODING_FAILED_BODY,
};
use async_trait::async_trait;
use axum::{
    extract::{
        rejection::JsonRejection,
        FromRequest, FromRequestParts, Request,
    },
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{any::type_name, sync::Arc};

pub trait ApiResponder {
    fn http_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn unit() -> &'static str;
    fn article() -> &'static str;

    fn message(&self) -> String {
        format!("{} {} was returned", Self::article(), Self::unit())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppData<T>(pub Arc<T>);

impl<T> AppData<T> {
    #[inline]
    pub fn new(data: Arc<T>) -> Self {
        Self(data)
    }

    #[inline]
    pub fn extension(data: T) -> Extension<Arc<T>> {
        Extension(Arc::new(data))
    }
}

#[async_trait]
impl<T: Sync + Send + 'static, S: Send + Sync> FromRequestParts<S> for AppData<T> {
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let data = parts.extensions.get::<Arc<T>>().ok_or_else(|| {
            let t_name = type_name::<T>();
            let self_t_name = type_name::<Self>();

            tracing::error!(type_name = t_name, "Failed get AppData request extension");

            ApiError::ServicePanicked(Some(format!(
                "Failed to get '{self_t_name}' request extension"
            )))
        })?;

        Ok(Self::new(data.clone()))
    }
}

/// A successful JSON response. The body is `data` itself, the status code
/// comes from [`ApiResponder::http_code`] unless overridden.
#[derive(Debug)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub http_code: Option<StatusCode>,
}

impl<T: ApiResponder + Serialize> DataResponse<T> {
    #[inline]
    pub fn with_code(data: T, http_code: StatusCode) -> Self {
        Self {
            data,
            http_code: Some(http_code),
        }
    }
}

impl<T: ApiResponder + Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        let http_code = self.http_code.unwrap_or_else(|| self.data.http_code());
        tracing::debug!(status = http_code.as_u16(), "{}", self.data.message());

        match serde_json::to_vec(&self.data) {
            Ok(buf) => (
                http_code,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                )],
                buf,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = e.to_string(), "Failed to encode response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
                    )],
                    ENCODING_FAILED_BODY.to_vec(),
                )
                    .into_response()
            }
        }
    }
}

impl<T: ApiResponder + Serialize> From<T> for DataResponse<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self {
            http_code: Some(value.http_code()),
            data: value,
        }
    }
}

fn rejection_response(status_code: StatusCode, message: String) -> ErrorResponse {
    let status_code = if status_code == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        status_code
    } else {
        StatusCode::BAD_REQUEST
    };

    ErrorResponse {
        error_code: u32::from(status_code.as_u16()) * 100_u32,
        status_code,
        message,
    }
}

pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::from_request(req, state).await {
            Ok(axum::Json(v)) => Ok(Self(v)),
            Err(e) => Err(rejection_response(e.status(), e.body_text())),
        }
    }
}

pub struct Query<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(v)) => Ok(Self(v)),
            Err(e) => Err(rejection_response(e.status(), e.body_text())),
        }
    }
}

pub fn marshal_json_vec<T: Serialize, R: From<Vec<u8>>>(value: &T) -> R {
    match serde_json::to_vec(value) {
        Ok(v) => R::from(v),
        Err(e) => {
            tracing::error!(error = e.to_string(), "Failed to encode json");

            R::from(ENCODING_FAILED_BODY.to_vec())
        }
    }
}
