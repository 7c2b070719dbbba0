//! REST endpoints for calendar events
//!
//! - `POST /create_event` - Create an event, optionally with a reminder
//! - `POST /update_event` - Replace text, date and reminder of an event
//! - `POST /delete_event` - Delete an event
//! - `GET /events_for_day|week|month` - Active events in a date range
//! - `GET /events` - All active events of a user
//!
//! POST bodies are accepted as JSON or as URL-encoded forms.

pub mod events;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::types::CalendarError;
use crate::validation::ValidationError;

/// Standard API response wrapper: `{"result": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub result: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Json<Self> {
        Json(Self { result })
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "CONFLICT".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

/// An [`ApiError`] paired with its HTTP status
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ApiError,
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiError::bad_request(message),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CalendarError> for ApiFailure {
    fn from(err: CalendarError) -> Self {
        let message = err.to_string();
        let (status, body) = match err {
            CalendarError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, ApiError::bad_request(message))
            }
            CalendarError::NotFound { .. } => (StatusCode::NOT_FOUND, ApiError::not_found(message)),
            CalendarError::AlreadyExists { .. } => {
                (StatusCode::CONFLICT, ApiError::conflict(message))
            }
            CalendarError::StorageFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal(message))
            }
        };
        Self { status, body }
    }
}

impl From<ValidationError> for ApiFailure {
    fn from(err: ValidationError) -> Self {
        CalendarError::from(err).into()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

/// Body extractor accepting `application/json` or a URL-encoded form
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_media_type);

        if is_json {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| malformed_body(e.body_text()))?;
            let Json(value) =
                Json::<T>::from_bytes(&bytes).map_err(|e| malformed_body(e.body_text()))?;
            return Ok(Self(value));
        }

        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| malformed_body(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Media types are case-insensitive; parameters such as `charset` are ignored
fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

fn malformed_body(detail: String) -> ApiFailure {
    ApiFailure::bad_request(format!("Invalid request format: {}", detail))
}
