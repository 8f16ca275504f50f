use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::{
    errors::{ApiError, ServiceError},
    storage::Upload,
    ApiResponse,
};

/// Multipart part that carries the JSON request body.
pub const PAYLOAD_FIELD: &str = "payload";

/// Standard success response
pub fn success_response<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::OK, message, data)
}

/// Standard created response
pub fn created_response<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::CREATED, message, data)
}

fn envelope<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (status, Json(ApiResponse::success(status, message, data))).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ServiceError(ServiceError::from(e)))
}

/// JSON body extractor whose rejections use the failure envelope.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Path parameters; a segment that does not parse is a 400 envelope.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// A decoded multipart form: the JSON payload plus any uploaded files.
#[derive(Debug)]
pub struct MultipartForm<P> {
    pub payload: P,
    pub files: Vec<Upload>,
}

/// Reads a `payload` JSON part and the file parts named in `file_fields`.
/// Unknown parts and empty files are skipped.
pub async fn read_multipart<P: DeserializeOwned>(
    mut multipart: Multipart,
    file_fields: &[&str],
) -> Result<MultipartForm<P>, ApiError> {
    let mut payload = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == PAYLOAD_FIELD {
            let text = field.text().await?;
            let parsed = serde_json::from_str::<P>(&text)
                .map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e)))?;
            payload = Some(parsed);
        } else if file_fields.contains(&name.as_str()) {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| name.clone());
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                files.push(Upload { file_name, bytes });
            }
        }
    }

    let payload = payload
        .ok_or_else(|| ApiError::BadRequest(format!("Missing '{}' part", PAYLOAD_FIELD)))?;
    Ok(MultipartForm { payload, files })
}
