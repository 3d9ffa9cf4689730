//! JSON body extractor.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body decoded regardless of `Content-Type`.
///
/// Read and decode failures, including an oversized body, are `400`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::bad_request(format!("unable to read the body: {}", rejection.body_text()))
        })?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::bad_request(format!("failed to unmarshal: {e}")))?;

        Ok(JsonBody(value))
    }
}
