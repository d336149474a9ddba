//! Caller identity extractor.
//!
//! The registry performs no authentication of its own; the fronting
//! environment (reverse proxy, gateway) authenticates each request and
//! asserts the caller's identity in the [`ACTOR_HEADER`] header. Mutating
//! routes extract a [`Caller`]; read-only routes do not.

use axum::http::{HeaderMap, request::Parts};
use axum::extract::FromRequestParts;
use uuid::Uuid;
use weavery_core::weave::ActorId;

use crate::error::ApiError;

/// Header carrying the authenticated caller identity as a UUID.
pub const ACTOR_HEADER: &str = "x-weavery-actor";

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub ActorId);

/// Resolve the caller identity directly from headers.
pub fn resolve_caller(headers: &HeaderMap) -> Result<Caller, ApiError> {
  let value = headers.get(ACTOR_HEADER).ok_or_else(|| {
    ApiError::Unauthenticated(format!("missing {ACTOR_HEADER} header"))
  })?;
  let s = value.to_str().map_err(|_| {
    ApiError::Unauthenticated(format!("{ACTOR_HEADER} is not valid ascii"))
  })?;
  let id = Uuid::parse_str(s).map_err(|_| {
    ApiError::Unauthenticated(format!("malformed actor id: {s:?}"))
  })?;
  Ok(Caller(id))
}

impl<S> FromRequestParts<S> for Caller
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    resolve_caller(&parts.headers)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::Request;

  async fn extract(req: Request<axum::body::Body>) -> Result<Caller, ApiError> {
    let (mut parts, _) = req.into_parts();
    Caller::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn valid_header() {
    let id = Uuid::new_v4();
    let req = Request::builder()
      .header(ACTOR_HEADER, id.to_string())
      .body(axum::body::Body::empty())
      .unwrap();
    let caller = extract(req).await.unwrap();
    assert_eq!(caller.0, id);
  }

  #[tokio::test]
  async fn missing_header() {
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req).await,
      Err(ApiError::Unauthenticated(_))
    ));
  }

  #[tokio::test]
  async fn malformed_uuid() {
    let req = Request::builder()
      .header(ACTOR_HEADER, "not-a-uuid")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req).await,
      Err(ApiError::Unauthenticated(_))
    ));
  }
}
