//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use weavery_core::ErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request carried no usable caller identity.
  #[error("unauthenticated: {0}")]
  Unauthenticated(String),

  /// A registry operation was rejected; the status code follows the
  /// error's [`ErrorKind`].
  #[error(transparent)]
  Registry(#[from] weavery_core::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      ApiError::Registry(e) => match e.kind() {
        ErrorKind::InvalidArgument | ErrorKind::OutOfRange => {
          StatusCode::BAD_REQUEST
        }
        ErrorKind::Conflict | ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
