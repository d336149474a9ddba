//! Handlers for `/weaves` and `/actors/{id}/weaves` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/weaves` | Body: [`CreateWeaveBody`]; returns 201 + stored weave |
//! | `GET`  | `/weaves/{id}` | Single weave |
//! | `POST` | `/weaves/{id}/status` | Creator-only; body: [`StatusBody`] |
//! | `GET`  | `/actors/{id}/weaves` | Ids of all weaves created by an actor |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use weavery_core::{
  store::WeaveStore,
  weave::{Weave, WeaveId},
};

use crate::{caller::Caller, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /weaves`.
#[derive(Debug, Deserialize)]
pub struct CreateWeaveBody {
  pub weave_id: WeaveId,
  pub label:    String,
}

/// `POST /weaves` — returns 201 + the stored [`Weave`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<CreateWeaveBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WeaveStore,
{
  let weave = store
    .create_weave(caller.0, body.weave_id, body.label)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok((StatusCode::CREATED, Json(weave)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /weaves/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Weave>, ApiError>
where
  S: WeaveStore,
{
  let weave = store
    .get_weave(id)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?
    .ok_or(ApiError::Registry(weavery_core::Error::WeaveNotFound(id)))?;
  Ok(Json(weave))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// JSON body accepted by the weave and entry status endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub active: bool,
}

/// `POST /weaves/{id}/status` — creator-only soft-delete toggle.
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Weave>, ApiError>
where
  S: WeaveStore,
{
  let weave = store
    .set_weave_active(caller.0, id, body.active)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(weave))
}

// ─── Creator index ────────────────────────────────────────────────────────────

/// `GET /actors/{id}/weaves` — creation-ordered ids; empty for unknown actors.
pub async fn list_for_actor<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<WeaveId>>, ApiError>
where
  S: WeaveStore,
{
  let ids = store
    .weaves_of(id)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(ids))
}
