//! Handlers for `/weaves/{id}/entries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/weaves/{id}/entries` | Any authenticated caller; returns 201 + stored entry |
//! | `GET`  | `/weaves/{id}/entries` | Full history, inactive entries included |
//! | `POST` | `/weaves/{id}/entries/{index}/status` | Creator-only |

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
  entry::{DataHash, WeaveEntry},
  store::WeaveStore,
};

use crate::{caller::Caller, error::ApiError, weaves::StatusBody};

// ─── Append ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /weaves/{id}/entries`.
#[derive(Debug, Deserialize)]
pub struct AddEntryBody {
  pub data_hash: DataHash,
  pub note:      Option<String>,
}

/// `POST /weaves/{id}/entries` — returns 201 + the stored [`WeaveEntry`].
///
/// The append path is not creator-gated; the request must still carry an
/// authenticated caller like every other mutation.
pub async fn add<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<AddEntryBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WeaveStore,
{
  let entry = store
    .add_entry(id, body.data_hash, body.note)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /weaves/{id}/entries` — the full in-order ledger; callers filter by
/// `is_active` themselves.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<WeaveEntry>>, ApiError>
where
  S: WeaveStore,
{
  let entries = store
    .get_entries(id)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(entries))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `POST /weaves/{id}/entries/{index}/status` — creator-only toggle.
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path((id, index)): Path<(Uuid, u64)>,
  Json(body): Json<StatusBody>,
) -> Result<Json<WeaveEntry>, ApiError>
where
  S: WeaveStore,
{
  let entry = store
    .set_entry_active(caller.0, id, index, body.active)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(entry))
}
