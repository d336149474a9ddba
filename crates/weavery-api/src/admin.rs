//! Handlers for the `/owner` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use weavery_core::{store::WeaveStore, weave::ActorId};

use crate::{caller::Caller, error::ApiError};

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
  pub owner: ActorId,
}

/// `GET /owner` — the current registry administrator.
pub async fn get_owner<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<OwnerResponse>, ApiError>
where
  S: WeaveStore,
{
  let owner = store
    .owner()
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(OwnerResponse { owner }))
}

#[derive(Debug, Deserialize)]
pub struct TransferBody {
  pub new_owner: ActorId,
}

/// `POST /owner` — administrator-only ownership transfer.
pub async fn transfer<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<TransferBody>,
) -> Result<Json<OwnerResponse>, ApiError>
where
  S: WeaveStore,
{
  store
    .transfer_ownership(caller.0, body.new_owner)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(OwnerResponse { owner: body.new_owner }))
}
