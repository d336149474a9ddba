//! Handler for the `/events` read endpoint.
//!
//! Downstream consumers poll the durable log from the last sequence number
//! they processed; the registry itself pushes nothing.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use weavery_core::{event::RecordedEvent, store::WeaveStore};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Return only events with a sequence number strictly greater than this.
  #[serde(default)]
  pub since: u64,
}

/// `GET /events?since=<seq>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecordedEvent>>, ApiError>
where
  S: WeaveStore,
{
  let events = store
    .events_since(params.since)
    .await
    .map_err(|e| ApiError::Registry(e.into()))?;
  Ok(Json(events))
}
