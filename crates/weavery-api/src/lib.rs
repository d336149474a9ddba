//! JSON REST API for the Weavery registry.
//!
//! Exposes an axum [`Router`] backed by any [`weavery_core::store::WeaveStore`].
//! Transport concerns (TLS, the authenticating proxy that sets the caller
//! header) are the deployment's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", weavery_api::api_router(store.clone()))
//! ```

pub mod admin;
pub mod caller;
pub mod entries;
pub mod error;
pub mod events;
pub mod weaves;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use weavery_core::store::WeaveStore;

pub use caller::{ACTOR_HEADER, Caller};
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WeaveStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Weaves
    .route("/weaves", post(weaves::create::<S>))
    .route("/weaves/{id}", get(weaves::get_one::<S>))
    .route("/weaves/{id}/status", post(weaves::set_status::<S>))
    // Entry ledger
    .route(
      "/weaves/{id}/entries",
      get(entries::list::<S>).post(entries::add::<S>),
    )
    .route(
      "/weaves/{id}/entries/{index}/status",
      post(entries::set_status::<S>),
    )
    // Creator index
    .route("/actors/{id}/weaves", get(weaves::list_for_actor::<S>))
    // Administration
    .route("/owner", get(admin::get_owner::<S>).post(admin::transfer::<S>))
    // Event log
    .route("/events", get(events::list::<S>))
    .with_state(store)
}
