//! weavery server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite-backed registry, and serves the JSON API over HTTP. Caller
//! identity is asserted by the fronting environment in the
//! `x-weavery-actor` header; this binary does not authenticate.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use weavery_store_sqlite::SqliteStore;

/// Runtime server configuration, deserialised from `config.toml` and
/// `WEAVERY_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  host:          String,
  port:          u16,
  store_path:    PathBuf,
  /// Administrator identity seeded on first start. Ignored once an owner is
  /// persisted — ownership then changes only via the transfer operation.
  initial_owner: Uuid,
}

#[derive(Parser)]
#[command(author, version, about = "Weavery registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WEAVERY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open the registry.
  let store = SqliteStore::open(&store_path, server_cfg.initial_owner)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let app = weavery_api::api_router(Arc::new(store))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
