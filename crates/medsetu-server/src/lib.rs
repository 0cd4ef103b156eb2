//! Configuration and wiring for the MedSetu HTTP server.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use medsetu_api::{ApiState, api_router};
use medsetu_core::{lifecycle::StatusPolicy, repo::Repository};
use medsetu_sqlite::SqliteBackend;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered from built-in defaults, an optional TOML file, then `MEDSETU_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  pub status_policy: StatusPolicy,
}

/// Load configuration, reading `path` if it exists.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  build_config(config::File::from(path).required(false))
}

fn build_config<S>(file: S) -> anyhow::Result<ServerConfig>
where
  S: config::Source + Send + Sync + 'static,
{
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080_i64)?
    .set_default("database_path", "medsetu.db")?
    .set_default("status_policy", "open")?
    .add_source(file)
    .add_source(config::Environment::with_prefix("MEDSETU"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full application: the API under `/api`, wrapped in request tracing.
pub fn app<R>(state: ApiState<R>) -> Router
where
  R: Repository + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

/// Open the database named in `cfg` and serve until the listener fails.
pub async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
  let db_path = expand_tilde(&cfg.database_path);
  let backend = SqliteBackend::open(&db_path)
    .await
    .with_context(|| format!("failed to open database at {db_path:?}"))?;

  tracing::info!(policy = ?cfg.status_policy, "opened database at {db_path:?}");
  let state = ApiState::new(Arc::new(backend), cfg.status_policy);

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!("Listening on http://{address}");
  axum::serve(listener, app(state)).await.context("server error")?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::{File, FileFormat};
  use tower::ServiceExt as _;

  fn from_toml(toml: &str) -> ServerConfig {
    build_config(File::from_str(toml, FileFormat::Toml)).unwrap()
  }

  #[test]
  fn defaults_apply_when_file_is_empty() {
    let cfg = from_toml("");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_path, PathBuf::from("medsetu.db"));
    assert_eq!(cfg.status_policy, StatusPolicy::Open);
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
        host = "0.0.0.0"
        port = 9090
        database_path = "/var/lib/medsetu/data.db"
        status_policy = "closed"
      "#,
    );
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.database_path, PathBuf::from("/var/lib/medsetu/data.db"));
    assert_eq!(cfg.status_policy, StatusPolicy::Closed);
  }

  #[test]
  fn missing_config_file_is_not_an_error() {
    let cfg = load_config(Path::new("/nonexistent/medsetu.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/medsetu.db")),
      PathBuf::from(home).join("medsetu.db"),
    );
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let backend = SqliteBackend::open_in_memory().await.unwrap();
    let state = ApiState::new(Arc::new(backend), StatusPolicy::Open);

    let resp = app(state.clone())
      .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");

    let resp = app(state)
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
