use std::{path::PathBuf, sync::Arc};

use axum::{
  error_handling::HandleErrorLayer,
  response::IntoResponse,
  routing::{get, post},
  BoxError, Json, Router,
};
use serde_json::json;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, download, extractor::Extractor, info, Error};

#[derive(Clone)]
pub struct AppState {
  pub extractor: Arc<dyn Extractor>,
  pub ytdlp_proxy: Option<String>,
  pub temp_dir: Option<PathBuf>,
}

impl AppState {
  pub fn new(extractor: Arc<dyn Extractor>, config: &Config) -> Self {
    Self {
      extractor,
      ytdlp_proxy: config.ytdlp_proxy.clone(),
      temp_dir: config.temp_dir.clone(),
    }
  }
}

pub fn router(state: AppState, config: &Config) -> Router {
  let mut app = Router::new()
    .route("/health", get(health))
    .route("/api/download", post(download::download))
    .route("/api/info", post(info::info))
    .with_state(state);

  if let Some(timeout) = config.request_timeout {
    app = app.layer(
      ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_layer_error))
        .layer(TimeoutLayer::new(timeout)),
    );
  }

  if config.allow_all_origins {
    app = app.layer(CorsLayer::permissive());
  }

  app.layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
  Json(json!({ "status": "OK" }))
}

// dropping the timed out handler also kills the yt-dlp child and removes
// the scoped download directory
async fn handle_layer_error(err: BoxError) -> Error {
  if err.is::<tower::timeout::error::Elapsed>() {
    Error::Internal("request timed out".to_string())
  } else {
    Error::Internal(err.to_string())
  }
}


#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use serde_json::json;

  use super::testing::{app, app_with_config, post_json, send, MockExtractor};
  use crate::config::Config;

  #[tokio::test]
  async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(MockExtractor::default()), dir.path());

    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = send(app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({ "status": "OK" }));
  }

  #[tokio::test]
  async fn test_cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(MockExtractor::default()), dir.path());

    let req = Request::get("/health")
      .header("origin", "https://example.org")
      .body(Body::empty())
      .unwrap();
    let resp = send(app, req).await;

    assert_eq!(
      resp.headers.get("access-control-allow-origin").unwrap(),
      "*"
    );
  }

  #[tokio::test]
  async fn test_cors_disabled() {
    let config = Config {
      allow_all_origins: false,
      ..Default::default()
    };
    let app = app_with_config(Arc::new(MockExtractor::default()), config);

    let req = Request::get("/health")
      .header("origin", "https://example.org")
      .body(Body::empty())
      .unwrap();
    let resp = send(app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.headers.get("access-control-allow-origin").is_none());
  }

  #[tokio::test]
  async fn test_timeout_renders_error_body() {
    let root = tempfile::tempdir().unwrap();
    let extractor = Arc::new(MockExtractor {
      metadata: Some(json!({ "title": "T" })),
      delay: Some(Duration::from_secs(5)),
      ..Default::default()
    });
    let config = Config {
      temp_dir: Some(root.path().to_owned()),
      request_timeout: Some(Duration::from_millis(50)),
      ..Default::default()
    };

    let resp = post_json(
      app_with_config(extractor, config),
      "/api/info",
      json!({ "url": "https://youtu.be/abc" }),
    )
    .await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.json(), json!({ "error": "request timed out" }));
  }

  #[tokio::test]
  async fn test_timeout_does_not_affect_fast_requests() {
    let root = tempfile::tempdir().unwrap();
    let extractor = Arc::new(MockExtractor {
      metadata: Some(json!({ "title": "T" })),
      ..Default::default()
    });
    let config = Config {
      temp_dir: Some(root.path().to_owned()),
      request_timeout: Some(Duration::from_secs(10)),
      ..Default::default()
    };

    let resp = post_json(
      app_with_config(extractor, config),
      "/api/info",
      json!({ "url": "https://youtu.be/abc" }),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["title"], "T");
  }
}
