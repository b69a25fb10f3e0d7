use axum::{
  response::{IntoResponse, Response},
  Json,
};
use http::StatusCode;
use serde_json::json;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("{0}")]
  BadRequest(String),
  #[error("{0}")]
  Extraction(String),
  #[error("{0}")]
  Internal(String),
  #[error("{0}")]
  Io(#[from] std::io::Error),
  #[error("{0}")]
  Http(#[from] http::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_client_error() {
      debug!("rejected request: {}", self);
    } else {
      warn!("request failed: {}", self);
    }

    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_error_body_shape() {
    let resp = Error::BadRequest("Invalid YouTube URL".into()).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "Invalid YouTube URL" }));
  }

  #[test]
  fn test_server_errors_map_to_500() {
    let err = Error::Extraction("ERROR: Video unavailable".into());
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let err = Error::Internal("File not found after download".into());
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
