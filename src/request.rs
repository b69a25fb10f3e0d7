use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::{
  options::MediaFormat, validate::is_valid_youtube_url, Error, Result,
};

const MISSING_PARAMS: &str = "Missing required parameters";
const MISSING_URL: &str = "Missing URL parameter";
const INVALID_URL: &str = "Invalid YouTube URL";

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
  url: Option<String>,
  format: Option<String>,
  quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InfoRequest {
  url: Option<String>,
}

#[derive(Debug)]
pub struct Download {
  pub url: String,
  pub format: MediaFormat,
  pub quality: String,
}

#[derive(Debug)]
pub struct Info {
  pub url: String,
}

impl DownloadRequest {
  pub fn from_body(body: Result<Json<Self>, JsonRejection>) -> Result<Self> {
    parse_body(body, MISSING_PARAMS)
  }

  pub fn validate(self) -> Result<Download> {
    let missing = || Error::BadRequest(MISSING_PARAMS.to_string());
    let url = present(self.url).ok_or_else(missing)?;
    let format = present(self.format).ok_or_else(missing)?;
    let quality = present(self.quality).ok_or_else(missing)?;

    Ok(Download {
      url: valid_url(&url)?,
      format: MediaFormat::from_request(&format),
      quality,
    })
  }
}

impl InfoRequest {
  pub fn from_body(body: Result<Json<Self>, JsonRejection>) -> Result<Self> {
    parse_body(body, MISSING_URL)
  }

  pub fn validate(self) -> Result<Info> {
    let url = present(self.url)
      .ok_or_else(|| Error::BadRequest(MISSING_URL.to_string()))?;

    Ok(Info {
      url: valid_url(&url)?,
    })
  }
}

// a body of the wrong shape (fields of the wrong type, not an object) is
// reported the same way as a missing field
fn parse_body<T>(
  body: Result<Json<T>, JsonRejection>,
  missing: &str,
) -> Result<T> {
  match body {
    Ok(Json(body)) => Ok(body),
    Err(JsonRejection::JsonDataError(_)) => {
      Err(Error::BadRequest(missing.to_string()))
    }
    Err(rejection) => Err(Error::BadRequest(rejection.body_text())),
  }
}

fn present(field: Option<String>) -> Option<String> {
  field.filter(|s| !s.is_empty())
}

fn valid_url(url: &str) -> Result<String> {
  let url = url.trim();
  if is_valid_youtube_url(url) {
    Ok(url.to_string())
  } else {
    Err(Error::BadRequest(INVALID_URL.to_string()))
  }
}
