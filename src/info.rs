use axum::{
  extract::{rejection::JsonRejection, State},
  Json,
};
use serde::Serialize;
use serde_json::Number;

use crate::{
  app::AppState,
  extractor::{RawFormat, VideoMetadata},
  options::ExtractionOptions,
  request::InfoRequest,
  Result,
};

#[derive(Debug, Serialize)]
pub struct VideoInfo {
  pub title: String,
  pub duration: Number,
  pub thumbnail: String,
  pub formats: Vec<FormatDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct FormatDescriptor {
  pub format_id: Option<String>,
  pub ext: Option<String>,
  pub resolution: String,
  pub fps: Option<Number>,
  pub vcodec: Option<String>,
  pub acodec: Option<String>,
  pub filesize: Option<Number>,
  pub quality: Number,
}

impl From<VideoMetadata> for VideoInfo {
  fn from(meta: VideoMetadata) -> Self {
    Self {
      title: meta.title.unwrap_or_else(|| "Unknown".to_string()),
      duration: meta.duration.unwrap_or_else(|| Number::from(0)),
      thumbnail: meta.thumbnail.unwrap_or_default(),
      formats: meta
        .formats
        .into_iter()
        .filter(RawFormat::has_media)
        .map(Into::into)
        .collect(),
    }
  }
}

impl From<RawFormat> for FormatDescriptor {
  fn from(f: RawFormat) -> Self {
    Self {
      format_id: f.format_id,
      ext: f.ext,
      resolution: f.resolution.unwrap_or_else(|| "N/A".to_string()),
      fps: f.fps,
      vcodec: f.vcodec,
      acodec: f.acodec,
      filesize: f.filesize,
      quality: f.quality.unwrap_or_else(|| Number::from(0)),
    }
  }
}

pub async fn info(
  State(state): State<AppState>,
  body: Result<Json<InfoRequest>, JsonRejection>,
) -> Result<Json<VideoInfo>> {
  let req = InfoRequest::from_body(body)?.validate()?;
  let options =
    ExtractionOptions::base().with_proxy(state.ytdlp_proxy.as_deref());

  let metadata = state.extractor.fetch_metadata(&req.url, &options).await?;
  Ok(Json(metadata.into()))
}
