mod ytdlp;

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;

use crate::{options::ExtractionOptions, Result};

pub use ytdlp::Ytdlp;

/// Metadata as reported by the extraction engine. Only the fields the
/// handlers read are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMetadata {
  pub title: Option<String>,
  pub duration: Option<Number>,
  pub thumbnail: Option<String>,
  #[serde(default)]
  pub formats: Vec<RawFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
  pub format_id: Option<String>,
  pub ext: Option<String>,
  pub resolution: Option<String>,
  pub fps: Option<Number>,
  pub vcodec: Option<String>,
  pub acodec: Option<String>,
  pub filesize: Option<Number>,
  pub quality: Option<Number>,
}

impl RawFormat {
  // formats reporting neither a video nor an audio track are storyboards
  // and the like
  pub fn has_media(&self) -> bool {
    self.vcodec.as_deref() != Some("none")
      || self.acodec.as_deref() != Some("none")
  }
}

#[async_trait]
pub trait Extractor: Send + Sync {
  /// Inspect `url` without downloading anything.
  async fn fetch_metadata(
    &self,
    url: &str,
    options: &ExtractionOptions,
  ) -> Result<VideoMetadata>;

  /// Download (and post-process) `url` to `output_template`. The template
  /// may contain `%(ext)s`, which the engine replaces with the final
  /// extension.
  async fn download_to(
    &self,
    url: &str,
    options: &ExtractionOptions,
    output_template: &Path,
  ) -> Result<()>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_has_media() {
    let fmt = |v: &str, a: &str| RawFormat {
      vcodec: Some(v.into()),
      acodec: Some(a.into()),
      ..Default::default()
    };

    assert!(!fmt("none", "none").has_media());
    assert!(fmt("avc1", "none").has_media());
    assert!(fmt("none", "opus").has_media());
    assert!(RawFormat::default().has_media());
  }

  #[test]
  fn test_deserialize_metadata_ignores_unknown_keys() {
    let meta: VideoMetadata = serde_json::from_str(
      r#"{
        "id": "abc",
        "title": "T",
        "duration": 120,
        "formats": [{"format_id": "18", "vcodec": "avc1", "fps": 29.97}]
      }"#,
    )
    .unwrap();

    assert_eq!(meta.title.as_deref(), Some("T"));
    assert_eq!(meta.duration.unwrap().to_string(), "120");
    assert_eq!(meta.thumbnail, None);
    assert_eq!(meta.formats.len(), 1);
    assert_eq!(meta.formats[0].fps.as_ref().unwrap().as_f64(), Some(29.97));
  }
}
