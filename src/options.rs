//! Translation of a download request into extraction engine options.

use std::ffi::OsString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
  Video,
  Audio,
}

impl MediaFormat {
  /// "mp4" selects the video path; every other value is treated as audio.
  pub fn from_request(format: &str) -> Self {
    if format == "mp4" {
      MediaFormat::Video
    } else {
      MediaFormat::Audio
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
  ExtractAudio { codec: String, quality: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOptions {
  pub quiet: bool,
  pub no_warnings: bool,
  // always false: the handlers need full metadata, never a flat listing
  pub extract_flat: bool,
  pub format_selector: Option<String>,
  pub merge_output_format: Option<String>,
  pub postprocessors: Vec<PostProcessor>,
  pub proxy: Option<String>,
}

impl ExtractionOptions {
  pub fn base() -> Self {
    Self {
      quiet: true,
      no_warnings: true,
      extract_flat: false,
      ..Default::default()
    }
  }

  pub fn with_proxy(self, proxy: Option<&str>) -> Self {
    Self {
      proxy: proxy.map(str::to_owned),
      ..self
    }
  }

  /// Render the options as yt-dlp command line arguments.
  pub fn to_args(&self) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![];

    if self.quiet {
      args.push("--quiet".into());
    }
    if self.no_warnings {
      args.push("--no-warnings".into());
    }
    if self.extract_flat {
      args.push("--flat-playlist".into());
    }
    args.push("--no-progress".into());

    if let Some(selector) = &self.format_selector {
      args.push("-f".into());
      args.push(selector.into());
    }

    if let Some(container) = &self.merge_output_format {
      args.push("--merge-output-format".into());
      args.push(container.into());
    }

    for pp in &self.postprocessors {
      match pp {
        PostProcessor::ExtractAudio { codec, quality } => {
          args.push("-x".into());
          args.push("--audio-format".into());
          args.push(codec.into());
          args.push("--audio-quality".into());
          args.push(quality.into());
        }
      }
    }

    if let Some(proxy) = &self.proxy {
      args.push("--proxy".into());
      args.push(proxy.into());
    }

    args
  }
}

/// `quality` is passed through as-is: a height ceiling for video, a
/// transcoder quality for audio.
pub fn build_options(format: MediaFormat, quality: &str) -> ExtractionOptions {
  let mut opts = ExtractionOptions::base();

  match format {
    MediaFormat::Video => {
      opts.format_selector = Some(format!(
        "bestvideo[height<={quality}]+bestaudio/best[height<={quality}]"
      ));
      opts.merge_output_format = Some("mp4".to_string());
    }
    MediaFormat::Audio => {
      opts.format_selector = Some("bestaudio/best".to_string());
      opts.postprocessors.push(PostProcessor::ExtractAudio {
        codec: "mp3".to_string(),
        quality: quality.to_string(),
      });
    }
  }

  opts
}
