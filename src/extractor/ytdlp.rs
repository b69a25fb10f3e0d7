use std::{
  ffi::OsString,
  path::{Path, PathBuf},
  process::Stdio,
};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::{options::ExtractionOptions, Error, Result};

use super::{Extractor, VideoMetadata};

// run yt-dlp command line to inspect and download videos.
// requires the yt-dlp executable (and ffmpeg for audio) to be installed.
pub struct Ytdlp {
  program: PathBuf,
}

impl Ytdlp {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  async fn run(&self, args: Vec<OsString>) -> Result<Vec<u8>> {
    debug!("running {} {}", self.program.display(), loggable_args(&args));

    let output = Command::new(&self.program)
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|e| {
        Error::Extraction(format!(
          "failed to run {}: {}",
          self.program.display(),
          e
        ))
      })?;

    detect_error(output.status.success(), &output.stderr)?;
    Ok(output.stdout)
  }
}

#[async_trait]
impl Extractor for Ytdlp {
  async fn fetch_metadata(
    &self,
    url: &str,
    options: &ExtractionOptions,
  ) -> Result<VideoMetadata> {
    let mut args = options.to_args();
    // emit the info as a single json object, implies simulate
    args.push("-J".into());
    args.push("--".into());
    args.push(url.into());

    let stdout = self.run(args).await?;
    serde_json::from_slice(&stdout).map_err(|e| {
      Error::Extraction(format!("unable to parse yt-dlp output: {e}"))
    })
  }

  async fn download_to(
    &self,
    url: &str,
    options: &ExtractionOptions,
    output_template: &Path,
  ) -> Result<()> {
    let mut args = options.to_args();
    args.push("--no-mtime".into());
    args.push("-o".into());
    args.push(output_template.into());
    args.push("--".into());
    args.push(url.into());

    self.run(args).await?;
    Ok(())
  }
}

fn detect_error(success: bool, stderr: &[u8]) -> Result<()> {
  let s = String::from_utf8_lossy(stderr);
  let error_line = s.lines().find(|line| line.starts_with("ERROR:"));

  match (success, error_line) {
    (true, None) => Ok(()),
    (_, Some(line)) => Err(Error::Extraction(line.trim().to_string())),
    (false, None) => {
      let message = s.trim();
      if message.is_empty() {
        Err(Error::Extraction("yt-dlp exited with an error".to_string()))
      } else {
        Err(Error::Extraction(message.to_string()))
      }
    }
  }
}

// used to remove cred info from proxy url before printing
static AUTH_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"//[^:/@]+(:[^@]+)?@").unwrap());

fn loggable_args(args: &[OsString]) -> String {
  args
    .iter()
    .map(|arg| arg.to_string_lossy())
    .map(|arg| AUTH_REGEX.replace(&arg, "//<REDACTED>@").into_owned())
    .collect::<Vec<_>>()
    .join(" ")
}
