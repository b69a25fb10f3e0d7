use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct Config {
  pub bind_addr: SocketAddr,
  pub allow_all_origins: bool,
  pub ytdlp_path: PathBuf,
  pub ytdlp_proxy: Option<String>,
  /// Where per-request download directories are created. `None` means the
  /// system temp directory.
  pub temp_dir: Option<PathBuf>,
  pub request_timeout: Option<Duration>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
      allow_all_origins: true,
      ytdlp_path: PathBuf::from(DEFAULT_YTDLP_PATH),
      ytdlp_proxy: None,
      temp_dir: None,
      request_timeout: None,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match var("PORT") {
      Some(port) => port
        .trim()
        .parse::<u16>()
        .with_context(|| format!("invalid PORT: {port:?}"))?,
      None => DEFAULT_PORT,
    };
    let bind_addr = format!("{host}:{port}")
      .parse::<SocketAddr>()
      .with_context(|| format!("invalid HOST: {host:?}"))?;

    let allow_all_origins = match var("ALLOW_ALL_ORIGINS") {
      Some(v) => parse_bool(&v)
        .with_context(|| format!("invalid ALLOW_ALL_ORIGINS: {v:?}"))?,
      None => true,
    };

    let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
      Some(v) => {
        let secs = v
          .trim()
          .parse::<u64>()
          .with_context(|| format!("invalid REQUEST_TIMEOUT_SECS: {v:?}"))?;
        (secs > 0).then(|| Duration::from_secs(secs))
      }
      None => None,
    };

    Ok(Self {
      bind_addr,
      allow_all_origins,
      ytdlp_path: var("YTDLP_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP_PATH)),
      ytdlp_proxy: var("YTDLP_PROXY"),
      temp_dir: var("DOWNLOAD_TEMP_DIR").map(PathBuf::from),
      request_timeout,
    })
  }
}

fn parse_bool(s: &str) -> Result<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => bail!("expected a boolean"),
  }
}
