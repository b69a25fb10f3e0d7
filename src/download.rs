use std::path::{Path, PathBuf};

use axum::{
  body::{boxed, StreamBody},
  extract::{rejection::JsonRejection, State},
  response::Response,
  Json,
};
use http::{header, StatusCode};
use tempfile::TempDir;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{
  app::AppState,
  options::build_options,
  request::DownloadRequest,
  util::{content_disposition, content_type_for, ScopedStream},
  Error, Result,
};

const DEFAULT_TITLE: &str = "video";
// leaves room for the extension within common 255 byte name limits
const MAX_STEM_BYTES: usize = 200;

#[axum::debug_handler]
pub async fn download(
  State(state): State<AppState>,
  body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response> {
  let req = DownloadRequest::from_body(body)?.validate()?;
  let options = build_options(req.format, &req.quality)
    .with_proxy(state.ytdlp_proxy.as_deref());

  let metadata = state.extractor.fetch_metadata(&req.url, &options).await?;
  let title = metadata.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
  let stem = file_stem(&title);

  // removed when dropped: on any early return below, or once the response
  // body has been sent
  let dir = scoped_dir(state.temp_dir.clone()).await?;
  let template = dir
    .path()
    .join(format!("{}.%(ext)s", stem.replace('%', "%%")));

  info!("downloading {} ({:?}) as {:?}", req.url, req.format, title);
  state
    .extractor
    .download_to(&req.url, &options, &template)
    .await?;

  let (path, name) = find_downloaded(dir.path(), &stem)
    .await?
    .ok_or_else(|| Error::Internal("File not found after download".into()))?;

  let file = File::open(&path).await?;
  let len = file.metadata().await?.len();
  debug!("serving {} ({} bytes)", path.display(), len);

  let stream = ScopedStream::new(ReaderStream::new(file), dir);
  let resp = http::Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, content_type_for(&path))
    .header(header::CONTENT_LENGTH, len.to_string())
    .header(header::CONTENT_DISPOSITION, content_disposition(&name))
    .body(boxed(StreamBody::new(stream)))?;

  Ok(resp)
}

async fn scoped_dir(root: Option<PathBuf>) -> Result<TempDir> {
  if let Some(root) = &root {
    tokio::fs::create_dir_all(root).await?;
  }

  let dir = tokio::task::spawn_blocking(move || {
    let mut builder = tempfile::Builder::new();
    builder.prefix("download-");
    match root {
      Some(root) => builder.tempdir_in(root),
      None => builder.tempdir(),
    }
  })
  .await
  .map_err(|e| Error::Internal(format!("temp dir task failed: {e}")))??;

  Ok(dir)
}

/// The title as used in the output file name: path separators cannot
/// appear in a single path component.
fn file_stem(title: &str) -> String {
  let stem: String = title
    .chars()
    .map(|c| match c {
      '/' | '\\' | '\0' => '_',
      c => c,
    })
    .collect();

  let mut end = stem.len().min(MAX_STEM_BYTES);
  while !stem.is_char_boundary(end) {
    end -= 1;
  }
  stem[..end].to_string()
}

// yt-dlp leaves these behind only for interrupted downloads
fn is_partial(name: &str) -> bool {
  name.ends_with(".part") || name.ends_with(".ytdl")
}

async fn find_downloaded(
  dir: &Path,
  stem: &str,
) -> Result<Option<(PathBuf, String)>> {
  let mut entries = tokio::fs::read_dir(dir).await?;

  while let Some(entry) = entries.next_entry().await? {
    let name = entry.file_name().to_string_lossy().into_owned();
    if name.starts_with(stem) && !is_partial(&name) {
      return Ok(Some((entry.path(), name)));
    }
  }

  Ok(None)
}
