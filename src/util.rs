mod scoped_stream;

use std::path::Path;

pub use scoped_stream::ScopedStream;

const FALLBACK_FILENAME: &str = "download";

/// Make a file name safe to put into a `Content-Disposition` header.
///
/// Keeps ASCII letters, digits, spaces and a few punctuation characters;
/// everything else (path separators, quotes, control and non-ASCII
/// characters) is dropped. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
  let (stem, ext) = match name.rsplit_once('.') {
    Some((stem, ext))
      if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
    {
      (stem, Some(ext))
    }
    _ => (name, None),
  };

  let mut stem = clean_component(stem);
  if stem.is_empty() {
    stem = FALLBACK_FILENAME.to_string();
  }

  match ext {
    Some(ext) => format!("{stem}.{ext}"),
    None => stem,
  }
}

fn clean_component(s: &str) -> String {
  let kept: String = s
    .chars()
    .filter(|&c| {
      c.is_ascii_alphanumeric()
        || matches!(c, ' ' | '-' | '_' | '.' | '(' | ')' | '[' | ']')
    })
    .collect();

  let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
  collapsed.trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// `Content-Disposition` value for an attachment. The ASCII-safe name is
/// always present; when sanitizing changed the name, the original is added
/// as an RFC 5987 `filename*` parameter.
pub fn content_disposition(name: &str) -> String {
  let ascii = sanitize_filename(name);
  if ascii == name {
    format!("attachment; filename=\"{ascii}\"")
  } else {
    format!(
      "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
      urlencoding::encode(name)
    )
  }
}

pub fn content_type_for(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_ascii_lowercase);

  match ext.as_deref() {
    Some("mp4") => "video/mp4",
    Some("webm") => "video/webm",
    Some("mkv") => "video/x-matroska",
    Some("mp3") => "audio/mpeg",
    Some("m4a") => "audio/mp4",
    Some("opus") | Some("ogg") => "audio/ogg",
    Some("wav") => "audio/wav",
    _ => "application/octet-stream",
  }
}
