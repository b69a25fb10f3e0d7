use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"^(?i:https?://)?(?i:www\.)?(?i:youtube\.com|youtu\.?be)/.+$",
    r"^(?i:https?://(?:www\.)?youtube\.com)/watch\?v=[\w-]+",
    r"^(?i:https?://youtu\.be)/[\w-]+",
  ]
  .into_iter()
  .map(|re| Regex::new(re).unwrap())
  .collect()
});

pub fn is_valid_youtube_url(url: &str) -> bool {
  YOUTUBE_URL_PATTERNS.iter().any(|re| re.is_match(url))
}
