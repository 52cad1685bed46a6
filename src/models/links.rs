use serde::{Deserialize, Serialize};
use url::Url;

/// A short link created by the backend, already resolved against the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub short_url: Url,
}

/// A share string resolved to its media URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVideo {
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ParsedVideo {
    /// Title for display, with blank titles treated as absent
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
