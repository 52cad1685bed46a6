//! Thin client for the backend: short links, share parsing and text crypto.
//!
//! Every call is a JSON `POST`. Error bodies are read as `{ "message": ... }`,
//! falling back to the raw body text, then to a per-call default.

pub mod error;

pub use error::{ApiError, ApiResult};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::models::{ParsedVideo, ShortLink};

/// Append `path` to `base` as a new segment, the way the web client built its
/// endpoint URLs (`${base}/path`)
pub fn join_endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
}

#[derive(Serialize)]
struct ShortenRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    share_string: &'a str,
}

#[derive(Serialize)]
struct EncryptRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct DecryptRequest<'a> {
    encrypted: &'a str,
}

/// Backend client rooted at one base URL
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with a per-request timeout
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient { client, base_url })
    }

    /// Create a short link for `long_url`.
    ///
    /// The backend answers with a path; it is resolved against the base URL.
    pub async fn shorten(&self, long_url: &str) -> ApiResult<ShortLink> {
        let body = self
            .post(
                self.base_url.clone(),
                &ShortenRequest { url: long_url },
                "Unknown error",
            )
            .await?;

        let short = string_field(&body, "short_url")?;
        let short_url = self.base_url.join(short)?;
        log::info!("Shortened {} to {}", long_url, short_url);
        Ok(ShortLink { short_url })
    }

    /// Resolve a share string to its video URL and title
    pub async fn parse_share(&self, share_string: &str) -> ApiResult<ParsedVideo> {
        let endpoint = join_endpoint(&self.base_url, "douyin_parse")?;
        let body = self
            .post(endpoint, &ParseRequest { share_string }, "Parse failed")
            .await?;

        string_field(&body, "video_url")?;
        let parsed: ParsedVideo = from_body(body, "video_url")?;
        log::info!("Resolved share string to {}", parsed.video_url);
        Ok(parsed)
    }

    /// Encrypt `text` with the backend key
    pub async fn encrypt(&self, text: &str) -> ApiResult<String> {
        let endpoint = join_endpoint(&self.base_url, "crypto/encrypt")?;
        let body = self
            .post(endpoint, &EncryptRequest { text }, "Encryption failed")
            .await?;
        string_field(&body, "encrypted").map(str::to_string)
    }

    /// Decrypt a value produced by [`ApiClient::encrypt`]
    pub async fn decrypt(&self, encrypted: &str) -> ApiResult<String> {
        let endpoint = join_endpoint(&self.base_url, "crypto/decrypt")?;
        let body = self
            .post(endpoint, &DecryptRequest { encrypted }, "Decryption failed")
            .await?;
        string_field(&body, "decrypted").map(str::to_string)
    }

    async fn post<B: Serialize>(&self, url: Url, body: &B, default_error: &str) -> ApiResult<Value> {
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        // Non-JSON bodies are carried as the message, like a plain-text error page
        let value = serde_json::from_str::<Value>(&text)
            .unwrap_or_else(|_| serde_json::json!({ "message": text }));

        if !status.is_success() {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(default_error)
                .to_string();
            log::warn!("Backend answered {}: {}", status, message);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(value)
    }
}

fn string_field<'a>(body: &'a Value, field: &'static str) -> ApiResult<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingField(field))
}

fn from_body<T: DeserializeOwned>(body: Value, field: &'static str) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|_| ApiError::MissingField(field))
}
