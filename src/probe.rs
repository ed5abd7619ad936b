//! Network probes against flag sources
//! HEAD checks for CDN images and JSON fetches for asset-map APIs.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every probe
const USER_AGENT: &str = concat!("flagmap/", env!("CARGO_PKG_VERSION"));

/// Errors from a single probe. All of them mean "try the next source".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Resolution cancelled")]
    Cancelled,
    #[error("Response has no usable flag asset")]
    MissingAsset,
}

/// Transport used by the resolver to talk to flag sources
#[async_trait]
pub trait FlagProbe: Send + Sync {
    /// Succeeds when the URL answers a HEAD request with a 2xx status
    async fn head(&self, url: &str) -> Result<(), ProbeError>;

    /// GETs the URL and parses the body as JSON
    async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError>;
}

/// `reqwest`-backed probe
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FlagProbe for HttpProbe {
    async fn head(&self, url: &str) -> Result<(), ProbeError> {
        let response = self
            .client
            .head(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::Status(status.as_u16()))
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Picks a flag URL out of a JSON body with a `flags` map.
///
/// Accepts either an object or an array whose first element is the object
/// (REST Countries returns both shapes depending on the endpoint). Order of
/// preference: `prefer_format`, `png`, `svg`, then the first URL-valued entry.
pub fn pick_asset(body: &Value, prefer_format: &str) -> Option<String> {
    let record = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let flags = record.get("flags")?.as_object()?;

    let as_url = |v: &Value| {
        v.as_str()
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .map(str::to_string)
    };

    [prefer_format, "png", "svg"]
        .iter()
        .find_map(|format| flags.get(*format).and_then(as_url))
        .or_else(|| flags.values().find_map(as_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "flags": {
                "png": "https://flagcdn.com/w320/fr.png",
                "svg": "https://flagcdn.com/fr.svg",
                "alt": "The flag of France"
            }
        })
    }

    #[test]
    fn test_pick_preferred_format() {
        assert_eq!(
            pick_asset(&body(), "svg").as_deref(),
            Some("https://flagcdn.com/fr.svg")
        );
    }

    #[test]
    fn test_pick_falls_back_to_png() {
        assert_eq!(
            pick_asset(&body(), "webp").as_deref(),
            Some("https://flagcdn.com/w320/fr.png")
        );
    }

    #[test]
    fn test_pick_svg_then_first_available() {
        let svg_only = json!({ "flags": { "svg": "https://x/fr.svg" } });
        assert_eq!(pick_asset(&svg_only, "png").as_deref(), Some("https://x/fr.svg"));

        let other = json!({ "flags": { "alt": "text", "gif": "https://x/fr.gif" } });
        assert_eq!(pick_asset(&other, "png").as_deref(), Some("https://x/fr.gif"));
    }

    #[test]
    fn test_pick_from_array_body() {
        let array = json!([body()]);
        assert_eq!(
            pick_asset(&array, "png").as_deref(),
            Some("https://flagcdn.com/w320/fr.png")
        );
    }

    #[test]
    fn test_pick_missing_asset() {
        assert_eq!(pick_asset(&json!({ "name": "France" }), "png"), None);
        assert_eq!(pick_asset(&json!({ "flags": { "alt": "no urls" } }), "png"), None);
        assert_eq!(pick_asset(&json!([]), "png"), None);
    }
}
