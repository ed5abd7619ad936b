//! Multi-source flag resolver
//! Probes flag sources in priority order with per-probe timeouts and retry rounds.

use crate::clock::{Clock, TokioClock};
use crate::fallback::{generate_fallback, FallbackDescriptor, FallbackOptions};
use crate::normalize::normalize_code;
use crate::probe::{pick_asset, FlagProbe, HttpProbe, ProbeError};
use crate::sources::{default_sources, sort_by_priority, CheckKind, FlagSource};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Delay between two full sweeps over the sources
pub const RETRY_BACKOFF: Duration = Duration::from_millis(1000);

fn duration_from_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Duration::from_millis(u64::deserialize(deserializer)?))
}

/// Options controlling a single resolution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Number of full sweeps over the source list
    pub max_retries: u32,
    /// Per-probe deadline (milliseconds in config files)
    #[serde(deserialize_with = "duration_from_ms")]
    pub timeout: Duration,
    /// Format key preferred when a source returns an asset map
    pub prefer_format: String,
    /// When false, only one sweep is attempted
    pub fallback_to_lower_quality: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: Duration::from_millis(5000),
            prefer_format: "png".to_string(),
            fallback_to_lower_quality: true,
        }
    }
}

impl ResolveOptions {
    /// Rounds actually attempted
    pub fn rounds(&self) -> u32 {
        if self.fallback_to_lower_quality {
            self.max_retries.max(1)
        } else {
            1
        }
    }

    /// Canonical serialization used in cache keys
    pub fn canonical(&self) -> String {
        format!(
            "maxRetries={};timeout={};preferFormat={};fallbackToLowerQuality={}",
            self.max_retries,
            self.timeout.as_millis(),
            self.prefer_format,
            self.fallback_to_lower_quality
        )
    }
}

/// Either a resolved flag URL or a placeholder to draw instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagDisplay {
    Image(String),
    Placeholder(FallbackDescriptor),
}

/// Resolves country codes to flag image URLs
#[derive(Clone)]
pub struct FlagResolver {
    sources: Vec<FlagSource>,
    probe: Arc<dyn FlagProbe>,
    clock: Arc<dyn Clock>,
}

impl Default for FlagResolver {
    fn default() -> Self {
        Self::new(default_sources(), Arc::new(HttpProbe::new()), Arc::new(TokioClock))
    }
}

impl FlagResolver {
    /// Sources are sorted by ascending priority
    pub fn new(sources: Vec<FlagSource>, probe: Arc<dyn FlagProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources: sort_by_priority(sources),
            probe,
            clock,
        }
    }

    /// Sources in probing order
    pub fn sources(&self) -> &[FlagSource] {
        &self.sources
    }

    /// Resolves a flag URL. Failures of any kind yield `None`.
    pub async fn resolve(&self, code: &str, options: &ResolveOptions) -> Option<String> {
        self.resolve_with_cancel(code, options, &CancellationToken::new())
            .await
    }

    /// Like [`resolve`](Self::resolve), but stops early once `cancel` fires.
    pub async fn resolve_with_cancel(
        &self,
        code: &str,
        options: &ResolveOptions,
        cancel: &CancellationToken,
    ) -> Option<String> {
        let Some(canonical) = normalize_code(code) else {
            debug!("No usable country code in {:?}", code);
            return None;
        };

        let rounds = options.rounds();
        for round in 1..=rounds {
            for source in &self.sources {
                match self.probe_source(source, &canonical, options, cancel).await {
                    Ok(url) => {
                        info!("Resolved flag for {} via {}: {}", canonical, source.name, url);
                        return Some(url);
                    }
                    Err(ProbeError::Cancelled) => {
                        debug!("Resolution for {} cancelled", canonical);
                        return None;
                    }
                    Err(e) => {
                        debug!(
                            "Source {} failed for {} (round {}/{}): {}",
                            source.name, canonical, round, rounds, e
                        );
                    }
                }
            }

            if round < rounds {
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = self.clock.sleep(RETRY_BACKOFF) => {}
                }
            }
        }

        debug!("No flag found for {} after {} round(s)", canonical, rounds);
        None
    }

    /// Resolves a flag or builds the placeholder to show instead
    pub async fn resolve_or_fallback(
        &self,
        code: &str,
        options: &ResolveOptions,
        fallback: &FallbackOptions,
    ) -> FlagDisplay {
        match self.resolve(code, options).await {
            Some(url) => FlagDisplay::Image(url),
            None => FlagDisplay::Placeholder(generate_fallback(code, fallback)),
        }
    }

    /// One probe, raced against the timeout and the caller's cancellation
    async fn probe_source(
        &self,
        source: &FlagSource,
        code: &str,
        options: &ResolveOptions,
        cancel: &CancellationToken,
    ) -> Result<String, ProbeError> {
        let url = source.url_for(code);

        let probe = async {
            match source.check {
                CheckKind::Head => self.probe.head(&url).await.map(|_| url.clone()),
                CheckKind::Full => {
                    let body = self.probe.fetch_json(&url).await?;
                    pick_asset(&body, &options.prefer_format).ok_or(ProbeError::MissingAsset)
                }
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProbeError::Cancelled),
            result = probe => result,
            _ = self.clock.sleep(options.timeout) => Err(ProbeError::Timeout(options.timeout)),
        }
    }
}
