//! flagmap - resolves country flag images from multiple sources
//!
//! - Normalizes non-standard country codes to ISO 3166-1 alpha-2
//! - Probes CDN and API sources in priority order with timeouts and retry rounds
//! - Caches results (including confirmed absences) for 24 hours
//! - Generates placeholder descriptors when no flag is available

pub mod cache;
pub mod clock;
pub mod config;
pub mod fallback;
pub mod normalize;
pub mod probe;
pub mod resolver;
pub mod sources;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStats, EntryStat, FlagCache, FRESHNESS_WINDOW};
pub use clock::{Clock, TokioClock};
pub use config::{AppConfig, ConfigError};
pub use fallback::{generate_fallback, FallbackDescriptor, FallbackOptions, IconSize, Theme};
pub use normalize::{normalize, normalize_code};
pub use probe::{FlagProbe, HttpProbe, ProbeError};
pub use resolver::{FlagDisplay, FlagResolver, ResolveOptions, RETRY_BACKOFF};
pub use sources::{default_sources, CheckKind, FlagSource};
