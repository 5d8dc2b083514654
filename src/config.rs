//! Cache configuration.

use std::path::PathBuf;

use tracing::warn;

/// Default slot key untuk price list terakhir.
pub const DEFAULT_PRICE_KEY: &str = "lastPrice";
/// Default slot key untuk auth response terakhir.
pub const DEFAULT_AUTH_KEY: &str = "lastAuth";
pub const DEFAULT_REFRESH_MINUTES: f64 = 15.0;
pub const DEFAULT_REFRESH_DELAY_SECONDS: f64 = 5.0;

/// Configuration for a [`PriceCache`](crate::cache::PriceCache).
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Directory holding the slot files.
    pub storage_dir: PathBuf,
    pub price_key: String,
    pub auth_key: String,
    /// Length of one price block in minutes. Must be finite and positive,
    /// otherwise [`normalized`](Self::normalized) restores the default.
    pub refresh_minutes: f64,
    /// Delay after a block boundary before refetching, in seconds.
    /// Must be finite.
    pub refresh_delay_seconds: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("voltcache"),
            price_key: DEFAULT_PRICE_KEY.to_string(),
            auth_key: DEFAULT_AUTH_KEY.to_string(),
            refresh_minutes: DEFAULT_REFRESH_MINUTES,
            refresh_delay_seconds: DEFAULT_REFRESH_DELAY_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Create a configuration storing slots under `storage_dir`.
    #[must_use]
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self { storage_dir: storage_dir.into(), ..Self::default() }
    }

    #[must_use]
    pub fn price_key(mut self, key: impl Into<String>) -> Self {
        self.price_key = key.into();
        self
    }

    #[must_use]
    pub fn auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = key.into();
        self
    }

    /// Set the price block length in minutes.
    #[must_use]
    pub fn refresh_minutes(mut self, minutes: f64) -> Self {
        self.refresh_minutes = minutes;
        self
    }

    #[must_use]
    pub fn refresh_delay_seconds(mut self, seconds: f64) -> Self {
        self.refresh_delay_seconds = seconds;
        self
    }

    /// Replace unusable refresh timing with the defaults.
    ///
    /// A zero, negative or non-finite block length would make every block
    /// boundary NaN.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !(self.refresh_minutes.is_finite() && self.refresh_minutes > 0.0) {
            warn!(
                refresh_minutes = self.refresh_minutes,
                "invalid refresh block length, using default"
            );
            self.refresh_minutes = DEFAULT_REFRESH_MINUTES;
        }
        if !self.refresh_delay_seconds.is_finite() {
            warn!(
                refresh_delay_seconds = self.refresh_delay_seconds,
                "invalid refresh delay, using default"
            );
            self.refresh_delay_seconds = DEFAULT_REFRESH_DELAY_SECONDS;
        }
        self
    }
}
