//! Last-known response cache
//!
//! Flow:
//! 1. `open` -> baca slot price dan auth, decode; gagal = tidak ada cache
//! 2. Fetch network berhasil -> `replace_*` -> update memory, encode, store
//! 3. UI membaca `fresh_prices(now)` sebelum network sempat menjawab
//!
//! Decode error tidak pernah dipropagasi keluar dari cache: blob yang rusak
//! atau dari layout lama diperlakukan sama seperti slot kosong.

use std::fmt;

use tracing::{debug, info, warn};

use crate::codec::{decode, encode, BinaryDecode, Timestamp};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::model::{AuthData, CurrentPriceData};
use crate::store::SlotStore;

/// Asal record yang sedang dipegang cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSource {
    /// Set by a successful fetch in this process.
    Network,
    /// Loaded from the slot store on open.
    Cache,
}

impl fmt::Display for CacheSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network"),
            Self::Cache => f.write_str("cache"),
        }
    }
}

/// Holds at most one price record and one auth record, mirrored to a
/// [`SlotStore`].
#[derive(Debug)]
pub struct PriceCache<S: SlotStore> {
    store: S,
    config: CacheConfig,
    prices: Option<(CurrentPriceData, CacheSource)>,
    auth: Option<(AuthData, CacheSource)>,
}

impl<S: SlotStore> PriceCache<S> {
    /// Load both slots from `store`. Never fails: unusable slots are logged
    /// and treated as empty, and unusable refresh timing in `config` falls
    /// back to the defaults.
    pub fn open(store: S, config: CacheConfig) -> Self {
        let config = config.normalized();
        let prices = load_slot::<S, CurrentPriceData>(&store, &config.price_key);
        let auth = load_slot::<S, AuthData>(&store, &config.auth_key);
        info!(
            prices = prices.is_some(),
            auth = auth.is_some(),
            "price cache opened"
        );
        Self {
            store,
            config,
            prices: prices.map(|p| (p, CacheSource::Cache)),
            auth: auth.map(|a| (a, CacheSource::Cache)),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[inline]
    pub fn prices(&self) -> Option<&CurrentPriceData> {
        self.prices.as_ref().map(|(p, _)| p)
    }

    #[inline]
    pub fn auth(&self) -> Option<&AuthData> {
        self.auth.as_ref().map(|(a, _)| a)
    }

    pub fn prices_source(&self) -> Option<CacheSource> {
        self.prices.as_ref().map(|(_, source)| *source)
    }

    pub fn auth_source(&self) -> Option<CacheSource> {
        self.auth.as_ref().map(|(_, source)| *source)
    }

    /// Replace the price record and persist it under the price key.
    ///
    /// The in-memory record is updated even if persisting fails.
    pub fn replace_prices(&mut self, record: CurrentPriceData) -> Result<()> {
        let record = &self.prices.insert((record, CacheSource::Network)).0;
        let bytes = encode(record)?;
        self.store.store(&self.config.price_key, &bytes)?;
        debug!(key = %self.config.price_key, bytes = bytes.len(), "prices cached");
        Ok(())
    }

    /// Replace the auth record and persist it under the auth key.
    ///
    /// Responses that did not report success are rejected and leave the
    /// cache untouched.
    pub fn replace_auth(&mut self, record: AuthData) -> Result<()> {
        if !record.is_success() {
            warn!(
                service_response_type = record.service_response_type,
                "auth response not cached"
            );
            return Err(CacheError::AuthRejected(record.service_response_type));
        }
        let record = &self.auth.insert((record, CacheSource::Network)).0;
        let bytes = encode(record)?;
        self.store.store(&self.config.auth_key, &bytes)?;
        debug!(key = %self.config.auth_key, bytes = bytes.len(), "auth cached");
        Ok(())
    }

    /// Cached prices, but only while `now` is still inside the block the
    /// current price belongs to.
    pub fn fresh_prices(&self, now: Timestamp) -> Option<&CurrentPriceData> {
        let prices = self.prices()?;
        let block_end = prices
            .data
            .current_price_period
            .next_minutes(self.config.refresh_minutes, 0.0);
        (block_end > now).then_some(prices)
    }

    /// When the next fetch should happen: the next block boundary after
    /// `now`, plus the configured delay.
    pub fn next_refresh(&self, now: Timestamp) -> Timestamp {
        now.next_minutes(
            self.config.refresh_minutes,
            self.config.refresh_delay_seconds,
        )
    }

    /// Drop both records and remove both slots.
    pub fn clear(&mut self) -> Result<()> {
        self.prices = None;
        self.auth = None;
        self.store.remove(&self.config.price_key)?;
        self.store.remove(&self.config.auth_key)?;
        debug!("price cache cleared");
        Ok(())
    }
}

fn load_slot<S: SlotStore, T: BinaryDecode>(store: &S, key: &str) -> Option<T> {
    let bytes = match store.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!(key, "no cached slot");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read cached slot");
            return None;
        }
    };
    match decode::<T>(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, bytes = bytes.len(), "discarding undecodable cached slot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthPersonalData, Price, PriceData};
    use crate::store::MemorySlotStore;

    // 2019-09-09T09:30:00Z
    const PERIOD: f64 = 589_714_200.0;

    fn sample_prices() -> CurrentPriceData {
        CurrentPriceData {
            data: PriceData {
                current_price_kwh: 21.5,
                current_renewable_in_grid: 38.0,
                current_price_color: "yellow".to_string(),
                current_price_period: Timestamp::from_reference_offset(PERIOD),
                forecast_prices: vec![Price {
                    period: Timestamp::from_reference_offset(PERIOD + 1800.0),
                    price_kwh: 18.0,
                    renewable_in_grid: 45.0,
                    color: "green".to_string(),
                }],
                previous_prices: vec![],
            },
            service_response_type: 1,
            message: None,
        }
    }

    fn sample_auth(service_response_type: i64) -> AuthData {
        AuthData {
            data: AuthPersonalData {
                name: "Alex".to_string(),
                postcode: "3000".to_string(),
                email: "alex@example.com".to_string(),
                id_token: "id-token".to_string(),
                refresh_token: "refresh-token".to_string(),
            },
            service_response_type,
            message: None,
        }
    }

    #[test]
    fn test_open_empty() {
        let cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        assert!(cache.prices().is_none());
        assert!(cache.auth().is_none());
        assert_eq!(cache.prices_source(), None);
    }

    #[test]
    fn test_replace_then_reopen() {
        let mut cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        cache.replace_prices(sample_prices()).unwrap();
        cache.replace_auth(sample_auth(1)).unwrap();
        assert_eq!(cache.prices_source(), Some(CacheSource::Network));

        let store = cache.into_store();
        assert!(store.load("lastPrice").unwrap().is_some());

        let reopened = PriceCache::open(store, CacheConfig::default());
        assert_eq!(reopened.prices(), Some(&sample_prices()));
        assert_eq!(reopened.auth(), Some(&sample_auth(1)));
        assert_eq!(reopened.prices_source(), Some(CacheSource::Cache));
        assert_eq!(reopened.auth_source(), Some(CacheSource::Cache));
    }

    #[test]
    fn test_corrupt_slot_is_empty() {
        let mut store = MemorySlotStore::new();
        store.store("lastPrice", &[0xFF; 8]).unwrap();
        store.store("lastAuth", &[]).unwrap();

        let cache = PriceCache::open(store, CacheConfig::default());
        assert!(cache.prices().is_none());
        assert!(cache.auth().is_none());
    }

    #[test]
    fn test_rejected_auth_is_not_cached() {
        let mut cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        let err = cache.replace_auth(sample_auth(2)).unwrap_err();
        assert!(matches!(err, CacheError::AuthRejected(2)));
        assert!(cache.auth().is_none());
        assert!(cache.store().load("lastAuth").unwrap().is_none());
    }

    #[test]
    fn test_fresh_prices_window() {
        let mut cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        cache.replace_prices(sample_prices()).unwrap();

        // PERIOD sits on a 15 minute boundary, so the block ends 900s later
        let inside = Timestamp::from_reference_offset(PERIOD + 899.0);
        let boundary = Timestamp::from_reference_offset(PERIOD + 900.0);
        assert!(cache.fresh_prices(inside).is_some());
        assert!(cache.fresh_prices(boundary).is_none());
    }

    #[test]
    fn test_next_refresh() {
        let cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        let now = Timestamp::from_reference_offset(PERIOD + 60.0);
        let next = cache.next_refresh(now);
        assert_eq!(next.reference_offset(), PERIOD + 900.0 + 5.0);
    }

    #[test]
    fn test_sample_period_is_on_block_boundary() {
        let period = Timestamp::from_reference_offset(PERIOD);
        assert_eq!(period.to_string(), "2019-09-09T09:30:00.000Z");
        assert_eq!(PERIOD % 900.0, 0.0);
    }

    #[test]
    fn test_zero_block_length_falls_back_to_default() {
        let config = CacheConfig::default().refresh_minutes(0.0);
        let mut cache = PriceCache::open(MemorySlotStore::new(), config);
        assert_eq!(cache.config().refresh_minutes, 15.0);

        cache.replace_prices(sample_prices()).unwrap();
        let inside = Timestamp::from_reference_offset(PERIOD + 60.0);
        assert!(cache.fresh_prices(inside).is_some());
        assert_eq!(
            cache.next_refresh(inside).reference_offset(),
            PERIOD + 900.0 + 5.0
        );
    }

    #[test]
    fn test_clear() {
        let mut cache = PriceCache::open(MemorySlotStore::new(), CacheConfig::default());
        cache.replace_prices(sample_prices()).unwrap();
        cache.replace_auth(sample_auth(1)).unwrap();

        cache.clear().unwrap();
        assert!(cache.prices().is_none());
        assert!(cache.auth().is_none());
        assert!(cache.store().is_empty());
    }

    #[test]
    fn test_custom_keys() {
        let config = CacheConfig::default().price_key("prices").auth_key("auth");
        let mut cache = PriceCache::open(MemorySlotStore::new(), config);
        cache.replace_prices(sample_prices()).unwrap();
        assert!(cache.store().load("prices").unwrap().is_some());
        assert!(cache.store().load("lastPrice").unwrap().is_none());
    }
}
