//! VoltCache - Positional Binary Codec + Last-Known Price Cache
//!
//! Arsitektur:
//! - Codec: tag-free, big-endian, positional encoding lewat serde
//! - Store: satu mmap-backed slot file per key, replace via rename
//! - Cache: price list dan auth terakhir, siap sebelum network menjawab
//!
//! ```no_run
//! use voltcache::{CacheConfig, MmapSlotStore, PriceCache, Timestamp};
//!
//! let config = CacheConfig::new("/var/lib/voltcache");
//! let store = MmapSlotStore::open(&config.storage_dir)?;
//! let cache = PriceCache::open(store, config);
//!
//! if let Some(prices) = cache.fresh_prices(Timestamp::now()) {
//!     println!("current price: {} c/kWh", prices.data.current_price_kwh);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use cache::{CacheSource, PriceCache};
pub use codec::{
    decode, decode_borrowed, encode, BinaryCodec, BinaryDecode, BinaryDecoder, BinaryEncode,
    BinaryEncoder, Timestamp, MAX_ARRAY_LEN,
};
pub use config::CacheConfig;
pub use error::{CacheError, DecodeError, EncodeError};
pub use model::{AuthData, AuthPersonalData, CurrentPriceData, Price, PriceData, PriceLevel};
pub use store::{MemorySlotStore, MmapSlotStore, SlotStore};
