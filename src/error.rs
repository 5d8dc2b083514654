//! Error types untuk codec dan cache layer.
//!
//! Semua kegagalan leaf langsung membatalkan seluruh operasi encode/decode.
//! Tidak ada partial result dan tidak ada resynchronization.

use std::fmt::Display;
use std::io;

use serde::de::{self, Unexpected};
use serde::ser;
use thiserror::Error;

/// Errors raised while encoding a value.
///
/// These indicate the codec was handed a shape it cannot express, which is a
/// programming error rather than a runtime condition worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The value (or one of its fields) has a shape the format has no encoding for.
    #[error("unsupported encodable type: {0}")]
    UnsupportedEncodableType(&'static str),

    /// Raised by a type's own `Serialize` implementation.
    #[error("encode error: {0}")]
    Custom(String),
}

/// Errors raised while decoding a byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ran out before the requested shape was complete, or an array
    /// length prefix exceeded the safety cap.
    #[error("premature end of data")]
    PrematureEndOfData,

    /// The requested shape cannot be decoded from a tag-free stream.
    #[error("unsupported decodable type: {0}")]
    UnsupportedDecodableType(&'static str),

    /// A stored 64-bit signed value does not fit the host's native `isize`.
    #[error("integer out of range: {0}")]
    IntegerOutOfRange(i64),

    /// A stored 64-bit unsigned value does not fit the host's native `usize`.
    #[error("unsigned integer out of range: {0}")]
    UIntegerOutOfRange(u64),

    /// A boolean byte was neither `0` nor `1`.
    #[error("bool out of range: {0}")]
    BoolOutOfRange(u8),

    /// A string payload was not well-formed UTF-8. Carries the raw bytes.
    #[error("invalid UTF-8 ({} bytes)", .0.len())]
    InvalidUtf8(Vec<u8>),

    /// The timestamp offset could not be read.
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// Raised by a type's own `Deserialize` implementation.
    #[error("decode error: {0}")]
    Custom(String),
}

impl ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

impl de::Error for DecodeError {
    fn custom<T: Display>(msg: T) -> Self {
        DecodeError::Custom(msg.to_string())
    }

    // serde's usize/isize visitors report a lossy 64-bit value through here.
    fn invalid_value(unexp: Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        match unexp {
            Unexpected::Signed(v) => DecodeError::IntegerOutOfRange(v),
            Unexpected::Unsigned(v) => DecodeError::UIntegerOutOfRange(v),
            other => DecodeError::Custom(format!("invalid value: {}, expected {}", other, exp)),
        }
    }
}

/// Errors surfaced by [`PriceCache`](crate::cache::PriceCache) mutations.
///
/// Load-side failures never show up here: an unreadable slot is an empty slot.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The slot store failed to persist or remove a blob.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The auth response did not report success and was not cached.
    #[error("auth response rejected (service response type {0})")]
    AuthRejected(i64),
}

/// Result type alias for cache mutations.
pub type Result<T> = std::result::Result<T, CacheError>;
