//! Codec Layer: Positional Binary Encoding
//!
//! Prinsip desain:
//! - Tag-free: tidak ada magic, version, type tag, atau nama field di stream
//! - Positional: field record ditulis dan dibaca dalam urutan deklarasi
//! - Big-endian: semua multi-byte primitive dalam network order
//! - Bounded: length prefix dicek terhadap [`MAX_ARRAY_LEN`] sebelum alokasi
//!
//! Layout:
//! ```text
//! integer      big-endian, lebar = bit width / 8
//! usize/isize  8 byte big-endian (range-checked saat decode)
//! bool         1 byte, 0x00 | 0x01
//! f32 / f64    4 / 8 byte IEEE-754 big-endian
//! [T], String  u64 count, lalu elemen back-to-back
//! Timestamp    f64 detik sejak 2001-01-01T00:00:00Z
//! record       field-field berurutan, tanpa separator
//! ```
//!
//! Any `#[derive(Serialize, Deserialize)]` type is codec-ready through the
//! blanket [`BinaryEncode`] / [`BinaryDecode`] implementations. Changing the
//! order or number of fields of a persisted record silently breaks blobs
//! written by the previous layout.

mod de;
mod decoder;
mod encoder;
mod primitive;
mod ser;
mod temporal;


use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

pub use decoder::{BinaryDecoder, MAX_ARRAY_LEN};
pub use encoder::BinaryEncoder;
pub use primitive::{FixedWidth, FixedWidthInteger};
pub use temporal::{Timestamp, UNIX_TO_REFERENCE_SECS};

/// A value that can be written to a [`BinaryEncoder`].
///
/// Implemented once for every `Serialize` type.
pub trait BinaryEncode {
    fn binary_encode(&self, encoder: &mut BinaryEncoder) -> Result<(), EncodeError>;
}

impl<T: Serialize + ?Sized> BinaryEncode for T {
    #[inline]
    fn binary_encode(&self, encoder: &mut BinaryEncoder) -> Result<(), EncodeError> {
        self.serialize(encoder)
    }
}

/// A value that can be read back from a [`BinaryDecoder`].
///
/// Implemented once for every owned `Deserialize` type.
pub trait BinaryDecode: Sized {
    fn binary_decode(decoder: &mut BinaryDecoder<'_>) -> Result<Self, DecodeError>;
}

impl<T: DeserializeOwned> BinaryDecode for T {
    #[inline]
    fn binary_decode(decoder: &mut BinaryDecoder<'_>) -> Result<Self, DecodeError> {
        T::deserialize(decoder)
    }
}

/// Both directions, for records that are persisted and read back.
pub trait BinaryCodec: BinaryEncode + BinaryDecode {}

impl<T: BinaryEncode + BinaryDecode> BinaryCodec for T {}

/// Encode `value` into a freshly allocated byte vector.
pub fn encode<T: BinaryEncode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = BinaryEncoder::new();
    value.binary_encode(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Decode a `T` from the start of `bytes`.
///
/// Bytes beyond the requested shape are ignored.
pub fn decode<T: BinaryDecode>(bytes: &[u8]) -> Result<T, DecodeError> {
    BinaryDecoder::new(bytes).decode()
}

/// Like [`decode`], but `&str` and `&[u8]` fields borrow from `bytes`.
pub fn decode_borrowed<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T, DecodeError> {
    T::deserialize(&mut BinaryDecoder::new(bytes))
}
