//! Append-only encoder buffer
//!
//! Satu `BinaryEncoder` per top-level encode. Semua write hanya append,
//! tidak ada seek dan tidak ada patching.

use super::primitive::{FixedWidth, FixedWidthInteger, BOOL_FALSE, BOOL_TRUE};
use super::temporal::Timestamp;
use super::BinaryEncode;
use crate::error::EncodeError;

/// Growable byte buffer used for exactly one encode operation.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    buffer: Vec<u8>,
}

impl BinaryEncoder {
    /// Membuat encoder kosong
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Membuat encoder dengan kapasitas awal
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encode any supported value through the type dispatcher.
    pub fn encode<T: BinaryEncode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.binary_encode(self)
    }

    /// Big-endian, tanpa type tag.
    #[inline(always)]
    pub fn encode_integer<I: FixedWidthInteger>(&mut self, value: I) {
        value.put_be(&mut self.buffer);
    }

    /// Native `isize` selalu ditulis sebagai i64.
    #[inline(always)]
    pub fn encode_native_int(&mut self, value: isize) {
        self.encode_integer(value as i64);
    }

    /// Native `usize` selalu ditulis sebagai u64.
    #[inline(always)]
    pub fn encode_native_uint(&mut self, value: usize) {
        self.encode_integer(value as u64);
    }

    #[inline(always)]
    pub fn encode_float(&mut self, value: f32) {
        value.put_be(&mut self.buffer);
    }

    #[inline(always)]
    pub fn encode_double(&mut self, value: f64) {
        value.put_be(&mut self.buffer);
    }

    #[inline(always)]
    pub fn encode_bool(&mut self, value: bool) {
        self.buffer.push(if value { BOOL_TRUE } else { BOOL_FALSE });
    }

    /// Writes the 8-byte element count that prefixes every array and string.
    #[inline(always)]
    pub fn encode_len(&mut self, len: usize) {
        self.encode_native_uint(len);
    }

    /// Length prefix, lalu setiap elemen via `encode_element`.
    ///
    /// The first element error aborts the whole array.
    pub fn encode_array<T, F>(&mut self, elements: &[T], mut encode_element: F) -> Result<(), EncodeError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), EncodeError>,
    {
        self.encode_len(elements.len());
        for element in elements {
            encode_element(self, element)?;
        }
        Ok(())
    }

    /// Byte array: length prefix + raw bytes.
    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        self.encode_len(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    /// UTF-8 bytes sebagai byte array.
    pub fn encode_str(&mut self, value: &str) {
        self.encode_bytes(value.as_bytes());
    }

    /// Offset dari reference epoch sebagai double.
    pub fn encode_timestamp(&mut self, value: Timestamp) {
        self.encode_double(value.reference_offset());
    }

    /// Get current buffer content
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Serahkan buffer ke caller. Encoder selesai dipakai.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
