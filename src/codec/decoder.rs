//! Read cursor over an immutable byte sequence
//!
//! Cursor hanya maju, tidak pernah mundur. Invariant: `0 <= pos <= len`.
//! Read yang gagal tidak menggeser cursor, tapi caller tetap harus
//! membuang decoder setelah error pertama.

use super::primitive::{FixedWidth, FixedWidthInteger, BOOL_FALSE, BOOL_TRUE};
use super::temporal::Timestamp;
use super::BinaryDecode;
use crate::error::DecodeError;

/// Maximum element count accepted from an array or string length prefix.
///
/// Counts at or above this are rejected before anything is allocated.
pub const MAX_ARRAY_LEN: usize = 50 * 1024 * 1024;

/// Zero-copy decoder untuk satu top-level decode.
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
    buffer: &'a [u8],
    read_pos: usize,
}

impl<'a> BinaryDecoder<'a> {
    /// Membuat decoder dari buffer
    #[inline(always)]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            read_pos: 0,
        }
    }

    /// Decode a value of the requested shape through the type dispatcher.
    pub fn decode<T: BinaryDecode>(&mut self) -> Result<T, DecodeError> {
        T::binary_decode(self)
    }

    /// Ambil tepat `len` byte dan majukan cursor.
    #[inline(always)]
    pub fn read(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .read_pos
            .checked_add(len)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(DecodeError::PrematureEndOfData)?;
        let bytes = &self.buffer[self.read_pos..end];
        self.read_pos = end;
        Ok(bytes)
    }

    #[inline(always)]
    fn read_fixed<T: FixedWidth>(&mut self) -> Result<T, DecodeError> {
        self.read(T::WIDTH).map(T::from_be_slice)
    }

    #[inline(always)]
    pub fn decode_integer<I: FixedWidthInteger>(&mut self) -> Result<I, DecodeError> {
        self.read_fixed()
    }

    /// Baca i64 lalu cek range terhadap `isize` host.
    pub fn decode_native_int(&mut self) -> Result<isize, DecodeError> {
        let v: i64 = self.decode_integer()?;
        isize::try_from(v).map_err(|_| DecodeError::IntegerOutOfRange(v))
    }

    /// Baca u64 lalu cek range terhadap `usize` host.
    pub fn decode_native_uint(&mut self) -> Result<usize, DecodeError> {
        let v: u64 = self.decode_integer()?;
        usize::try_from(v).map_err(|_| DecodeError::UIntegerOutOfRange(v))
    }

    #[inline(always)]
    pub fn decode_float(&mut self) -> Result<f32, DecodeError> {
        self.read_fixed()
    }

    #[inline(always)]
    pub fn decode_double(&mut self) -> Result<f64, DecodeError> {
        self.read_fixed()
    }

    pub fn decode_bool(&mut self) -> Result<bool, DecodeError> {
        match self.decode_integer::<u8>()? {
            BOOL_FALSE => Ok(false),
            BOOL_TRUE => Ok(true),
            other => Err(DecodeError::BoolOutOfRange(other)),
        }
    }

    /// Reads an array/string length prefix and enforces [`MAX_ARRAY_LEN`].
    pub fn decode_len(&mut self) -> Result<usize, DecodeError> {
        let raw: u64 = self.decode_integer()?;
        if raw >= MAX_ARRAY_LEN as u64 {
            return Err(DecodeError::PrematureEndOfData);
        }
        // below the cap, so it fits usize on every supported target
        Ok(raw as usize)
    }

    /// Length prefix, lalu `count` elemen via `decode_element`.
    ///
    /// Storage is reserved for at most the bytes still unread, so a hostile
    /// count below the cap still cannot force a large allocation.
    pub fn decode_array<T, F>(&mut self, mut decode_element: F) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&mut Self) -> Result<T, DecodeError>,
    {
        let count = self.decode_len()?;
        let mut elements = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            elements.push(decode_element(self)?);
        }
        Ok(elements)
    }

    /// Byte array tanpa copy: slice langsung ke input.
    pub fn decode_byte_slice(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.decode_len()?;
        self.read(len)
    }

    /// Borrowed string. Invalid UTF-8 carries the raw bytes; the cursor has
    /// already moved past them.
    pub fn decode_str(&mut self) -> Result<&'a str, DecodeError> {
        let bytes = self.decode_byte_slice()?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(bytes.to_vec()))
    }

    pub fn decode_string(&mut self) -> Result<String, DecodeError> {
        self.decode_str().map(str::to_owned)
    }

    /// Any failure reading the offset is reported as [`DecodeError::InvalidTimestamp`].
    pub fn decode_timestamp(&mut self) -> Result<Timestamp, DecodeError> {
        self.decode_double()
            .map(Timestamp::from_reference_offset)
            .map_err(|_| DecodeError::InvalidTimestamp)
    }

    /// Posisi cursor saat ini
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.read_pos
    }

    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.read_pos == self.buffer.len()
    }
}
