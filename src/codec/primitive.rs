//! Primitive Codec: fixed-width integers dan IEEE-754 floats.
//!
//! Semua multi-byte primitive ditulis big-endian (network order),
//! independen dari endianness host. Float ditulis sebagai bit pattern,
//! jadi NaN payload dan signed zero tetap utuh.

mod sealed {
    pub trait Sealed {}
}

/// A primitive with a fixed on-wire width and canonical big-endian layout.
///
/// Sealed: the set of primitives is part of the format.
pub trait FixedWidth: Copy + sealed::Sealed {
    /// Jumlah byte di stream.
    const WIDTH: usize;

    /// Append big-endian bytes ke buffer.
    fn put_be(self, buf: &mut Vec<u8>);

    /// Read from exactly [`Self::WIDTH`] big-endian bytes.
    ///
    /// # Panics
    /// Panic jika `bytes.len() != Self::WIDTH`. The decoder always slices
    /// exactly `WIDTH` bytes before calling this.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

/// Marker for the fixed-width integer subset of [`FixedWidth`].
pub trait FixedWidthInteger: FixedWidth {}

macro_rules! impl_fixed_width {
    ($($t:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl FixedWidth for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();

            #[inline(always)]
            fn put_be(self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_be_bytes());
            }

            #[inline(always)]
            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_be_bytes(raw)
            }
        }
    )*};
}

impl_fixed_width!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl FixedWidthInteger for u8 {}
impl FixedWidthInteger for i8 {}
impl FixedWidthInteger for u16 {}
impl FixedWidthInteger for i16 {}
impl FixedWidthInteger for u32 {}
impl FixedWidthInteger for i32 {}
impl FixedWidthInteger for u64 {}
impl FixedWidthInteger for i64 {}

/// Byte written for `true`.
pub const BOOL_TRUE: u8 = 1;
/// Byte written for `false`.
pub const BOOL_FALSE: u8 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded<T: FixedWidth>(v: T) -> Vec<u8> {
        let mut buf = Vec::new();
        v.put_be(&mut buf);
        buf
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(<u8 as FixedWidth>::WIDTH, 1);
        assert_eq!(<i16 as FixedWidth>::WIDTH, 2);
        assert_eq!(<u32 as FixedWidth>::WIDTH, 4);
        assert_eq!(<i64 as FixedWidth>::WIDTH, 8);
        assert_eq!(<f32 as FixedWidth>::WIDTH, 4);
        assert_eq!(<f64 as FixedWidth>::WIDTH, 8);
    }

    #[test]
    fn test_big_endian_layout() {
        assert_eq!(encoded(0x0102_0304u32), vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(encoded(-2i16), vec![0xFF, 0xFE]);
        assert_eq!(encoded(1u64), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_float_canonical_order() {
        // 1.0f32 = 0x3F800000
        assert_eq!(encoded(1.0f32), vec![0x3F, 0x80, 0x00, 0x00]);
        // 1.0f64 = 0x3FF0000000000000
        assert_eq!(encoded(1.0f64), vec![0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_float_bit_pattern_preserved() {
        let neg_zero = encoded(-0.0f64);
        let back = f64::from_be_slice(&neg_zero);
        assert!(back.is_sign_negative());
        assert_eq!(back.to_bits(), (-0.0f64).to_bits());

        let nan = f32::from_bits(0x7FC0_0123);
        assert_eq!(f32::from_be_slice(&encoded(nan)).to_bits(), 0x7FC0_0123);
    }
}
