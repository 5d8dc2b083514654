//! Type dispatcher (encode side): `serde::Serializer` untuk `BinaryEncoder`.
//!
//! Record ditulis field demi field sesuai urutan deklarasi, tanpa nama,
//! tanpa index, tanpa type tag. Shape yang tidak punya representasi
//! positional (map, enum, Option, char) ditolak.

use serde::ser::{self, Impossible, Serialize};

use super::encoder::BinaryEncoder;
use crate::error::EncodeError;

impl<'a> ser::Serializer for &'a mut BinaryEncoder {
    type Ok = ();
    type Error = EncodeError;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeStruct = Self;
    type SerializeTupleVariant = Impossible<(), EncodeError>;
    type SerializeMap = Impossible<(), EncodeError>;
    type SerializeStructVariant = Impossible<(), EncodeError>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<(), EncodeError> {
        self.encode_bool(v);
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_i16(self, v: i16) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_i32(self, v: i32) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    // isize arrives here too.
    fn serialize_i64(self, v: i64) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_u16(self, v: u16) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_u32(self, v: u32) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    // usize arrives here too.
    fn serialize_u64(self, v: u64) -> Result<(), EncodeError> {
        self.encode_integer(v);
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<(), EncodeError> {
        self.encode_float(v);
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result<(), EncodeError> {
        self.encode_double(v);
        Ok(())
    }

    fn serialize_char(self, _v: char) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("char"))
    }

    fn serialize_str(self, v: &str) -> Result<(), EncodeError> {
        self.encode_str(v);
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), EncodeError> {
        self.encode_bytes(v);
        Ok(())
    }

    fn serialize_none(self) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("Option"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("Option"))
    }

    fn serialize_unit(self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), EncodeError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("enum"))
    }

    // Timestamp lewat sini juga: payload-nya cukup f64 offset.
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("enum"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        let len = len.ok_or(EncodeError::UnsupportedEncodableType(
            "sequence without a known length",
        ))?;
        self.encode_len(len);
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(EncodeError::UnsupportedEncodableType("enum"))
    }
}

impl<'a> ser::SerializeSeq for &'a mut BinaryEncoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for &'a mut BinaryEncoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut BinaryEncoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for &'a mut BinaryEncoder {
    type Ok = ();
    type Error = EncodeError;

    // Nama field dibuang, hanya urutan yang penting.
    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        value.serialize(&mut **self)
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;

    use crate::codec::encode;
    use crate::error::EncodeError;

    #[derive(Serialize)]
    struct Point {
        x: i16,
        y: i16,
    }

    #[derive(Serialize)]
    enum Direction {
        North,
    }

    #[test]
    fn test_struct_is_positional() {
        let bytes = encode(&Point { x: 1, y: -1 }).unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0xFF, 0xFF]);
    }

    #[test]
    fn test_tuple_has_no_prefix() {
        let bytes = encode(&(1u8, true, [2u8, 3u8])).unwrap();
        assert_eq!(bytes, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_unit_is_empty() {
        assert!(encode(&()).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_shapes() {
        assert_eq!(encode(&'x'), Err(EncodeError::UnsupportedEncodableType("char")));
        assert_eq!(encode(&Some(1u8)), Err(EncodeError::UnsupportedEncodableType("Option")));
        assert_eq!(
            encode(&Direction::North),
            Err(EncodeError::UnsupportedEncodableType("enum"))
        );
        let map: HashMap<String, u8> = HashMap::new();
        assert_eq!(encode(&map), Err(EncodeError::UnsupportedEncodableType("map")));
        assert_eq!(encode(&1u128), Err(EncodeError::UnsupportedEncodableType("u128")));
    }

    #[test]
    fn test_nested_field_error_aborts() {
        #[derive(Serialize)]
        struct Holder {
            ok: u8,
            bad: char,
        }
        let result = encode(&Holder { ok: 1, bad: 'z' });
        assert_eq!(result, Err(EncodeError::UnsupportedEncodableType("char")));
    }
}
