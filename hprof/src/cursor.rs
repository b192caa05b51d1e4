//! Big-endian byte cursor over a snapshot region.

use hql_core::{BasicType, Identifier, Primitive};

use crate::error::{DecodeError, DecodeResult};
use crate::record::RawValue;

/// Reads fixed-width values from a slice, tracking the absolute offset of
/// the slice within the whole snapshot for error reporting.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
    identifier_size: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
            identifier_size: 8,
        }
    }

    /// A cursor over a sub-slice that starts at `base` in the snapshot.
    pub fn with_base(bytes: &'a [u8], base: usize, identifier_size: usize) -> Self {
        Self {
            bytes,
            pos: 0,
            base,
            identifier_size,
        }
    }

    pub fn set_identifier_size(&mut self, size: usize) {
        self.identifier_size = size;
    }

    pub fn identifier_size(&self) -> usize {
        self.identifier_size
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute offset of the next byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::unexpected_eof(
                self.offset(),
                n,
                self.remaining(),
            ));
        }
        let bytes = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consume everything left in the slice.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.bytes[self.pos.min(self.bytes.len())..];
        self.pos = self.bytes.len();
        bytes
    }

    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_identifier(&mut self) -> DecodeResult<Identifier> {
        let bytes = self.read_bytes(self.identifier_size)?;
        // identifier_size is validated to 4 or 8 when the header is read
        Ok(Identifier::from_be_bytes(bytes).unwrap_or(Identifier::NULL))
    }

    pub fn skip_identifiers(&mut self, count: usize) -> DecodeResult<()> {
        self.skip(self.identifier_size * count)
    }

    pub fn read_basic_type(&mut self) -> DecodeResult<BasicType> {
        let offset = self.offset();
        let code = self.read_u8()?;
        BasicType::from_code(code).ok_or(DecodeError::unknown_basic_type(code, offset))
    }

    /// Read a primitive of a non-object type.
    pub fn read_primitive(&mut self, ty: BasicType) -> DecodeResult<Primitive> {
        Ok(match ty {
            BasicType::Boolean => Primitive::Bool(self.read_u8()? != 0),
            BasicType::Char => Primitive::Char(self.read_u16()?),
            BasicType::Float => Primitive::Float(f32::from_bits(self.read_u32()?)),
            BasicType::Double => Primitive::Double(f64::from_bits(self.read_u64()?)),
            BasicType::Byte => Primitive::Byte(self.read_u8()? as i8),
            BasicType::Short => Primitive::Short(self.read_u16()? as i16),
            BasicType::Int => Primitive::Int(self.read_u32()? as i32),
            BasicType::Long => Primitive::Long(self.read_u64()? as i64),
            BasicType::Object => {
                return Err(DecodeError::unknown_basic_type(ty.code(), self.offset()));
            }
        })
    }

    /// Read a value of any type.
    pub fn read_value(&mut self, ty: BasicType) -> DecodeResult<RawValue> {
        match ty {
            BasicType::Object => Ok(RawValue::Ref(self.read_identifier()?)),
            _ => Ok(RawValue::Primitive(self.read_primitive(ty)?)),
        }
    }

    /// Read a type byte followed by a value of that type.
    pub fn read_typed_value(&mut self) -> DecodeResult<RawValue> {
        let ty = self.read_basic_type()?;
        self.read_value(ty)
    }
}
