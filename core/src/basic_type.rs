//! Field types and primitive values as encoded in heap snapshots.

use std::fmt;

/// Encoding of a field, static value or array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Object,
    Boolean,
    Char,
    Float,
    Double,
    Byte,
    Short,
    Int,
    Long,
}

impl BasicType {
    /// Decode a wire type code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(BasicType::Object),
            4 => Some(BasicType::Boolean),
            5 => Some(BasicType::Char),
            6 => Some(BasicType::Float),
            7 => Some(BasicType::Double),
            8 => Some(BasicType::Byte),
            9 => Some(BasicType::Short),
            10 => Some(BasicType::Int),
            11 => Some(BasicType::Long),
            _ => None,
        }
    }

    /// The wire type code.
    pub fn code(&self) -> u8 {
        match self {
            BasicType::Object => 2,
            BasicType::Boolean => 4,
            BasicType::Char => 5,
            BasicType::Float => 6,
            BasicType::Double => 7,
            BasicType::Byte => 8,
            BasicType::Short => 9,
            BasicType::Int => 10,
            BasicType::Long => 11,
        }
    }

    /// Encoded width in bytes. Object references use the snapshot's identifier size.
    pub fn size(&self, identifier_size: usize) -> usize {
        match self {
            BasicType::Object => identifier_size,
            BasicType::Boolean | BasicType::Byte => 1,
            BasicType::Char | BasicType::Short => 2,
            BasicType::Float | BasicType::Int => 4,
            BasicType::Double | BasicType::Long => 8,
        }
    }

    /// Java spelling of the type.
    pub fn name(&self) -> &'static str {
        match self {
            BasicType::Object => "object",
            BasicType::Boolean => "boolean",
            BasicType::Char => "char",
            BasicType::Float => "float",
            BasicType::Double => "double",
            BasicType::Byte => "byte",
            BasicType::Short => "short",
            BasicType::Int => "int",
            BasicType::Long => "long",
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded primitive value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Bool(bool),
    /// UTF-16 code unit.
    Char(u16),
    Float(f32),
    Double(f64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
}

impl Primitive {
    /// The type this value was decoded as.
    pub fn basic_type(&self) -> BasicType {
        match self {
            Primitive::Bool(_) => BasicType::Boolean,
            Primitive::Char(_) => BasicType::Char,
            Primitive::Float(_) => BasicType::Float,
            Primitive::Double(_) => BasicType::Double,
            Primitive::Byte(_) => BasicType::Byte,
            Primitive::Short(_) => BasicType::Short,
            Primitive::Int(_) => BasicType::Int,
            Primitive::Long(_) => BasicType::Long,
        }
    }

    /// Integral view of the value, if it has one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Primitive::Char(c) => Some(i64::from(*c)),
            Primitive::Byte(b) => Some(i64::from(*b)),
            Primitive::Short(s) => Some(i64::from(*s)),
            Primitive::Int(i) => Some(i64::from(*i)),
            Primitive::Long(l) => Some(*l),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(b) => write!(f, "{}", b),
            Primitive::Char(c) => match char::from_u32(u32::from(*c)) {
                Some(ch) => write!(f, "'{}'", ch),
                None => write!(f, "'\\u{:04x}'", c),
            },
            Primitive::Float(v) => write!(f, "{}", v),
            Primitive::Double(v) => write!(f, "{}", v),
            Primitive::Byte(v) => write!(f, "{}", v),
            Primitive::Short(v) => write!(f, "{}", v),
            Primitive::Int(v) => write!(f, "{}", v),
            Primitive::Long(v) => write!(f, "{}", v),
        }
    }
}
