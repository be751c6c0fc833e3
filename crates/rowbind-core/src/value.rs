use crate::{Result, Type};

/// A single column value read from a cursor, or written into a target field.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 8-bit integer
    U8(u8),

    /// Unsigned 16-bit integer
    U16(u16),

    /// Unsigned 32-bit integer
    U32(u32),

    /// Unsigned 64-bit integer
    U64(u64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Raw byte blob
    Bytes(Vec<u8>),

    /// Value of an enumerated type, identified by variant name
    Enum(ValueEnum),
}

/// An enumerated value, carried by variant name.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEnum {
    pub variant: String,
}

impl ValueEnum {
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
        }
    }
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the value's runtime variant, used in diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::I8(_) => "I8",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::U8(_) => "U8",
            Self::U16(_) => "U16",
            Self::U32(_) => "U32",
            Self::U64(_) => "U64",
            Self::F32(_) => "F32",
            Self::F64(_) => "F64",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
            Self::Enum(_) => "Enum",
        }
    }

    /// The default value substituted when a null column maps to a
    /// non-nullable field. Enum and unknown types have no default.
    pub fn default_of(ty: Type) -> Option<Value> {
        Some(match ty {
            Type::Bool => Self::Bool(false),
            Type::I8 => Self::I8(0),
            Type::I16 => Self::I16(0),
            Type::I32 => Self::I32(0),
            Type::I64 => Self::I64(0),
            Type::U8 => Self::U8(0),
            Type::U16 => Self::U16(0),
            Type::U32 => Self::U32(0),
            Type::U64 => Self::U64(0),
            Type::F32 => Self::F32(0.0),
            Type::F64 => Self::F64(0.0),
            Type::String => Self::String(String::new()),
            Type::Bytes => Self::Bytes(Vec::new()),
            Type::Enum(_) | Type::Unknown => return None,
        })
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            _ => bail!("cannot convert {} to bool", self.tag_name()),
        }
    }

    pub fn to_i8(self) -> Result<i8> {
        match self {
            Self::I8(v) => Ok(v),
            _ => bail!("cannot convert {} to i8", self.tag_name()),
        }
    }

    pub fn to_i16(self) -> Result<i16> {
        match self {
            Self::I16(v) => Ok(v),
            _ => bail!("cannot convert {} to i16", self.tag_name()),
        }
    }

    pub fn to_i32(self) -> Result<i32> {
        match self {
            Self::I32(v) => Ok(v),
            _ => bail!("cannot convert {} to i32", self.tag_name()),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            _ => bail!("cannot convert {} to i64", self.tag_name()),
        }
    }

    pub fn to_u8(self) -> Result<u8> {
        match self {
            Self::U8(v) => Ok(v),
            _ => bail!("cannot convert {} to u8", self.tag_name()),
        }
    }

    pub fn to_u16(self) -> Result<u16> {
        match self {
            Self::U16(v) => Ok(v),
            _ => bail!("cannot convert {} to u16", self.tag_name()),
        }
    }

    pub fn to_u32(self) -> Result<u32> {
        match self {
            Self::U32(v) => Ok(v),
            _ => bail!("cannot convert {} to u32", self.tag_name()),
        }
    }

    pub fn to_u64(self) -> Result<u64> {
        match self {
            Self::U64(v) => Ok(v),
            _ => bail!("cannot convert {} to u64", self.tag_name()),
        }
    }

    pub fn to_f32(self) -> Result<f32> {
        match self {
            Self::F32(v) => Ok(v),
            _ => bail!("cannot convert {} to f32", self.tag_name()),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Self::F64(v) => Ok(v),
            _ => bail!("cannot convert {} to f64", self.tag_name()),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            _ => bail!("cannot convert {} to String", self.tag_name()),
        }
    }

    pub fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(v) => Ok(v),
            _ => bail!("cannot convert {} to Bytes", self.tag_name()),
        }
    }

    pub fn to_enum(self) -> Result<ValueEnum> {
        match self {
            Self::Enum(v) => Ok(v),
            _ => bail!("cannot convert {} to Enum", self.tag_name()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i8> for Value {
    fn from(src: i8) -> Self {
        Self::I8(src)
    }
}

impl From<i16> for Value {
    fn from(src: i16) -> Self {
        Self::I16(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<u8> for Value {
    fn from(src: u8) -> Self {
        Self::U8(src)
    }
}

impl From<u16> for Value {
    fn from(src: u16) -> Self {
        Self::U16(src)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Self {
        Self::U32(src)
    }
}

impl From<u64> for Value {
    fn from(src: u64) -> Self {
        Self::U64(src)
    }
}

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F32(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::I8(v) => serializer.serialize_i8(*v),
            Self::I16(v) => serializer.serialize_i16(*v),
            Self::I32(v) => serializer.serialize_i32(*v),
            Self::I64(v) => serializer.serialize_i64(*v),
            Self::U8(v) => serializer.serialize_u8(*v),
            Self::U16(v) => serializer.serialize_u16(*v),
            Self::U32(v) => serializer.serialize_u32(*v),
            Self::U64(v) => serializer.serialize_u64(*v),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Bytes(v) => serializer.serialize_bytes(v),
            Self::Enum(v) => serializer.serialize_str(&v.variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_default() {
        assert!(Value::default().is_null());
        assert!(Value::null().is_null());
    }

    #[test]
    fn typed_accessors() {
        assert_eq!(Value::I32(7).to_i32().unwrap(), 7);
        assert_eq!(Value::from("hi").to_string().unwrap(), "hi");
        assert!(Value::I32(7).to_string().is_err());
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::I64(1).as_str(), None);
    }

    #[test]
    fn defaults_for_non_nullable() {
        assert_eq!(Value::default_of(Type::I32), Some(Value::I32(0)));
        assert_eq!(
            Value::default_of(Type::String),
            Some(Value::String(String::new()))
        );
        assert_eq!(Value::default_of(Type::Unknown), None);
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(Some(3i64)), Value::I64(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
