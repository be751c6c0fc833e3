use std::fmt;

/// The declared type of a column or a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 8-bit integer
    I8,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Unsigned 8-bit integer
    U8,

    /// Unsigned 16-bit integer
    U16,

    /// Unsigned 32-bit integer
    U32,

    /// Unsigned 64-bit integer
    U64,

    /// 32-bit floating point
    F32,

    /// 64-bit floating point
    F64,

    /// String value
    String,

    /// Raw byte blob
    Bytes,

    /// An enumerated type, converted from strings by variant name
    Enum(&'static EnumTag),

    /// The source did not declare a type for the column.
    ///
    /// Dynamically typed cursors (e.g. over SQLite-style storage) report
    /// this; conversion is then decided per row from the runtime value.
    Unknown,
}

/// Identifies an enumerated field type and the variant names it accepts.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumTag {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumTag {
    /// Returns `true` if `variant` names one of the tag's variants.
    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| *v == variant)
    }
}

impl Type {
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::I8 => f.write_str("I8"),
            Self::I16 => f.write_str("I16"),
            Self::I32 => f.write_str("I32"),
            Self::I64 => f.write_str("I64"),
            Self::U8 => f.write_str("U8"),
            Self::U16 => f.write_str("U16"),
            Self::U32 => f.write_str("U32"),
            Self::U64 => f.write_str("U64"),
            Self::F32 => f.write_str("F32"),
            Self::F64 => f.write_str("F64"),
            Self::String => f.write_str("String"),
            Self::Bytes => f.write_str("Bytes"),
            Self::Enum(tag) => write!(f, "Enum({})", tag.name),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(Type::I8.is_integer());
        assert!(Type::U64.is_integer());
        assert!(Type::F32.is_float());
        assert!(Type::F64.is_numeric());
        assert!(!Type::String.is_numeric());
        assert!(Type::Unknown.is_unknown());
    }

    #[test]
    fn enum_tag_variants() {
        static STATUS: EnumTag = EnumTag {
            name: "status",
            variants: &["active", "closed"],
        };

        assert!(STATUS.has_variant("active"));
        assert!(!STATUS.has_variant("archived"));
        assert_eq!(Type::Enum(&STATUS).to_string(), "Enum(status)");
    }
}
