use super::{Instr, MapPlan};

use rowbind_core::{value::ValueEnum, Error, Result, Type, Value};

/// Conversion op selected at compile time for one instruction.
///
/// Everything value-independent is decided here; the ops themselves only
/// perform value-dependent checks (overflow, parse failures, unknown enum
/// variants) at row time.
#[derive(Debug, Clone, Copy)]
pub(super) enum Convert {
    /// Source and destination types match.
    Identity,

    /// Checked numeric conversion; overflow, precision loss and fractional
    /// values narrowed to integers are row-time errors.
    Numeric,

    /// Parse a string column into a numeric field.
    Parse,

    /// Convert a string column into an enum field by variant name.
    EnumByName,

    /// The source declared no type; pick the op per row from the runtime
    /// value.
    Dynamic,
}

impl Convert {
    /// Picks a conversion op, or `None` when the type pair is statically
    /// inconvertible.
    pub(super) fn choose(src: Type, dst: Type) -> Option<Convert> {
        if src.is_unknown() {
            return Some(Convert::Dynamic);
        }
        if src == dst {
            return Some(Convert::Identity);
        }
        if src.is_numeric() && dst.is_numeric() {
            return Some(Convert::Numeric);
        }
        match (src, dst) {
            (Type::String, dst) if dst.is_numeric() => Some(Convert::Parse),
            (Type::String, Type::Enum(_)) => Some(Convert::EnumByName),
            _ => None,
        }
    }
}

impl MapPlan {
    /// Applies an instruction's conversion to a raw column value.
    pub(super) fn convert(&self, instr: &Instr, raw: Value) -> Result<Value> {
        let field = self.target.field(instr.field);

        // Database nulls are handled ahead of the op: nullable fields take
        // the null, non-nullable fields take the type's default value.
        if raw.is_null() {
            if field.nullable {
                return Ok(Value::Null);
            }
            return Value::default_of(field.ty).ok_or_else(|| self.mismatch(instr, "Null"));
        }

        self.convert_op(instr.op, instr, raw, field.ty)
    }

    fn convert_op(&self, op: Convert, instr: &Instr, raw: Value, dst: Type) -> Result<Value> {
        match op {
            Convert::Identity => Ok(raw),
            Convert::Numeric => self.numeric(instr, raw, dst),
            Convert::Parse => self.parse(instr, raw, dst),
            Convert::EnumByName => self.enum_by_name(instr, raw, dst),
            Convert::Dynamic => self.dynamic(instr, raw, dst),
        }
    }

    fn numeric(&self, instr: &Instr, raw: Value, dst: Type) -> Result<Value> {
        if let Some(int) = value_to_i128(&raw) {
            return int_to_value(int, dst).ok_or_else(|| self.mismatch(instr, raw.tag_name()));
        }
        if let Some(float) = value_to_f64(&raw) {
            return float_to_value(float, dst).ok_or_else(|| self.mismatch(instr, raw.tag_name()));
        }
        Err(self.mismatch(instr, raw.tag_name()))
    }

    fn parse(&self, instr: &Instr, raw: Value, dst: Type) -> Result<Value> {
        let Some(text) = raw.as_str() else {
            return Err(self.mismatch(instr, raw.tag_name()));
        };
        let text = text.trim();

        let parsed = if dst.is_integer() {
            text.parse::<i128>().ok().and_then(|int| int_to_value(int, dst))
        } else {
            text.parse::<f64>().ok().and_then(|float| float_to_value(float, dst))
        };

        parsed.ok_or_else(|| self.mismatch(instr, format_args!("String(\"{text}\")")))
    }

    fn enum_by_name(&self, instr: &Instr, raw: Value, dst: Type) -> Result<Value> {
        let Type::Enum(tag) = dst else {
            return Err(self.mismatch(instr, raw.tag_name()));
        };
        let Some(variant) = raw.as_str() else {
            return Err(self.mismatch(instr, raw.tag_name()));
        };
        if !tag.has_variant(variant) {
            return Err(self.mismatch(instr, format_args!("String(\"{variant}\")")));
        }
        Ok(Value::Enum(ValueEnum::new(variant)))
    }

    /// Runtime dispatch for untyped sources: the runtime value's tag drives
    /// the same policy compile time would have applied.
    fn dynamic(&self, instr: &Instr, raw: Value, dst: Type) -> Result<Value> {
        if let (Value::Enum(value), Type::Enum(tag)) = (&raw, dst) {
            if tag.has_variant(&value.variant) {
                return Ok(raw);
            }
            return Err(self.mismatch(instr, format_args!("Enum(\"{}\")", value.variant)));
        }

        let src = match runtime_type(&raw) {
            Some(src) => src,
            None => return Err(self.mismatch(instr, raw.tag_name())),
        };
        match Convert::choose(src, dst) {
            Some(Convert::Dynamic) | None => Err(self.mismatch(instr, raw.tag_name())),
            Some(op) => self.convert_op(op, instr, raw, dst),
        }
    }

    fn mismatch(&self, instr: &Instr, source: impl core::fmt::Display) -> Error {
        Error::type_mismatch(
            self.fingerprint.column_name(instr.column),
            source,
            self.target.member_name(instr.field),
            self.target.field(instr.field).ty,
        )
    }
}

fn runtime_type(value: &Value) -> Option<Type> {
    Some(match value {
        Value::Bool(_) => Type::Bool,
        Value::I8(_) => Type::I8,
        Value::I16(_) => Type::I16,
        Value::I32(_) => Type::I32,
        Value::I64(_) => Type::I64,
        Value::U8(_) => Type::U8,
        Value::U16(_) => Type::U16,
        Value::U32(_) => Type::U32,
        Value::U64(_) => Type::U64,
        Value::F32(_) => Type::F32,
        Value::F64(_) => Type::F64,
        Value::String(_) => Type::String,
        Value::Bytes(_) => Type::Bytes,
        Value::Null | Value::Enum(_) => return None,
    })
}

fn value_to_i128(value: &Value) -> Option<i128> {
    Some(match value {
        Value::I8(v) => *v as i128,
        Value::I16(v) => *v as i128,
        Value::I32(v) => *v as i128,
        Value::I64(v) => *v as i128,
        Value::U8(v) => *v as i128,
        Value::U16(v) => *v as i128,
        Value::U32(v) => *v as i128,
        Value::U64(v) => *v as i128,
        _ => return None,
    })
}

fn value_to_f64(value: &Value) -> Option<f64> {
    Some(match value {
        Value::F32(v) => *v as f64,
        Value::F64(v) => *v,
        _ => return None,
    })
}

fn int_to_value(int: i128, dst: Type) -> Option<Value> {
    Some(match dst {
        Type::I8 => Value::I8(i8::try_from(int).ok()?),
        Type::I16 => Value::I16(i16::try_from(int).ok()?),
        Type::I32 => Value::I32(i32::try_from(int).ok()?),
        Type::I64 => Value::I64(i64::try_from(int).ok()?),
        Type::U8 => Value::U8(u8::try_from(int).ok()?),
        Type::U16 => Value::U16(u16::try_from(int).ok()?),
        Type::U32 => Value::U32(u32::try_from(int).ok()?),
        Type::U64 => Value::U64(u64::try_from(int).ok()?),
        Type::F32 => Value::F32(int as f32),
        Type::F64 => Value::F64(int as f64),
        _ => return None,
    })
}

fn float_to_value(float: f64, dst: Type) -> Option<Value> {
    match dst {
        Type::F64 => Some(Value::F64(float)),
        Type::F32 => {
            let narrowed = float as f32;
            // Narrowing a finite value into infinity is an overflow.
            if float.is_finite() && narrowed.is_infinite() {
                return None;
            }
            Some(Value::F32(narrowed))
        }
        _ if dst.is_integer() => {
            if !float.is_finite() || float.fract() != 0.0 {
                return None;
            }
            // The cast saturates out of range; try_from below rejects it.
            int_to_value(float as i128, dst)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_identity_and_numeric() {
        assert!(matches!(
            Convert::choose(Type::I64, Type::I64),
            Some(Convert::Identity)
        ));
        assert!(matches!(
            Convert::choose(Type::I32, Type::I64),
            Some(Convert::Numeric)
        ));
        assert!(matches!(
            Convert::choose(Type::F64, Type::I32),
            Some(Convert::Numeric)
        ));
        assert!(matches!(
            Convert::choose(Type::String, Type::F64),
            Some(Convert::Parse)
        ));
        assert!(Convert::choose(Type::Bytes, Type::I64).is_none());
        assert!(Convert::choose(Type::Bool, Type::String).is_none());
        assert!(matches!(
            Convert::choose(Type::Unknown, Type::I64),
            Some(Convert::Dynamic)
        ));
    }

    #[test]
    fn integer_narrowing() {
        assert_eq!(int_to_value(300, Type::I16), Some(Value::I16(300)));
        assert_eq!(int_to_value(300, Type::I8), None);
        assert_eq!(int_to_value(-1, Type::U32), None);
        assert_eq!(int_to_value(7, Type::F64), Some(Value::F64(7.0)));
    }

    #[test]
    fn float_narrowing() {
        assert_eq!(float_to_value(2.0, Type::I32), Some(Value::I32(2)));
        assert_eq!(float_to_value(2.5, Type::I32), None);
        assert_eq!(float_to_value(1e300, Type::F32), None);
        assert_eq!(float_to_value(1.5, Type::F32), Some(Value::F32(1.5)));
        assert_eq!(float_to_value(1e300, Type::I64), None);
    }
}
