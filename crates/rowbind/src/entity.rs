use rowbind_core::{EntityDescriptor, Result, Type, Value};

/// A type that rows can be mapped onto.
///
/// Implementations are usually generated with the [`entity!`](crate::entity)
/// macro; hand-written impls only need to expose static field metadata and a
/// field setter.
pub trait Entity: Default + Sized + Send + 'static {
    /// Static metadata: field names, declared types, nullability and the
    /// identifier field used for row-group boundary detection.
    fn descriptor() -> &'static EntityDescriptor;

    /// Writes an already-converted value into the field at index `field`.
    ///
    /// The value's variant matches the field's declared type; nullable
    /// fields may receive [`Value::Null`].
    fn apply(&mut self, field: usize, value: Value) -> Result<()>;
}

/// Maps a Rust field type to its declared [`Type`] tag and nullability, and
/// converts an exact-typed [`Value`] into it.
///
/// `Option<T>` wraps any implementation and flips
/// [`NULLABLE`](FromValue::NULLABLE). User-defined enums implement this by
/// hand with a `Type::Enum` tag.
pub trait FromValue: Sized {
    const TYPE: Type;
    const NULLABLE: bool = false;

    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ( $( $ty:ty => $tag:ident, $to:ident ; )* ) => {
        $(
            impl FromValue for $ty {
                const TYPE: Type = Type::$tag;

                fn from_value(value: Value) -> Result<Self> {
                    value.$to()
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool, to_bool;
    i8 => I8, to_i8;
    i16 => I16, to_i16;
    i32 => I32, to_i32;
    i64 => I64, to_i64;
    u8 => U8, to_u8;
    u16 => U16, to_u16;
    u32 => U32, to_u32;
    u64 => U64, to_u64;
    f32 => F32, to_f32;
    f64 => F64, to_f64;
    String => String, to_string;
    Vec<u8> => Bytes, to_bytes;
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE: Type = T::TYPE;
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_value(value)?))
        }
    }
}

/// Declares a mappable struct and generates its [`Entity`] implementation.
///
/// Field tags and nullability are derived from the Rust field types through
/// [`FromValue`]; `Option<T>` fields are nullable. The identifier field
/// defaults to a field named `id` when one exists; name a different one
/// with `(id = field)`:
///
/// ```
/// rowbind::entity! {
///     pub struct OrderItem(id = item_id) {
///         item_id: i64,
///         item_name: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident (id = $id:ident) {
            $( $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $crate::entity! {
            @impl
            $(#[$meta])*
            $vis struct $name (id = stringify!($id)) {
                $( $field : $fty ),*
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $crate::entity! {
            @impl
            $(#[$meta])*
            $vis struct $name (id = "id") {
                $( $field : $fty ),*
            }
        }
    };
    (
        @impl
        $(#[$meta:meta])*
        $vis:vis struct $name:ident (id = $id:expr) {
            $( $field:ident : $fty:ty ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq)]
        $vis struct $name {
            $( pub $field: $fty, )*
        }

        impl $crate::Entity for $name {
            fn descriptor() -> &'static $crate::EntityDescriptor {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor {
                            name: stringify!($field),
                            ty: <$fty as $crate::FromValue>::TYPE,
                            nullable: <$fty as $crate::FromValue>::NULLABLE,
                        },
                    )*
                ];
                static DESCRIPTOR: $crate::EntityDescriptor = $crate::EntityDescriptor {
                    name: stringify!($name),
                    fields: FIELDS,
                    id_field: $crate::EntityDescriptor::const_field_index(FIELDS, $id),
                };
                &DESCRIPTOR
            }

            fn apply(
                &mut self,
                field: usize,
                value: $crate::Value,
            ) -> $crate::Result<()> {
                #[allow(unused_mut, unused_variables)]
                let mut index = 0usize;
                $(
                    if field == index {
                        self.$field = <$fty as $crate::FromValue>::from_value(value)?;
                        return Ok(());
                    }
                    #[allow(unused_assignments)]
                    {
                        index += 1;
                    }
                )*
                Err($crate::Error::from_args(format_args!(
                    "field index {} out of range for {}",
                    field,
                    stringify!($name),
                )))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::value::ValueEnum;
    use rowbind_core::EnumTag;

    crate::entity! {
        /// Test shape with defaulted id detection.
        struct Person {
            id: i64,
            name: String,
            age: Option<i32>,
        }
    }

    crate::entity! {
        struct OrderItem(id = item_id) {
            item_id: i64,
            item_name: String,
        }
    }

    crate::entity! {
        struct Anonymous {
            label: String,
        }
    }

    #[test]
    fn descriptor_shape() {
        let descriptor = Person::descriptor();
        assert_eq!(descriptor.name, "Person");
        assert_eq!(descriptor.fields.len(), 3);
        assert_eq!(descriptor.fields[0].name, "id");
        assert_eq!(descriptor.fields[0].ty, Type::I64);
        assert!(!descriptor.fields[0].nullable);
        assert_eq!(descriptor.fields[2].ty, Type::I32);
        assert!(descriptor.fields[2].nullable);
        assert_eq!(descriptor.id_field, Some(0));
    }

    #[test]
    fn id_override_and_default() {
        assert_eq!(OrderItem::descriptor().id_field, Some(0));
        assert_eq!(OrderItem::descriptor().id_field().unwrap().name, "item_id");
        assert_eq!(Anonymous::descriptor().id_field, None);
    }

    #[test]
    fn apply_sets_fields() {
        let mut person = Person::default();
        person.apply(0, Value::I64(7)).unwrap();
        person.apply(1, Value::from("Ada")).unwrap();
        person.apply(2, Value::Null).unwrap();

        assert_eq!(person.id, 7);
        assert_eq!(person.name, "Ada");
        assert_eq!(person.age, None);

        person.apply(2, Value::I32(36)).unwrap();
        assert_eq!(person.age, Some(36));

        assert!(person.apply(9, Value::Null).is_err());
    }

    #[test]
    fn custom_enum_from_value() {
        static STATUS: EnumTag = EnumTag {
            name: "status",
            variants: &["pending", "shipped"],
        };

        #[derive(Debug, Default, Clone, PartialEq)]
        enum Status {
            #[default]
            Pending,
            Shipped,
        }

        impl FromValue for Status {
            const TYPE: Type = Type::Enum(&STATUS);

            fn from_value(value: Value) -> Result<Self> {
                match value.to_enum()?.variant.as_str() {
                    "pending" => Ok(Self::Pending),
                    "shipped" => Ok(Self::Shipped),
                    other => Err(rowbind_core::err!("unknown status variant `{other}`")),
                }
            }
        }

        assert_eq!(
            Status::from_value(Value::Enum(ValueEnum::new("shipped"))).unwrap(),
            Status::Shipped
        );
        assert_eq!(<Option<Status> as FromValue>::NULLABLE, true);
    }
}
