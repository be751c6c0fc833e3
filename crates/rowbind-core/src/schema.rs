mod fingerprint;
pub use fingerprint::Fingerprint;

use crate::Type;

/// Static metadata describing a mappable target type.
///
/// Descriptors are `'static`: generated code (or a hand-written impl)
/// declares them as constants so a compiled plan can hold references to
/// them for the process lifetime.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// The target type's name, used in diagnostics and override lookups.
    pub name: &'static str,

    /// Writable fields, in declaration order. Plan instructions refer to
    /// fields by index into this slice.
    pub fields: &'static [FieldDescriptor],

    /// Index of the field that identifies an instance. Row-group boundary
    /// detection searches for a column named after this field.
    pub id_field: Option<usize>,
}

/// A single writable field on a target type.
#[derive(Debug)]
pub struct FieldDescriptor {
    /// The field name
    pub name: &'static str,

    /// The field's declared type
    pub ty: Type,

    /// True if the field accepts null (`None` in Rust)
    pub nullable: bool,
}

impl EntityDescriptor {
    /// Looks up a field by exact name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field(&self, index: usize) -> &FieldDescriptor {
        &self.fields[index]
    }

    /// The identifier field, if one is declared.
    pub fn id_field(&self) -> Option<&FieldDescriptor> {
        self.id_field.map(|index| &self.fields[index])
    }

    /// Fully qualified member name for diagnostics, e.g. `Order::id`.
    pub fn member_name(&self, index: usize) -> String {
        format!("{}::{}", self.name, self.fields[index].name)
    }

    /// Const-context field lookup, usable when declaring descriptors as
    /// statics.
    pub const fn const_field_index(
        fields: &'static [FieldDescriptor],
        name: &str,
    ) -> Option<usize> {
        let mut i = 0;
        while i < fields.len() {
            if const_str_eq(fields[i].name, name) {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "id",
            ty: Type::I64,
            nullable: false,
        },
        FieldDescriptor {
            name: "name",
            ty: Type::String,
            nullable: true,
        },
    ];

    static PERSON: EntityDescriptor = EntityDescriptor {
        name: "Person",
        fields: FIELDS,
        id_field: EntityDescriptor::const_field_index(FIELDS, "id"),
    };

    #[test]
    fn field_lookup() {
        assert_eq!(PERSON.field_index("name"), Some(1));
        assert_eq!(PERSON.field_index("Name"), None);
        assert_eq!(PERSON.field_index("missing"), None);
    }

    #[test]
    fn id_field_resolved_in_const_context() {
        assert_eq!(PERSON.id_field, Some(0));
        assert_eq!(PERSON.id_field().unwrap().name, "id");
    }

    #[test]
    fn member_names() {
        assert_eq!(PERSON.member_name(1), "Person::name");
    }
}
