use crate::{driver::Cursor, Type};

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Cache key derived from a result set's ordered column names and types.
///
/// Two cursors with equal fingerprints are guaranteed to produce
/// structurally identical compiled plans, so the fingerprint (together with
/// the target type) keys the plan cache. Cheap to clone; the hash is
/// computed once at construction.
#[derive(Clone)]
pub struct Fingerprint {
    inner: Arc<Inner>,
}

struct Inner {
    columns: Box<[(Box<str>, Type)]>,
    hash: u64,
}

impl Fingerprint {
    /// Derives the fingerprint of the cursor's current result set.
    pub fn of<C: Cursor + ?Sized>(cursor: &C) -> Self {
        Self::from_columns(
            (0..cursor.column_count())
                .map(|index| (cursor.column_name(index).to_string(), cursor.column_type(index))),
        )
    }

    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<Box<str>>,
    {
        let columns: Box<[(Box<str>, Type)]> = columns
            .into_iter()
            .map(|(name, ty)| (name.into(), ty))
            .collect();

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (name, ty) in columns.iter() {
            name.hash(&mut hasher);
            ty.hash(&mut hasher);
        }
        let hash = hasher.finish();

        Self {
            inner: Arc::new(Inner { columns, hash }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.columns.is_empty()
    }

    pub fn column_name(&self, index: usize) -> &str {
        &self.inner.columns[index].0
    }

    pub fn column_type(&self, index: usize) -> Type {
        self.inner.columns[index].1
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Type)> {
        self.inner.columns.iter().map(|(name, ty)| (&**name, *ty))
    }

    /// Finds the first column at or past `from` whose name matches,
    /// ignoring ASCII case. Used for row-group boundary detection.
    pub fn find_from(&self, name: &str, from: usize) -> Option<usize> {
        (from..self.len()).find(|&index| self.column_name(index).eq_ignore_ascii_case(name))
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.hash == other.inner.hash && self.inner.columns == other.inner.columns
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.columns()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_columns_equal_fingerprints() {
        let a = Fingerprint::from_columns([("id", Type::I64), ("name", Type::String)]);
        let b = Fingerprint::from_columns([("id", Type::I64), ("name", Type::String)]);

        assert_eq!(a, b);

        let mut hasher_a = std::collections::hash_map::DefaultHasher::new();
        let mut hasher_b = std::collections::hash_map::DefaultHasher::new();
        a.hash(&mut hasher_a);
        b.hash(&mut hasher_b);
        assert_eq!(hasher_a.finish(), hasher_b.finish());
    }

    #[test]
    fn order_and_type_sensitive() {
        let a = Fingerprint::from_columns([("id", Type::I64), ("name", Type::String)]);
        let reordered = Fingerprint::from_columns([("name", Type::String), ("id", Type::I64)]);
        let retyped = Fingerprint::from_columns([("id", Type::I32), ("name", Type::String)]);

        assert_ne!(a, reordered);
        assert_ne!(a, retyped);
    }

    #[test]
    fn find_from_is_case_insensitive() {
        let fp = Fingerprint::from_columns([
            ("OrderId", Type::I64),
            ("ItemId", Type::I64),
            ("itemid", Type::I64),
        ]);

        assert_eq!(fp.find_from("itemId", 0), Some(1));
        assert_eq!(fp.find_from("itemId", 2), Some(2));
        assert_eq!(fp.find_from("missing", 0), None);
    }
}
