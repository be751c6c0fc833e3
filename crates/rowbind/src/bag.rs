use rowbind_core::Value;

use indexmap::IndexMap;

/// Ordered name→value container produced when no static target type is
/// given.
///
/// Column order is preserved, duplicates included: enumerating the bag
/// yields every entry under its original name. [`get`](PropertyBag::get)
/// returns the latest duplicate for a name; earlier duplicates are also
/// addressable under suffixed keys (`name_1`, `name_2`, ... in arrival
/// order).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, Value)>,
    index: IndexMap<String, usize>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping any existing entries with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let position = self.entries.len();

        if self.index.contains_key(&name) {
            let mut n = 1;
            let mut alias = format!("{name}_{n}");
            while self.index.contains_key(&alias) {
                n += 1;
                alias = format!("{name}_{n}");
            }
            self.index.insert(alias, position);
        }

        self.index.insert(name.clone(), position);
        self.entries.push((name, value));
    }

    /// Looks up a value by name; the latest duplicate shadows earlier ones.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position].1)
    }

    /// The entry at `position`, in column order.
    pub fn get_index(&self, position: usize) -> Option<(&str, &Value)> {
        self.entries
            .get(position)
            .map(|(name, value)| (&**name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in column order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropertyBag {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_duplicates() {
        let mut bag = PropertyBag::new();
        bag.insert("id", Value::I64(1));
        bag.insert("name", Value::from("first"));
        bag.insert("name", Value::from("second"));

        assert_eq!(bag.len(), 3);
        let keys: Vec<_> = bag.keys().collect();
        assert_eq!(keys, vec!["id", "name", "name"]);
    }

    #[test]
    fn later_duplicate_shadows_on_read() {
        let mut bag = PropertyBag::new();
        bag.insert("name", Value::from("first"));
        bag.insert("name", Value::from("second"));

        assert_eq!(bag.get("name"), Some(&Value::from("second")));
        // the earlier duplicate stays addressable under a suffixed key
        assert_eq!(bag.get("name_1"), Some(&Value::from("second")));
        assert_eq!(bag.get_index(0), Some(("name", &Value::from("first"))));
    }

    #[test]
    fn missing_name() {
        let bag = PropertyBag::new();
        assert_eq!(bag.get("nope"), None);
        assert!(bag.is_empty());
    }
}
