use super::{ColumnMapper, Resolution};

use heck::ToSnakeCase;
use rowbind_core::{EntityDescriptor, Fingerprint};

use std::{collections::HashMap, sync::RwLock};

/// Exact, case-sensitive column-to-field name match.
pub struct ExactName;

impl ColumnMapper for ExactName {
    fn map_column(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Resolution {
        let column = columns.column_name(index);
        if target.field_index(column).is_some() {
            Resolution::Field(column.to_string())
        } else {
            Resolution::NotApplicable
        }
    }
}

/// ASCII case-insensitive name match.
pub struct CaseInsensitive;

impl ColumnMapper for CaseInsensitive {
    fn map_column(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Resolution {
        let column = columns.column_name(index);
        match target
            .fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(column))
        {
            Some(field) => Resolution::Field(field.name.to_string()),
            None => Resolution::NotApplicable,
        }
    }
}

/// Underscore/camel-case word normalization: `OrderId`, `ORDER_ID` and
/// `order_id` all bind a field named `order_id`.
pub struct WordNormalized;

impl ColumnMapper for WordNormalized {
    fn map_column(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Resolution {
        let normalized = columns.column_name(index).to_snake_case();
        match target
            .fields
            .iter()
            .find(|field| field.name.to_snake_case() == normalized)
        {
            Some(field) => Resolution::Field(field.name.to_string()),
            None => Resolution::NotApplicable,
        }
    }
}

/// Explicit per-type column-to-field overrides, consulted before any other
/// strategy. Column names match ignoring ASCII case.
#[derive(Default)]
pub struct Overrides {
    map: RwLock<HashMap<(String, String), String>>,
}

impl Overrides {
    pub(super) fn set(
        &self,
        target: impl Into<String>,
        column: impl Into<String>,
        field: impl Into<String>,
    ) {
        self.map.write().unwrap().insert(
            (target.into(), column.into().to_ascii_lowercase()),
            field.into(),
        );
    }
}

impl ColumnMapper for Overrides {
    fn map_column(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Resolution {
        let key = (
            target.name.to_string(),
            columns.column_name(index).to_ascii_lowercase(),
        );
        match self.map.read().unwrap().get(&key) {
            Some(field) => Resolution::Field(field.clone()),
            None => Resolution::NotApplicable,
        }
    }
}
