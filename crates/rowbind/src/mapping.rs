mod strategies;
pub use strategies::{CaseInsensitive, ExactName, Overrides, WordNormalized};

use rowbind_core::{EntityDescriptor, Fingerprint};

use std::sync::{Arc, RwLock};

/// Outcome of asking a strategy to resolve one column.
///
/// The two negative outcomes are distinct: `NotApplicable` lets
/// lower-priority strategies run, `Suppress` explicitly ends resolution for
/// the column. A `Field` naming something that does not exist on the target
/// also binds the column to nothing, which strategies can use to fence off
/// columns they own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Bind the column to the named field on the target type.
    Field(String),

    /// No opinion; the next strategy decides.
    NotApplicable,

    /// Explicitly nothing maps here; stop consulting strategies.
    Suppress,
}

/// A pluggable column-to-field resolution strategy.
pub trait ColumnMapper: Send + Sync + 'static {
    /// Decides which field on `target` the column at `index` populates.
    fn map_column(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Resolution;
}

/// The ordered strategy registry.
///
/// Strategies are consulted in priority order and the first one returning
/// something other than [`Resolution::NotApplicable`] wins: explicit
/// overrides, exact name match, case-insensitive match, underscore/camel
/// word normalization, then caller-registered strategies in registration
/// order.
///
/// The registry is meant to be configured during application setup, before
/// queries run concurrently; reads take a shared lock only.
pub struct ColumnMapping {
    overrides: Arc<Overrides>,
    strategies: RwLock<Vec<Arc<dyn ColumnMapper>>>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        let overrides = Arc::new(Overrides::default());
        let strategies: Vec<Arc<dyn ColumnMapper>> = vec![
            overrides.clone(),
            Arc::new(ExactName),
            Arc::new(CaseInsensitive),
            Arc::new(WordNormalized),
        ];

        Self {
            overrides,
            strategies: RwLock::new(strategies),
        }
    }

    /// Registers a custom strategy behind the built-in ones.
    pub fn register(&self, strategy: impl ColumnMapper) {
        self.strategies.write().unwrap().push(Arc::new(strategy));
    }

    /// Adds an explicit column-to-field override for one target type.
    /// Overrides outrank every other strategy. Column matching ignores
    /// ASCII case.
    pub fn set_override(
        &self,
        target: impl Into<String>,
        column: impl Into<String>,
        field: impl Into<String>,
    ) {
        self.overrides.set(target, column, field);
    }

    /// Resolves a column to a field name, or `None` when the column is
    /// unmapped or suppressed.
    pub fn resolve(
        &self,
        target: &'static EntityDescriptor,
        columns: &Fingerprint,
        index: usize,
    ) -> Option<String> {
        let strategies = self.strategies.read().unwrap();
        for strategy in strategies.iter() {
            match strategy.map_column(target, columns, index) {
                Resolution::Field(name) => return Some(name),
                Resolution::NotApplicable => continue,
                Resolution::Suppress => return None,
            }
        }
        None
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::{FieldDescriptor, Type};

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "order_id",
            ty: Type::I64,
            nullable: false,
        },
        FieldDescriptor {
            name: "total",
            ty: Type::F64,
            nullable: false,
        },
    ];

    static ORDER: EntityDescriptor = EntityDescriptor {
        name: "Order",
        fields: FIELDS,
        id_field: Some(0),
    };

    fn fingerprint() -> Fingerprint {
        Fingerprint::from_columns([
            ("order_id", Type::I64),
            ("OrderId", Type::I64),
            ("ORDER_ID", Type::I64),
            ("grand_total", Type::F64),
        ])
    }

    #[test]
    fn builtin_priority() {
        let mapping = ColumnMapping::new();
        let fp = fingerprint();

        // exact
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("order_id"));
        // word normalization (camel case)
        assert_eq!(mapping.resolve(&ORDER, &fp, 1).as_deref(), Some("order_id"));
        // case-insensitive, handled before normalization
        assert_eq!(mapping.resolve(&ORDER, &fp, 2).as_deref(), Some("order_id"));
        // nothing matches
        assert_eq!(mapping.resolve(&ORDER, &fp, 3), None);
    }

    #[test]
    fn override_outranks_exact_match() {
        let mapping = ColumnMapping::new();
        mapping.set_override("Order", "grand_total", "total");
        mapping.set_override("Order", "order_id", "total");

        let fp = fingerprint();
        assert_eq!(mapping.resolve(&ORDER, &fp, 3).as_deref(), Some("total"));
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("total"));
    }

    #[test]
    fn suppress_stops_resolution() {
        struct SuppressAll;

        impl ColumnMapper for SuppressAll {
            fn map_column(
                &self,
                _target: &'static EntityDescriptor,
                _columns: &Fingerprint,
                _index: usize,
            ) -> Resolution {
                Resolution::Suppress
            }
        }

        let mapping = ColumnMapping::new();
        let fp = fingerprint();
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("order_id"));

        // Registered strategies run after the built-ins, so suppression
        // only bites where the built-ins had no opinion.
        mapping.register(SuppressAll);
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("order_id"));
        assert_eq!(mapping.resolve(&ORDER, &fp, 3), None);

        // Suppress ends resolution: a later strategy never sees the column.
        struct Panicky;

        impl ColumnMapper for Panicky {
            fn map_column(
                &self,
                _target: &'static EntityDescriptor,
                _columns: &Fingerprint,
                _index: usize,
            ) -> Resolution {
                panic!("consulted after an explicit suppress");
            }
        }

        mapping.register(Panicky);
        assert_eq!(mapping.resolve(&ORDER, &fp, 3), None);

        // An override resolving to a non-existent field fences the column
        // off entirely.
        mapping.set_override("Order", "order_id", "no_such_field");
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("no_such_field"));
    }

    #[test]
    fn custom_strategy_runs_last() {
        struct GrandTotal;

        impl ColumnMapper for GrandTotal {
            fn map_column(
                &self,
                _target: &'static EntityDescriptor,
                columns: &Fingerprint,
                index: usize,
            ) -> Resolution {
                if columns.column_name(index) == "grand_total" {
                    Resolution::Field("total".to_string())
                } else {
                    Resolution::NotApplicable
                }
            }
        }

        let mapping = ColumnMapping::new();
        mapping.register(GrandTotal);

        let fp = fingerprint();
        assert_eq!(mapping.resolve(&ORDER, &fp, 3).as_deref(), Some("total"));
        // built-ins still win where they apply
        assert_eq!(mapping.resolve(&ORDER, &fp, 0).as_deref(), Some("order_id"));
    }
}
