use crate::{plan::MapPlan, Entity, Mapper};

use rowbind_core::{Cursor, EntityDescriptor, Error, Fingerprint, Result};

use std::{any::TypeId, sync::Arc};

/// A group of 1..=6 related types materialized from one flattened row.
///
/// Implemented for tuples `(T,)` through `(T, S1, ..., S5)`: the first
/// element is the root type owning the leading columns, the rest are
/// sub-types whose column sub-ranges are found by boundary detection. The
/// assembly callback's arity is checked by the tuple type itself.
pub trait EntityGroup: 'static {
    /// Primary type; owns the row's leading column range.
    type Root: Entity;

    /// Sub-instances as a tuple of `Option<S>`; `None` when the sub-type's
    /// boundary column was null (left-join miss).
    type Subs;

    fn descriptors() -> Vec<&'static EntityDescriptor>;

    /// Splits the fingerprint into per-type ranges and compiles one plan
    /// per type.
    fn compile(
        mapper: &Mapper,
        fingerprint: &Fingerprint,
        overrides: &IdOverrides,
    ) -> Result<GroupPlan>;

    /// Materializes one row into the root and sub instances.
    fn load<C: Cursor + ?Sized>(plan: &GroupPlan, cursor: &C) -> Result<(Self::Root, Self::Subs)>;
}

/// Compiled plans and column ranges for one entity group.
pub struct GroupPlan {
    plans: Vec<Arc<MapPlan>>,
    ranges: Vec<(usize, usize)>,
}

impl GroupPlan {
    pub(crate) fn new(plans: Vec<Arc<MapPlan>>, ranges: Vec<(usize, usize)>) -> Self {
        Self { plans, ranges }
    }

    pub(crate) fn plan(&self, index: usize) -> &MapPlan {
        &self.plans[index]
    }

    /// The column sub-range owned by the type at `index`.
    pub fn range(&self, index: usize) -> (usize, usize) {
        self.ranges[index]
    }

    /// Materializes sub-object `index`, unless its boundary column is null.
    pub(crate) fn sub<S: Entity, C: Cursor + ?Sized>(
        &self,
        index: usize,
        cursor: &C,
    ) -> Result<Option<S>> {
        let (start, _) = self.ranges[index];
        if cursor.value(start)?.is_null() {
            return Ok(None);
        }
        Ok(Some(self.plans[index].materialize(cursor)?))
    }
}

/// Per-group mapping options: id-column overrides for boundary detection.
#[derive(Default, Clone)]
pub struct GroupOptions {
    id_columns: IdOverrides,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the column that starts sub-type `S`'s column range, overriding
    /// detection via the type's identifier field.
    pub fn id_column<S: Entity>(mut self, column: impl Into<String>) -> Self {
        self.id_columns.set::<S>(column.into());
        self
    }

    pub(crate) fn id_columns(&self) -> &IdOverrides {
        &self.id_columns
    }
}

/// Caller-supplied id-column names, keyed per sub-type.
#[derive(Default, Clone)]
pub struct IdOverrides {
    entries: Vec<(TypeId, Box<str>)>,
}

impl IdOverrides {
    fn set<S: 'static>(&mut self, column: String) {
        let key = TypeId::of::<S>();
        if let Some(entry) = self.entries.iter_mut().find(|(ty, _)| *ty == key) {
            entry.1 = column.into();
        } else {
            self.entries.push((key, column.into()));
        }
    }

    pub fn get<S: 'static>(&self) -> Option<&str> {
        let key = TypeId::of::<S>();
        self.entries
            .iter()
            .find(|(ty, _)| *ty == key)
            .map(|(_, column)| &**column)
    }

    /// Stable key material for the group-plan cache.
    pub(crate) fn cache_key(&self) -> Vec<(TypeId, Box<str>)> {
        self.entries.clone()
    }
}

/// Determines the column sub-range owned by each type in the group.
///
/// The root owns columns from 0. For each later type the boundary is the
/// first column past the previous boundary whose name matches the type's id
/// column (override, or its identifier field's name), ignoring ASCII case.
/// A sub-range extends to the next boundary, the last to the end of the
/// row.
pub(crate) fn ranges(
    fingerprint: &Fingerprint,
    descriptors: &[&'static EntityDescriptor],
    id_overrides: &[Option<&str>],
) -> Result<Vec<(usize, usize)>> {
    debug_assert_eq!(descriptors.len(), id_overrides.len() + 1);

    let mut starts = Vec::with_capacity(descriptors.len());
    starts.push(0);

    let mut from = 1;
    for (descriptor, id_override) in descriptors.iter().skip(1).zip(id_overrides) {
        let id_name = match id_override {
            Some(name) => name,
            None => match descriptor.id_field() {
                Some(field) => field.name,
                None => return Err(Error::ambiguous_split(descriptor.name, None::<&str>)),
            },
        };
        let Some(column) = fingerprint.find_from(id_name, from) else {
            return Err(Error::ambiguous_split(descriptor.name, Some(id_name)));
        };
        starts.push(column);
        from = column + 1;
    }

    let ends = starts
        .iter()
        .skip(1)
        .copied()
        .chain(std::iter::once(fingerprint.len()));

    Ok(starts.iter().copied().zip(ends).collect())
}

macro_rules! impl_entity_group {
    ( $( $sub:ident ),* ) => {
        impl<T: Entity $(, $sub: Entity)*> EntityGroup for (T, $($sub,)*) {
            type Root = T;
            type Subs = ($(Option<$sub>,)*);

            fn descriptors() -> Vec<&'static EntityDescriptor> {
                vec![T::descriptor() $(, $sub::descriptor())*]
            }

            fn compile(
                mapper: &Mapper,
                fingerprint: &Fingerprint,
                overrides: &IdOverrides,
            ) -> Result<GroupPlan> {
                let descriptors = Self::descriptors();
                let id_overrides = vec![$( overrides.get::<$sub>() ),*];
                let ranges = ranges(fingerprint, &descriptors, &id_overrides)?;

                let mut plans = Vec::with_capacity(descriptors.len());
                plans.push(mapper.plan_for_range::<T>(fingerprint, ranges[0])?);
                #[allow(unused_mut, unused_variables)]
                let mut index = 0usize;
                $(
                    #[allow(unused_assignments)]
                    {
                        index += 1;
                    }
                    plans.push(mapper.plan_for_range::<$sub>(fingerprint, ranges[index])?);
                )*

                Ok(GroupPlan::new(plans, ranges))
            }

            fn load<C: Cursor + ?Sized>(
                plan: &GroupPlan,
                cursor: &C,
            ) -> Result<(Self::Root, Self::Subs)> {
                let root: T = plan.plan(0).materialize(cursor)?;
                #[allow(unused_mut, unused_variables)]
                let mut index = 0usize;
                let subs = ($(
                    {
                        index += 1;
                        plan.sub::<$sub, _>(index, cursor)?
                    },
                )*);
                Ok((root, subs))
            }
        }
    };
}

impl_entity_group!();
impl_entity_group!(S1);
impl_entity_group!(S1, S2);
impl_entity_group!(S1, S2, S3);
impl_entity_group!(S1, S2, S3, S4);
impl_entity_group!(S1, S2, S3, S4, S5);

#[cfg(test)]
mod tests {
    use super::*;
    use rowbind_core::{FieldDescriptor, Type};

    const ORDER_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "order_id",
            ty: Type::I64,
            nullable: false,
        },
        FieldDescriptor {
            name: "placed",
            ty: Type::String,
            nullable: false,
        },
    ];

    const ITEM_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "item_id",
            ty: Type::I64,
            nullable: false,
        },
        FieldDescriptor {
            name: "item_name",
            ty: Type::String,
            nullable: false,
        },
    ];

    static ORDER: EntityDescriptor = EntityDescriptor {
        name: "Order",
        fields: ORDER_FIELDS,
        id_field: Some(0),
    };

    static ITEM: EntityDescriptor = EntityDescriptor {
        name: "Item",
        fields: ITEM_FIELDS,
        id_field: Some(0),
    };

    static NO_ID: EntityDescriptor = EntityDescriptor {
        name: "NoId",
        fields: ITEM_FIELDS,
        id_field: None,
    };

    fn fingerprint() -> Fingerprint {
        Fingerprint::from_columns([
            ("order_id", Type::I64),
            ("placed", Type::String),
            ("item_id", Type::I64),
            ("item_name", Type::String),
        ])
    }

    #[test]
    fn detects_boundaries_from_id_fields() {
        let split = ranges(&fingerprint(), &[&ORDER, &ITEM], &[None]).unwrap();
        assert_eq!(split, vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn override_beats_detection() {
        let split = ranges(&fingerprint(), &[&ORDER, &ITEM], &[Some("item_name")]).unwrap();
        assert_eq!(split, vec![(0, 3), (3, 4)]);
    }

    #[test]
    fn missing_boundary_is_ambiguous() {
        let err = ranges(
            &fingerprint(),
            &[&ORDER, &ITEM],
            &[Some("no_such_column")],
        )
        .unwrap_err();
        assert!(err.is_ambiguous_split());

        let err = ranges(&fingerprint(), &[&ORDER, &NO_ID], &[None]).unwrap_err();
        assert!(err.is_ambiguous_split());
        assert_eq!(
            err.to_string(),
            "type `NoId` has no identifier field and no id column override"
        );
    }

    #[test]
    fn boundary_search_is_ordered() {
        // The second type's boundary must come after the first boundary.
        let fp = Fingerprint::from_columns([
            ("order_id", Type::I64),
            ("item_id", Type::I64),
            ("item_id", Type::I64),
        ]);
        let split = ranges(&fp, &[&ORDER, &ITEM, &ITEM], &[None, None]).unwrap();
        assert_eq!(split, vec![(0, 1), (1, 2), (2, 3)]);
    }
}
