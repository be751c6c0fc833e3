use crate::{
    cursor::{DynamicRows, GroupedRows, NoAssemble, Rows},
    mapping::ColumnMapping,
    plan::MapPlan,
    split::{GroupOptions, GroupPlan},
    Entity, EntityGroup,
};

use rowbind_core::{Cursor, Fingerprint, Result};

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, RwLock},
};

/// The mapping engine: a column mapping registry plus the process-lifetime
/// plan caches.
///
/// Plans are compiled lazily on the first encounter with a new schema shape
/// and cached forever; the set of distinct schemas seen by a process is
/// assumed small and stable. The caches support concurrent read/insert; a
/// duplicate compile under contention is benign and either result may be
/// retained.
///
/// Most callers use the process-wide instance through
/// [`Mapper::global`] (or the [`CursorExt`](crate::CursorExt) convenience
/// methods); separate instances exist so registries can be configured in
/// isolation.
pub struct Mapper {
    registry: ColumnMapping,
    plans: RwLock<HashMap<PlanKey, Arc<MapPlan>>>,
    groups: RwLock<HashMap<GroupKey, Arc<GroupPlan>>>,
}

#[derive(PartialEq, Eq, Hash)]
struct PlanKey {
    fingerprint: Fingerprint,
    target: TypeId,
    range: (usize, usize),
}

#[derive(PartialEq, Eq, Hash)]
struct GroupKey {
    fingerprint: Fingerprint,
    group: TypeId,
    id_columns: Vec<(TypeId, Box<str>)>,
}

impl Mapper {
    pub fn new() -> Self {
        Self {
            registry: ColumnMapping::new(),
            plans: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide mapper.
    pub fn global() -> &'static Mapper {
        static GLOBAL: OnceLock<Mapper> = OnceLock::new();
        GLOBAL.get_or_init(Mapper::new)
    }

    /// The strategy registry this mapper consults. Configure during
    /// application setup, before issuing concurrent queries.
    pub fn registry(&self) -> &ColumnMapping {
        &self.registry
    }

    /// Returns the cached plan for `(fingerprint, T)`, compiling it on
    /// first encounter.
    pub fn plan_for<T: Entity>(&self, fingerprint: &Fingerprint) -> Result<Arc<MapPlan>> {
        self.plan_for_range::<T>(fingerprint, (0, fingerprint.len()))
    }

    pub(crate) fn plan_for_range<T: Entity>(
        &self,
        fingerprint: &Fingerprint,
        range: (usize, usize),
    ) -> Result<Arc<MapPlan>> {
        let key = PlanKey {
            fingerprint: fingerprint.clone(),
            target: TypeId::of::<T>(),
            range,
        };

        if let Some(plan) = self.plans.read().unwrap().get(&key) {
            return Ok(plan.clone());
        }

        // Compile outside the lock. Racing compiles of the same key are
        // interchangeable; the first insert wins.
        let plan = Arc::new(MapPlan::compile(
            fingerprint,
            T::descriptor(),
            range,
            &self.registry,
        )?);

        let mut plans = self.plans.write().unwrap();
        Ok(plans.entry(key).or_insert(plan).clone())
    }

    fn group_plan_for<G: EntityGroup>(
        &self,
        fingerprint: &Fingerprint,
        options: &GroupOptions,
    ) -> Result<Arc<GroupPlan>> {
        let key = GroupKey {
            fingerprint: fingerprint.clone(),
            group: TypeId::of::<G>(),
            id_columns: options.id_columns().cache_key(),
        };

        if let Some(plan) = self.groups.read().unwrap().get(&key) {
            return Ok(plan.clone());
        }

        let plan = Arc::new(G::compile(self, fingerprint, options.id_columns())?);

        let mut groups = self.groups.write().unwrap();
        Ok(groups.entry(key).or_insert(plan).clone())
    }

    /// Lazy typed sequence over the cursor's current result set.
    pub fn rows<T: Entity, C: Cursor>(&self, cursor: C) -> Result<Rows<T, C>> {
        let fingerprint = Fingerprint::of(&cursor);
        let plan = self.plan_for::<T>(&fingerprint)?;
        Ok(Rows::new(cursor, plan))
    }

    /// Lazy sequence of [`PropertyBag`](crate::PropertyBag)s; no
    /// compilation is involved.
    pub fn dynamic_rows<C: Cursor>(&self, cursor: C) -> DynamicRows<C> {
        DynamicRows::new(cursor)
    }

    /// Lazy sequence over a multi-type row group; see
    /// [`EntityGroup`] and [`GroupedRows`].
    pub fn grouped_rows<G: EntityGroup, C: Cursor>(
        &self,
        cursor: C,
        options: GroupOptions,
    ) -> Result<GroupedRows<G, C, NoAssemble<G>>> {
        let fingerprint = Fingerprint::of(&cursor);
        let plan = self.group_plan_for::<G>(&fingerprint, &options)?;
        Ok(GroupedRows::new(cursor, plan))
    }

    /// Eagerly drains the typed sequence into a `Vec`.
    pub fn list<T: Entity, C: Cursor>(&self, cursor: C) -> Result<Vec<T>> {
        self.rows(cursor)?.collect()
    }

    /// Maps the cursor's current row onto an existing instance.
    pub fn apply_row<T: Entity, C: Cursor>(&self, cursor: &C, target: &mut T) -> Result<()> {
        let fingerprint = Fingerprint::of(cursor);
        let plan = self.plan_for::<T>(&fingerprint)?;
        plan.apply_to(cursor, target)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience entry points on any cursor, delegating to
/// [`Mapper::global`].
pub trait CursorExt: Cursor + Sized {
    fn rows<T: Entity>(self) -> Result<Rows<T, Self>> {
        Mapper::global().rows(self)
    }

    fn dynamic_rows(self) -> DynamicRows<Self> {
        Mapper::global().dynamic_rows(self)
    }

    fn grouped_rows<G: EntityGroup>(
        self,
        options: GroupOptions,
    ) -> Result<GroupedRows<G, Self, NoAssemble<G>>> {
        Mapper::global().grouped_rows(self, options)
    }

    fn list<T: Entity>(self) -> Result<Vec<T>> {
        Mapper::global().list(self)
    }
}

impl<C: Cursor> CursorExt for C {}
