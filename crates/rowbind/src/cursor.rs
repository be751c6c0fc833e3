use crate::{bag::PropertyBag, plan::MapPlan, split::GroupPlan, Entity, EntityGroup};

use rowbind_core::{Cursor, Result};

use std::sync::Arc;

/// Lazy, forward-only, single-pass sequence of typed instances over one
/// result set.
///
/// Each pull advances the cursor by exactly one row and applies the
/// compiled plan. When the result set is exhausted the adapter advances to
/// the next result set; if none exists it releases the cursor itself.
///
/// Abandoning iteration early (dropping the adapter before exhaustion)
/// does NOT release the cursor; release happens only on natural
/// exhaustion. Callers that may bail out keep ownership by passing
/// `&mut cursor` and applying their own scoped-resource discipline.
pub struct Rows<T: Entity, C: Cursor> {
    cursor: C,
    plan: Arc<MapPlan>,
    done: bool,
    _p: std::marker::PhantomData<T>,
}

impl<T: Entity, C: Cursor> std::fmt::Debug for Rows<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<T: Entity, C: Cursor> Rows<T, C> {
    pub(crate) fn new(cursor: C, plan: Arc<MapPlan>) -> Self {
        Self {
            cursor,
            plan,
            done: false,
            _p: std::marker::PhantomData,
        }
    }
}

impl<T: Entity, C: Cursor> Iterator for Rows<T, C> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.advance_row() {
            Ok(true) => match self.plan.materialize(&self.cursor) {
                Ok(instance) => Some(Ok(instance)),
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            },
            Ok(false) => {
                self.done = true;
                finish(&mut self.cursor);
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Lazy sequence of [`PropertyBag`]s; the dynamic, no-target-type case.
///
/// Shares [`Rows`]' lifecycle behavior, including release only on natural
/// exhaustion.
pub struct DynamicRows<C: Cursor> {
    cursor: C,
    done: bool,
}

impl<C: Cursor> DynamicRows<C> {
    pub(crate) fn new(cursor: C) -> Self {
        Self {
            cursor,
            done: false,
        }
    }

    fn materialize(&self) -> Result<PropertyBag> {
        let mut bag = PropertyBag::new();
        for index in 0..self.cursor.column_count() {
            let value = self.cursor.value(index)?;
            bag.insert(self.cursor.column_name(index), value);
        }
        Ok(bag)
    }
}

impl<C: Cursor> Iterator for DynamicRows<C> {
    type Item = Result<PropertyBag>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.advance_row() {
            Ok(true) => match self.materialize() {
                Ok(bag) => Some(Ok(bag)),
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            },
            Ok(false) => {
                self.done = true;
                finish(&mut self.cursor);
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Assembly callback type for a [`GroupedRows`] without one.
pub type NoAssemble<G> =
    fn(&mut <G as EntityGroup>::Root, <G as EntityGroup>::Subs);

/// Lazy sequence over a multi-type row group.
///
/// Yields the root instances. When an assembly callback is attached with
/// [`assemble`](GroupedRows::assemble) it runs per row with the root and
/// the tuple of sub-instances, so the caller can stitch object graphs;
/// without one, sub-instances are discarded.
///
/// Shares [`Rows`]' lifecycle behavior, including release only on natural
/// exhaustion.
pub struct GroupedRows<G: EntityGroup, C: Cursor, F> {
    cursor: C,
    plan: Arc<GroupPlan>,
    assemble: Option<F>,
    done: bool,
    _p: std::marker::PhantomData<G>,
}

impl<G: EntityGroup, C: Cursor, F> std::fmt::Debug for GroupedRows<G, C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupedRows")
            .field("done", &self.done)
            .field("has_assemble", &self.assemble.is_some())
            .finish_non_exhaustive()
    }
}

impl<G: EntityGroup, C: Cursor> GroupedRows<G, C, NoAssemble<G>> {
    pub(crate) fn new(cursor: C, plan: Arc<GroupPlan>) -> Self {
        Self {
            cursor,
            plan,
            assemble: None,
            done: false,
            _p: std::marker::PhantomData,
        }
    }
}

impl<G: EntityGroup, C: Cursor, F> GroupedRows<G, C, F> {
    /// Attaches the assembly callback invoked with each row's instances.
    pub fn assemble<F2>(self, assemble: F2) -> GroupedRows<G, C, F2>
    where
        F2: FnMut(&mut G::Root, G::Subs),
    {
        GroupedRows {
            cursor: self.cursor,
            plan: self.plan,
            assemble: Some(assemble),
            done: self.done,
            _p: std::marker::PhantomData,
        }
    }
}

impl<G, C, F> Iterator for GroupedRows<G, C, F>
where
    G: EntityGroup,
    C: Cursor,
    F: FnMut(&mut G::Root, G::Subs),
{
    type Item = Result<G::Root>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.advance_row() {
            Ok(true) => match G::load(&self.plan, &self.cursor) {
                Ok((mut root, subs)) => {
                    if let Some(assemble) = &mut self.assemble {
                        assemble(&mut root, subs);
                    }
                    Some(Ok(root))
                }
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            },
            Ok(false) => {
                self.done = true;
                finish(&mut self.cursor);
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// End-of-result-set handling shared by the adapters: try the next result
/// set, and release the cursor only when none remains.
fn finish<C: Cursor>(cursor: &mut C) {
    if let Ok(false) = cursor.advance_result_set() {
        cursor.release();
    }
}
