pub mod mem;
pub use mem::MemCursor;

use crate::{Type, Value};

/// Forward-only handle over one or more tabular result sets.
///
/// This is the narrow contract the mapping core consumes from a database
/// access layer. The cursor is owned by the caller; the enumeration
/// adapters only read from it, and release it themselves when (and only
/// when) they exhaust the final result set.
///
/// Column metadata describes the current result set and is available before
/// the first call to [`advance_row`](Cursor::advance_row).
pub trait Cursor {
    /// Number of columns in the current result set.
    fn column_count(&self) -> usize;

    /// Name of the column at `index`.
    fn column_name(&self, index: usize) -> &str;

    /// Declared type of the column at `index`.
    ///
    /// Dynamically typed sources report [`Type::Unknown`].
    fn column_type(&self, index: usize) -> Type;

    /// Reads the value at `index` in the current row.
    ///
    /// Database nulls surface as [`Value::Null`]. Fails with a cursor state
    /// error if the cursor is released or not positioned on a row.
    fn value(&self, index: usize) -> crate::Result<Value>;

    /// Advances to the next row. Returns `false` when the current result
    /// set has no more rows.
    fn advance_row(&mut self) -> crate::Result<bool>;

    /// Advances to the next result set. Returns `false` when there are no
    /// more result sets.
    fn advance_result_set(&mut self) -> crate::Result<bool>;

    /// Releases the underlying resource. Idempotent.
    fn release(&mut self);
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn column_name(&self, index: usize) -> &str {
        (**self).column_name(index)
    }

    fn column_type(&self, index: usize) -> Type {
        (**self).column_type(index)
    }

    fn value(&self, index: usize) -> crate::Result<Value> {
        (**self).value(index)
    }

    fn advance_row(&mut self) -> crate::Result<bool> {
        (**self).advance_row()
    }

    fn advance_result_set(&mut self) -> crate::Result<bool> {
        (**self).advance_result_set()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
