use super::Cursor;
use crate::{Error, Type, Value};

/// One tabular result set held in memory.
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: Vec<(String, Type)>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
            rows,
        }
    }
}

/// In-memory [`Cursor`] over vectors of rows.
///
/// Backs the test suite and serves as the reference implementation of the
/// cursor contract, including released-state reporting.
#[derive(Debug)]
pub struct MemCursor {
    sets: Vec<ResultSet>,
    set: usize,
    /// `None` while positioned before the first row of the current set.
    row: Option<usize>,
    released: bool,
}

impl MemCursor {
    pub fn new(sets: Vec<ResultSet>) -> Self {
        Self {
            sets,
            set: 0,
            row: None,
            released: false,
        }
    }

    /// Cursor over a single result set.
    pub fn single<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Self::new(vec![ResultSet::new(columns, rows)])
    }

    /// True once [`release`](Cursor::release) has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn current_set(&self) -> Option<&ResultSet> {
        if self.released {
            return None;
        }
        self.sets.get(self.set)
    }

    fn guard(&self) -> crate::Result<&ResultSet> {
        if self.released {
            return Err(Error::cursor_state("cursor has been released"));
        }
        self.sets
            .get(self.set)
            .ok_or_else(|| Error::cursor_state("no current result set"))
    }
}

impl Cursor for MemCursor {
    fn column_count(&self) -> usize {
        self.current_set().map(|set| set.columns.len()).unwrap_or(0)
    }

    fn column_name(&self, index: usize) -> &str {
        self.current_set()
            .map(|set| &*set.columns[index].0)
            .unwrap_or("")
    }

    fn column_type(&self, index: usize) -> Type {
        self.current_set()
            .map(|set| set.columns[index].1)
            .unwrap_or(Type::Unknown)
    }

    fn value(&self, index: usize) -> crate::Result<Value> {
        let set = self.guard()?;
        let row = self
            .row
            .ok_or_else(|| Error::cursor_state("cursor is not positioned on a row"))?;
        let row = set
            .rows
            .get(row)
            .ok_or_else(|| Error::cursor_state("cursor is past the last row"))?;
        row.get(index)
            .cloned()
            .ok_or_else(|| Error::cursor_state(format!("column index {index} out of range")))
    }

    fn advance_row(&mut self) -> crate::Result<bool> {
        let set = self.guard()?;
        let next = self.row.map(|row| row + 1).unwrap_or(0);
        let within = next < set.rows.len();
        self.row = Some(next);
        Ok(within)
    }

    fn advance_result_set(&mut self) -> crate::Result<bool> {
        if self.released {
            return Err(Error::cursor_state("cursor has been released"));
        }
        self.set += 1;
        self.row = None;
        Ok(self.set < self.sets.len())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> MemCursor {
        MemCursor::single(
            [("id", Type::I64), ("name", Type::String)],
            vec![
                vec![Value::I64(1), Value::from("one")],
                vec![Value::I64(2), Value::from("two")],
            ],
        )
    }

    #[test]
    fn metadata_before_first_row() {
        let cursor = cursor();
        assert_eq!(cursor.column_count(), 2);
        assert_eq!(cursor.column_name(1), "name");
        assert_eq!(cursor.column_type(0), Type::I64);
    }

    #[test]
    fn row_advancement() {
        let mut cursor = cursor();

        assert!(cursor.value(0).unwrap_err().is_cursor_state());

        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.value(0).unwrap(), Value::I64(1));
        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.value(1).unwrap(), Value::from("two"));
        assert!(!cursor.advance_row().unwrap());
    }

    #[test]
    fn result_set_advancement() {
        let first = ResultSet::new([("a", Type::I32)], vec![vec![Value::I32(1)]]);
        let second = ResultSet::new([("b", Type::String)], vec![vec![Value::from("x")]]);
        let mut cursor = MemCursor::new(vec![first, second]);

        assert!(cursor.advance_row().unwrap());
        assert!(!cursor.advance_row().unwrap());

        assert!(cursor.advance_result_set().unwrap());
        assert_eq!(cursor.column_name(0), "b");
        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.value(0).unwrap(), Value::from("x"));

        assert!(!cursor.advance_result_set().unwrap());
    }

    #[test]
    fn release_is_idempotent_and_sticky() {
        let mut cursor = cursor();
        cursor.release();
        cursor.release();

        assert!(cursor.is_released());
        assert!(cursor.advance_row().unwrap_err().is_cursor_state());
        assert!(cursor.advance_result_set().unwrap_err().is_cursor_state());
        assert!(cursor.value(0).unwrap_err().is_cursor_state());
        assert_eq!(cursor.column_count(), 0);
    }
}
