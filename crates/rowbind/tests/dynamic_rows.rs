use pretty_assertions::assert_eq;

use rowbind::driver::mem::MemCursor;
use rowbind::{CursorExt, Result, Type, Value};

#[test]
fn bags_preserve_column_order_and_count() {
    let cursor = MemCursor::single(
        [
            ("id", Type::I64),
            ("name", Type::String),
            ("score", Type::F64),
        ],
        vec![
            vec![Value::I64(1), Value::from("a"), Value::F64(0.1)],
            vec![Value::I64(2), Value::from("b"), Value::F64(0.2)],
        ],
    );

    let bags = cursor
        .dynamic_rows()
        .collect::<Result<Vec<_>>>()
        .unwrap();

    assert_eq!(bags.len(), 2);
    assert_eq!(bags[0].len(), 3);
    let keys: Vec<_> = bags[0].keys().collect();
    assert_eq!(keys, vec!["id", "name", "score"]);
    assert_eq!(bags[1].get("name"), Some(&Value::from("b")));
}

#[test]
fn duplicate_columns_stay_distinct() {
    let cursor = MemCursor::single(
        [
            ("id", Type::I64),
            ("name", Type::String),
            ("name", Type::String),
        ],
        vec![vec![Value::I64(1), Value::from("first"), Value::from("second")]],
    );

    let bags = cursor
        .dynamic_rows()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    let bag = &bags[0];

    // both entries enumerable, in column order
    assert_eq!(bag.len(), 3);
    let keys: Vec<_> = bag.keys().collect();
    assert_eq!(keys, vec!["id", "name", "name"]);
    assert_eq!(bag.get_index(1), Some(("name", &Value::from("first"))));
    assert_eq!(bag.get_index(2), Some(("name", &Value::from("second"))));

    // the later duplicate shadows on read
    assert_eq!(bag.get("name"), Some(&Value::from("second")));
}

#[test]
fn nulls_pass_through_untouched() {
    let cursor = MemCursor::single(
        [("id", Type::I64), ("note", Type::String)],
        vec![vec![Value::I64(1), Value::Null]],
    );

    let bags = cursor
        .dynamic_rows()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(bags[0].get("note"), Some(&Value::Null));
}
