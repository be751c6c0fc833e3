pub mod bag;
pub use bag::PropertyBag;

pub mod cursor;
pub use cursor::{DynamicRows, GroupedRows, NoAssemble, Rows};

mod entity;
pub use entity::{Entity, FromValue};

pub mod mapping;
pub use mapping::{ColumnMapper, ColumnMapping, Resolution};

mod mapper;
pub use mapper::{CursorExt, Mapper};

pub mod plan;
pub use plan::MapPlan;

pub mod split;
pub use split::{EntityGroup, GroupOptions, GroupPlan};

pub use rowbind_core::{
    bail, driver, err, schema, ty, value, Cursor, EntityDescriptor, EnumTag, Error,
    FieldDescriptor, Fingerprint, Result, Type, Value,
};
