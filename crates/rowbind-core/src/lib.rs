#[macro_use]
mod error;
pub use error::Error;

pub mod driver;
pub use driver::Cursor;

pub mod schema;
pub use schema::{EntityDescriptor, FieldDescriptor, Fingerprint};

pub mod ty;
pub use ty::{EnumTag, Type};

pub mod value;
pub use value::Value;

/// A Result type alias that uses rowbind's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
