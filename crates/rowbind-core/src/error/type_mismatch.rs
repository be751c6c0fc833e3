use super::Error;

/// Error when a column value cannot be converted to the destination field's
/// type.
///
/// Identifies the column, the source type, the destination member and the
/// destination type. Raised at compile time for statically inconvertible
/// type pairs and at row time for value-dependent failures (overflow, parse
/// failures, unknown enum variants).
#[derive(Debug)]
pub(super) struct TypeMismatchError {
    column: Box<str>,
    source: Box<str>,
    member: Box<str>,
    target: Box<str>,
}

impl std::error::Error for TypeMismatchError {}

impl core::fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot convert column `{}` ({}) to `{}` ({})",
            self.column, self.source, self.member, self.target
        )
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        source: impl core::fmt::Display,
        member: impl Into<String>,
        target: impl core::fmt::Display,
    ) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatchError {
            column: column.into().into(),
            source: source.to_string().into(),
            member: member.into().into(),
            target: target.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeMismatch(_))
    }
}
