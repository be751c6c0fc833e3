use super::Error;

/// Error when multi-type row splitting cannot locate a sub-type's boundary
/// column.
#[derive(Debug)]
pub(super) struct AmbiguousSplitError {
    target: Box<str>,
    column: Option<Box<str>>,
}

impl std::error::Error for AmbiguousSplitError {}

impl core::fmt::Display for AmbiguousSplitError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.column {
            Some(column) => write!(
                f,
                "cannot locate boundary column `{}` for type `{}`",
                column, self.target
            ),
            None => write!(
                f,
                "type `{}` has no identifier field and no id column override",
                self.target
            ),
        }
    }
}

impl Error {
    /// Creates an ambiguous split error.
    ///
    /// `column` is the boundary column that was searched for, if one was
    /// known at all.
    pub fn ambiguous_split(
        target: impl Into<String>,
        column: Option<impl Into<String>>,
    ) -> Error {
        Error::from(super::ErrorKind::AmbiguousSplit(AmbiguousSplitError {
            target: target.into().into(),
            column: column.map(|c| c.into().into()),
        }))
    }

    /// Returns `true` if this error is an ambiguous split error.
    pub fn is_ambiguous_split(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousSplit(_))
    }
}
