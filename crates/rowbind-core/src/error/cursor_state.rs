use super::Error;

/// Error when an operation is attempted on a cursor in an invalid state,
/// such as reading from a released cursor.
#[derive(Debug)]
pub(super) struct CursorStateError {
    message: Box<str>,
}

impl std::error::Error for CursorStateError {}

impl core::fmt::Display for CursorStateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid cursor state: {}", self.message)
    }
}

impl Error {
    /// Creates a cursor state error.
    pub fn cursor_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::CursorState(CursorStateError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a cursor state error.
    pub fn is_cursor_state(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CursorState(_))
    }
}
