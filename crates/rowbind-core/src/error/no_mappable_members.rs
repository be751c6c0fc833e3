use super::Error;

/// Error when a target type exposes no fields the registry could bind to.
///
/// Surfaced when the mapping plan is compiled, on first use of the type, so
/// a silently no-op mapping never reaches row processing.
#[derive(Debug)]
pub(super) struct NoMappableMembersError {
    target: Box<str>,
}

impl std::error::Error for NoMappableMembersError {}

impl core::fmt::Display for NoMappableMembersError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "type `{}` has no mappable fields", self.target)
    }
}

impl Error {
    /// Creates a no mappable members error.
    pub fn no_mappable_members(target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoMappableMembers(NoMappableMembersError {
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error is a no mappable members error.
    pub fn is_no_mappable_members(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoMappableMembers(_))
    }
}
