//! Error kinds returned by fallible `ConciseSet` operations.

/// Everything that can go wrong while building or querying a [`crate::ConciseSet`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `first()`/`last()` (or similar) was called on an empty set.
    #[error("set is empty")]
    Empty,
    /// A value fell outside `[0, MAX_ALLOWED]`, or a range had `from > to`.
    #[error("value out of range")]
    OutOfRange,
    /// An iterator observed a generation mismatch: the set was mutated while iterating.
    #[error("concurrent modification")]
    ConcurrentModification,
    /// The operation is not supported by this type (e.g. removing through a bit iterator).
    #[error("operation not supported")]
    Unsupported,
}
