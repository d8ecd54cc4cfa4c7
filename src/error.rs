//! Error type for the checked container operations.
//!
//! The unchecked operations (`remove`, `with_capacity`) treat these conditions
//! as caller bugs and panic with the same message.

/// Errors returned by the `try_*` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// A position did not refer to an occupied element.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Position that was requested
        index: usize,
        /// Number of elements at the time of the call
        len: usize,
    },
    /// A capacity could not be rounded up to a power of two.
    #[error("capacity overflow: {requested} has no representable power of two")]
    CapacityOverflow {
        /// Capacity that was requested
        requested: usize,
    },
}
