use core::alloc::Layout;

/// Errors reported by fallible table and buffer operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The computed capacity exceeds what the table or allocator can
    /// represent, or growth has saturated while the table is full.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The global allocator failed to provide memory for `layout`.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout of the failed allocation.
        layout: Layout,
    },
}

/// Converts a fallible result into the infallible behavior of `alloc`
/// collections: allocation failures abort through `handle_alloc_error`,
/// capacity overflows panic.
#[inline]
pub(crate) fn unwrap_infallible<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::AllocError { layout }) => alloc::alloc::handle_alloc_error(layout),
        Err(Error::CapacityOverflow) => panic!("capacity overflow"),
        Err(Error::KeyNotFound) => unreachable!("key lookups never go through allocation paths"),
    }
}
