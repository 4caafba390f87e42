//! Error types for queue operations.

use thiserror::Error;

/// Errors returned by [`IndexedHeap`](crate::IndexedHeap).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistError {
    /// The key already has an entry in the queue.
    #[error("key is already queued")]
    AlreadyQueued,
}
