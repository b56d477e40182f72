//! # jobq API
//!
//! Capability traits shared by every jobq queue and worker pool implementation.
//! The concrete containers and the pool live in the `jobq` crate; this crate only
//! fixes the contracts they honour so callers can program against a trait object.
//!
//! ## Core Components
//!
//! - **Bounded queue**: a thread-safe FIFO with a fixed capacity, a non-blocking
//!   `enqueue`, a blocking `dequeue` and a one-way deactivation
//! - **Job handler**: the single-method capability a worker pool invokes once per job
//! - **Errors**: rejected enqueues hand the item back; dequeue failures say why
//!
//! ## Usage Example
//!
//! ```rust
//! use jobq_api::{BoundedQueue, EnqueueError};
//!
//! fn offer<Q: BoundedQueue<u32>>(queue: &Q, value: u32) -> bool {
//!     match queue.enqueue(value) {
//!         Ok(()) => true,
//!         Err(EnqueueError::Full(_)) => false,
//!         Err(EnqueueError::Inactive(_)) => false,
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`queue`]: the `BoundedQueue` trait
//! - [`handler`]: the `JobHandler` trait and `JobOutcome` conversion
//! - [`errors`]: queue error types

pub mod errors;
pub mod handler;
pub mod queue;

pub use errors::{DequeueError, EnqueueError};
pub use handler::{JobHandler, JobOutcome};
pub use queue::{BoundedQueue, SharedQueue};
