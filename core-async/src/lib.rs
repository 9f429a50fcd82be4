//! Async runtime facade for the metadata retriever.
//!
//! Every other crate in the workspace goes through this crate for task
//! spawning, blocking offload, filesystem access and channels instead of
//! naming Tokio directly. Keeping the executor behind one seam means the
//! retriever can be hosted by whatever runtime the embedding application
//! already drives, as long as a Tokio handle is reachable.
//!
//! # Modules
//!
//! - `task`: spawning futures and offloading blocking decoder work
//! - `fs`: async filesystem helpers used by the artwork cache
//! - `sync`: channels used to hand responses to the delivery thread
//! - `time`: durations and timeouts
//! - `runtime`: runtime handles and a `block_on` helper
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! # core_async::runtime::block_on(async {
//! let handle = task::spawn_blocking(|| 6 * 7);
//! assert_eq!(handle.await.unwrap(), 42);
//! # });
//! ```

pub mod fs;
pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::{spawn, spawn_blocking};
pub use time::Duration;
