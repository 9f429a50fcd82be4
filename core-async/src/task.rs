//! Task spawning and blocking offload.
//!
//! Decoding a media container and writing artwork are blocking operations.
//! They go through [`spawn_blocking`] so the async workers stay free, while
//! the orchestration around them is an ordinary [`spawn`]ed future.

pub use tokio::task::{spawn_blocking, JoinError, JoinHandle};

/// Spawns a future onto the current runtime.
///
/// The future may be polled on any worker thread, so it must be `Send`.
///
/// # Panics
///
/// Panics when called outside of a runtime context.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # core_async::runtime::block_on(async {
/// let handle = spawn(async { "done" });
/// assert_eq!(handle.await.unwrap(), "done");
/// # });
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for joined tasks.
pub type Result<T> = std::result::Result<T, JoinError>;
