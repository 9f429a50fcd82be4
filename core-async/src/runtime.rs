//! Runtime handles.
//!
//! Re-exports the Tokio runtime types so downstream crates can capture a
//! [`Handle`] (for example to drive an async bridge call from inside a
//! blocking decoder thread) without a direct Tokio dependency.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}
