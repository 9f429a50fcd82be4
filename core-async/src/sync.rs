//! Synchronization primitives.
//!
//! The unbounded `mpsc` channel feeds the response delivery thread; its
//! receiver supports `blocking_recv`, so the consumer can be a plain OS
//! thread outside of the runtime. `oneshot` turns a reply callback back into
//! an awaitable value.

pub use tokio::sync::{mpsc, oneshot};
