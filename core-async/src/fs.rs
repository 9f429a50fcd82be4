//! Async filesystem helpers.
//!
//! Only the operations the artwork cache needs are exposed.

pub use tokio::fs::{create_dir_all, hard_link, remove_file, rename, try_exists, write};
