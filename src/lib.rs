//! Workspace façade crate.
//!
//! Host applications can depend on `metadata-retriever-workspace` and pick a
//! feature (`desktop-shims` for reqwest-backed network sources, or
//! `embedded-only` for local files only) instead of wiring each crate.

#[cfg(any(feature = "desktop-shims", feature = "embedded-only"))]
pub use core_service::*;
