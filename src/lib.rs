//! Small client-side helpers: file lifecycle and sizing under a documents root,
//! a tagged debug console logger, and App Store version lookup and comparison.
//!
//! # Modules
//!
//! - [`config`]: Constants, directory resolution and serde configuration
//! - [`fs`]: Path building, size measurement and folder/file lifecycle operations
//! - [`store`]: Remote version lookup and per-field version comparison
//! - [`debug_log`]: Debug-build-only tagged console output
//! - [`logging`]: `tracing` subscriber setup for binaries

pub mod config;
pub mod debug_log;
pub mod fs;
pub mod logging;
pub mod store;
