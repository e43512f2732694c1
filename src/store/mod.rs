//! App Store version lookup and comparison
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Lookup    │────▶│   Checker    │────▶│  Dispatcher  │
//! │ (HTTP fetch) │     │ (orchestrate)│     │  (callbacks) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │   Compare    │
//!                      │ (per field)  │
//!                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`lookup`]: `VersionLookup` trait and the iTunes lookup client
//! - [`compare`]: Field-by-field version comparison
//! - [`checker`]: Fetch-then-compare orchestration, awaitable and callback forms
//! - [`error`]: Error type for lookups

pub mod checker;
pub mod compare;
pub mod error;
pub mod lookup;

pub use checker::{
    Dispatcher, ImmediateDispatcher, MainQueue, QueueDispatcher, StoreVersion, Task,
    VersionCheckResult,
};
pub use compare::{VersionDifference, compare_versions};
pub use error::LookupError;
pub use lookup::{AppStoreLookup, VersionLookup};
