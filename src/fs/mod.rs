//! File helpers rooted at a single base directory
//!
//! # Modules
//!
//! - [`path`]: Base directory and deterministic path building
//! - [`size`]: File/directory byte sizes and human-readable formatting
//! - [`ops`]: Existence checks and folder/file lifecycle operations
//! - [`error`]: Error type for lifecycle operations

pub mod error;
pub mod ops;
pub mod path;
pub mod size;

pub use error::FileIoError;
pub use ops::{FileUtils, delete, exists};
pub use path::{base_path, build_path};
pub use size::{ByteSize, SymlinkPolicy, UnitConvention};
