// pup-common/src/lib.rs
pub mod catalog;
pub mod config;
pub mod error;
pub mod stats;

// Re-export key types
pub use catalog::{CatalogEntry, FileSpec, RawCatalogEntry};
pub use config::Config;
pub use error::{PupError, Result};
pub use stats::RunStats;
