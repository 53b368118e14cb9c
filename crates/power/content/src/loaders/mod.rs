//! Content loaders for reading power data from files.
//!
//! Every loader reads a single file and maps I/O and parse failures into
//! [`anyhow::Error`] values that name the offending path.

pub mod affix;
pub mod config;
pub mod factory;
pub mod rules;

pub use affix::{AffixCatalog, AffixLoader, LoadMode};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use rules::RulesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
