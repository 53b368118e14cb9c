//! Content factory for building registries and generators from data files.

use std::path::{Path, PathBuf};

use power_core::{Generator, PowerConfig, Registry};

use crate::loaders::{AffixLoader, ConfigLoader, LoadMode, LoadResult, RulesLoader};
use crate::rules::DerivedRules;

/// Content factory that loads all power content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml    (optional, defaults when absent)
/// ├── affixes.ron
/// └── derived.ron    (optional, standard rules when absent)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
    mode: LoadMode,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const AFFIX_FILE: &'static str = "affixes.ron";
    pub const RULES_FILE: &'static str = "derived.ron";

    /// Creates a new content factory pointing to a data directory.
    ///
    /// Affix catalogs are loaded strictly unless [`lenient`](Self::lenient)
    /// is requested.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            mode: LoadMode::Strict,
        }
    }

    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.mode = LoadMode::Lenient;
        self
    }

    /// Load power configuration from `config.toml`, or defaults if the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<PowerConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(PowerConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the affix catalog from `affixes.ron` into a fresh registry.
    pub fn load_registry(&self) -> LoadResult<Registry> {
        let registry = Registry::new();
        let path = self.data_dir.join(Self::AFFIX_FILE);
        AffixLoader::load_into(&path, &registry, self.mode)?;
        Ok(registry)
    }

    /// Load derived-attribute rules from `derived.ron`, or the standard rules
    /// if the file does not exist.
    pub fn load_rules(&self) -> LoadResult<DerivedRules> {
        let path = self.data_dir.join(Self::RULES_FILE);
        if !path.exists() {
            return Ok(DerivedRules::standard());
        }
        RulesLoader::load(&path)
    }

    /// Load config and affixes and build a generator over the whole catalog.
    pub fn load_generator(&self) -> LoadResult<(Registry, Generator)> {
        let config = self.load_config()?;
        let registry = self.load_registry()?;
        let generator = Generator::from_registry(&registry, &config);
        Ok((registry, generator))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
