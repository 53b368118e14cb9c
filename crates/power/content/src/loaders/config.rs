//! Power configuration loader.

use std::path::Path;

use power_core::PowerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for power configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Every table and key is optional; missing values fall back to the
    /// built-in defaults.
    pub fn load(path: &Path) -> LoadResult<PowerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<PowerConfig> {
        let config: PowerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_core::{AffixLimits, CountRange, GeneratorConfig, WeightingConfig};

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), PowerConfig::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [weighting]
            rarity_step = 0.5

            [generator]
            prefixes = { min = 2, max = 2 }

            [generator.limits]
            max_prefixes = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.weighting.rarity_step, 0.5);
        assert_eq!(
            config.weighting.rarity_base,
            WeightingConfig::DEFAULT_RARITY_BASE
        );
        assert_eq!(config.generator.prefixes, CountRange::exactly(2));
        assert_eq!(
            config.generator.suffixes,
            GeneratorConfig::default().suffixes
        );
        assert_eq!(config.generator.limits.max_prefixes, 4);
        assert_eq!(
            config.generator.limits.max_suffixes,
            AffixLimits::DEFAULT_MAX_SUFFIXES
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = ConfigLoader::parse("[weighting]\nmin_weight = \"one\"").unwrap_err();
        assert!(err.to_string().contains("TOML"), "{err}");
    }
}
