//! Affix catalog loader.

use std::path::Path;

use power_core::{AffixTemplate, PowerError, Registry};
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Affix catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffixCatalog {
    pub affixes: Vec<AffixTemplate>,
}

/// How a loader reacts to a template that fails validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// The first invalid template fails the whole load.
    #[default]
    Strict,
    /// Invalid templates are logged and skipped.
    Lenient,
}

/// Loader for affix catalogs from RON files.
pub struct AffixLoader;

impl AffixLoader {
    /// Load and validate every template in a catalog, failing on the first
    /// invalid one.
    pub fn load(path: &Path) -> LoadResult<Vec<AffixTemplate>> {
        Self::load_with(path, LoadMode::Strict)
    }

    pub fn load_with(path: &Path, mode: LoadMode) -> LoadResult<Vec<AffixTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content, mode)
            .map_err(|e| anyhow::anyhow!("Failed to load affix catalog {}: {}", path.display(), e))
    }

    /// Parse catalog text without touching the filesystem.
    ///
    /// Optional fields such as `group` and `max_level` may be written bare
    /// (`group: "armor"`) or wrapped (`group: Some("armor")`).
    pub fn parse(content: &str, mode: LoadMode) -> LoadResult<Vec<AffixTemplate>> {
        let catalog: AffixCatalog = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse affix catalog RON: {}", e))?;

        let mut affixes = Vec::with_capacity(catalog.affixes.len());
        for template in catalog.affixes {
            match (template.validate(), mode) {
                (Ok(()), _) => affixes.push(template),
                (Err(err), LoadMode::Strict) => return Err(err.into()),
                (Err(err), LoadMode::Lenient) => {
                    tracing::warn!(
                        affix = %template.id,
                        code = err.error_code(),
                        %err,
                        "skipping invalid affix"
                    );
                }
            }
        }
        Ok(affixes)
    }

    /// Load a catalog straight into `registry`. Returns how many templates
    /// were registered.
    ///
    /// In lenient mode duplicate ids are skipped like invalid templates.
    pub fn load_into(path: &Path, registry: &Registry, mode: LoadMode) -> LoadResult<usize> {
        let affixes = Self::load_with(path, mode)?;
        let mut registered = 0;
        for template in affixes {
            let id = template.id.clone();
            match (registry.register(template), mode) {
                (Ok(_), _) => registered += 1,
                (Err(err), LoadMode::Strict) => {
                    return Err(anyhow::anyhow!(
                        "Failed to register affix '{}' from {}: {}",
                        id,
                        path.display(),
                        err
                    ));
                }
                (Err(err), LoadMode::Lenient) => {
                    tracing::warn!(
                        affix = %id,
                        code = err.error_code(),
                        %err,
                        "skipping unregistrable affix"
                    );
                }
            }
        }
        tracing::debug!(registered, path = %path.display(), "affix catalog loaded");
        Ok(registered)
    }
}
