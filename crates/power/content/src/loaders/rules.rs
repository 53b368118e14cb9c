//! Derived-attribute rules loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::rules::DerivedRules;

/// Loader for derived-attribute rules from RON files.
pub struct RulesLoader;

impl RulesLoader {
    pub fn load(path: &Path) -> LoadResult<DerivedRules> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load rules {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<DerivedRules> {
        let rules: DerivedRules = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse derived rules RON: {}", e))?;
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_core::{AttributeKind, AttributeManager};

    #[test]
    fn parsed_rules_install_as_formulas() {
        let rules = RulesLoader::parse(
            r#"(
                rules: [
                    (attribute: evasion, base: 5.0, terms: [(dexterity, 3.0)]),
                    (attribute: block_chance, terms: [(strength, 0.1)]),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules[1].base, 0.0);

        let hero = AttributeManager::with_bases([(AttributeKind::Dexterity, 10.0)]);
        rules.install(&hero).unwrap();
        assert_eq!(hero.get(AttributeKind::Evasion), 35.0);
    }
}
