//! Catalog of every known affix template.
//!
//! A registry is an ordinary value: content loading populates it once,
//! then it is shared by reference with whatever builds pools or generators.
//! Tests construct isolated registries freely.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::AffixError;
use super::instance::{AffixInstance, InstanceRecord};
use super::pool::{AffixPool, FilterCriteria};
use super::template::{AffixCategory, AffixTemplate};
use crate::config::WeightingConfig;

#[derive(Debug, Default)]
pub struct Registry {
    templates: RwLock<BTreeMap<String, Arc<AffixTemplate>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<AffixTemplate>>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<AffixTemplate>>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and register a template. Ids must be unique.
    pub fn register(&self, template: AffixTemplate) -> Result<Arc<AffixTemplate>, AffixError> {
        template.validate()?;
        let mut templates = self.write();
        if templates.contains_key(&template.id) {
            return Err(AffixError::DuplicateTemplate(template.id));
        }
        let template = Arc::new(template);
        templates.insert(template.id.clone(), Arc::clone(&template));
        Ok(template)
    }

    /// Register templates in order, stopping at the first failure.
    ///
    /// Templates registered before the failure stay registered.
    pub fn register_all(
        &self,
        templates: impl IntoIterator<Item = AffixTemplate>,
    ) -> Result<usize, AffixError> {
        let mut count = 0;
        for template in templates {
            self.register(template)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> Option<Arc<AffixTemplate>> {
        self.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Every template, sorted by id.
    pub fn all(&self) -> Vec<Arc<AffixTemplate>> {
        self.read().values().cloned().collect()
    }

    pub fn by_category(&self, category: AffixCategory) -> Vec<Arc<AffixTemplate>> {
        self.read()
            .values()
            .filter(|t| t.category == category)
            .cloned()
            .collect()
    }

    /// A pool over every registered template, with default weighting.
    pub fn pool(&self) -> AffixPool {
        self.pool_with(WeightingConfig::default(), &FilterCriteria::default())
    }

    /// A pool over the templates matching `criteria`, with default weighting.
    pub fn pool_filtered(&self, criteria: &FilterCriteria) -> AffixPool {
        self.pool_with(WeightingConfig::default(), criteria)
    }

    pub fn pool_with(&self, weighting: WeightingConfig, criteria: &FilterCriteria) -> AffixPool {
        let pool = AffixPool::with_weighting(weighting);
        for template in self.read().values().filter(|t| criteria.matches(t)) {
            pool.add(Arc::clone(template));
        }
        pool
    }

    /// Rebuild a persisted instance against this registry's templates.
    pub fn restore_instance(&self, record: &InstanceRecord) -> Result<AffixInstance, AffixError> {
        let template = self
            .get(&record.affix_id)
            .ok_or_else(|| AffixError::NotPresent(record.affix_id.clone()))?;
        AffixInstance::restore(record.id, template, &record.values)
    }
}
