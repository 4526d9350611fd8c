//! Per-content rule lookups.

use std::collections::HashMap;
use std::sync::RwLock;

use entitle_core::Rule;

use crate::error::{StoreError, StoreResult};

/// Rule lookups consumed by the engine when no license record exists.
pub trait RuleStore: Send + Sync {
    fn find_by_content_id(&self, content_id: &str) -> StoreResult<Vec<Rule>>;
}

/// In-memory rule store; `add_rule` is the provisioning surface.
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<HashMap<String, Vec<Rule>>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&self, rule: Rule) -> StoreResult<()> {
        let mut rules = self.rules.write().map_err(|_| StoreError::LockPoisoned)?;
        rules.entry(rule.content_id.clone()).or_default().push(rule);
        Ok(())
    }
}

impl RuleStore for InMemoryRuleStore {
    fn find_by_content_id(&self, content_id: &str) -> StoreResult<Vec<Rule>> {
        let rules = self.rules.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(rules.get(content_id).cloned().unwrap_or_default())
    }
}
