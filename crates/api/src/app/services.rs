use std::sync::Arc;

use entitle_engine::EntitlementEngine;
use entitle_store::{
    InMemoryDecisionCache, InMemoryIdentityStore, InMemoryLicenseStore, InMemoryRuleStore,
};

/// Wired service graph shared by all handlers.
///
/// The concrete in-memory store handles stay visible because identity and
/// rule provisioning is external to this service: dev setups and tests seed
/// through them directly.
#[derive(Clone)]
pub struct AppServices {
    pub engine: Arc<EntitlementEngine>,
    pub identities: Arc<InMemoryIdentityStore>,
    pub rules: Arc<InMemoryRuleStore>,
}

pub fn build_services() -> AppServices {
    let licenses = Arc::new(InMemoryLicenseStore::new());
    let identities = Arc::new(InMemoryIdentityStore::new());
    let rules = Arc::new(InMemoryRuleStore::new());
    let cache = Arc::new(InMemoryDecisionCache::new());

    let engine = Arc::new(EntitlementEngine::new(
        licenses,
        identities.clone(),
        rules.clone(),
        cache,
    ));

    AppServices {
        engine,
        identities,
        rules,
    }
}
