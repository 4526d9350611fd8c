use std::sync::Arc;

use chrono::{Duration, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use entitle_auth::{Permission, Role, RoleGrant, Subject};
use entitle_core::{LicenseRecord, Rule};
use entitle_engine::EntitlementEngine;
use entitle_store::{
    InMemoryDecisionCache, InMemoryIdentityStore, InMemoryLicenseStore, InMemoryRuleStore,
    LicenseStore,
};

fn build_engine() -> (
    Arc<InMemoryLicenseStore>,
    Arc<InMemoryIdentityStore>,
    Arc<InMemoryRuleStore>,
    EntitlementEngine,
) {
    let licenses = Arc::new(InMemoryLicenseStore::new());
    let identities = Arc::new(InMemoryIdentityStore::new());
    let rules = Arc::new(InMemoryRuleStore::new());
    let cache = Arc::new(InMemoryDecisionCache::new());
    let engine = EntitlementEngine::new(
        licenses.clone(),
        identities.clone(),
        rules.clone(),
        cache,
    );
    (licenses, identities, rules, engine)
}

fn bench_license_fast_path(c: &mut Criterion) {
    let (licenses, _identities, _rules, engine) = build_engine();
    licenses
        .save(LicenseRecord::issue("c1", "u1", Utc::now(), Duration::days(30)))
        .unwrap();
    // Prime the cache so the steady state is measured.
    engine.is_eligible("u1", "c1").unwrap();

    c.bench_function("eligibility/license_fast_path", |b| {
        b.iter(|| engine.is_eligible(black_box("u1"), black_box("c1")).unwrap())
    });
}

fn bench_rbac_rule_path(c: &mut Criterion) {
    let (_licenses, identities, rules, engine) = build_engine();
    identities
        .upsert_role(RoleGrant::new(
            Role::new("Admin"),
            vec![Permission::new("LICENSE_ACCESS"), Permission::new("DOWNLOAD")],
        ))
        .unwrap();
    identities
        .upsert_subject(Subject::new("admin1", vec![Role::new("Admin")]))
        .unwrap();
    for i in 0..8 {
        rules
            .add_rule(Rule::new("docX", "Admin", if i % 2 == 0 { "LICENSE_ACCESS" } else { "DOWNLOAD" }))
            .unwrap();
    }

    c.bench_function("eligibility/rbac_rule_path", |b| {
        b.iter(|| engine.is_eligible(black_box("admin1"), black_box("docX")).unwrap())
    });
}

criterion_group!(benches, bench_license_fast_path, bench_rbac_rule_path);
criterion_main!(benches);
