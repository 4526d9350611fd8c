//! The entitlement engine: decision procedure + license lifecycle.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use entitle_auth::{Permission, RoleGrant, Subject};
use entitle_core::{DomainError, DomainResult, LicenseRecord, require_id};
use entitle_store::{DecisionCache, IdentityStore, LicenseStore, RuleStore};

use crate::decision::{DecisionReason, EligibilityDecision};
use crate::policy::EligibilityPolicy;

/// Combines license, RBAC, and rule state into eligibility decisions, and
/// owns the license create/update/delete lifecycle.
///
/// The read path performs independent store lookups without exclusive
/// locking. Each mutation runs as one atomic unit (read current state,
/// decide, write, update cache) serialized by an internal lock, so
/// concurrent creates for one content id resolve to a single winner and
/// racing update/delete calls observe `NotFound` rather than silently
/// succeeding.
pub struct EntitlementEngine {
    licenses: Arc<dyn LicenseStore>,
    identities: Arc<dyn IdentityStore>,
    rules: Arc<dyn RuleStore>,
    cache: Arc<dyn DecisionCache>,
    policy: EligibilityPolicy,
    mutation: Mutex<()>,
}

impl EntitlementEngine {
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        identities: Arc<dyn IdentityStore>,
        rules: Arc<dyn RuleStore>,
        cache: Arc<dyn DecisionCache>,
    ) -> Self {
        Self::with_policy(licenses, identities, rules, cache, EligibilityPolicy::default())
    }

    pub fn with_policy(
        licenses: Arc<dyn LicenseStore>,
        identities: Arc<dyn IdentityStore>,
        rules: Arc<dyn RuleStore>,
        cache: Arc<dyn DecisionCache>,
        policy: EligibilityPolicy,
    ) -> Self {
        Self {
            licenses,
            identities,
            rules,
            cache,
            policy,
            mutation: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    // ─────────────────────────────────────────────────────────────────────
    // Eligibility
    // ─────────────────────────────────────────────────────────────────────

    /// Whether `subject_id` may access `content_id` right now.
    pub fn is_eligible(&self, subject_id: &str, content_id: &str) -> DomainResult<bool> {
        Ok(self.evaluate(subject_id, content_id, Utc::now())?.eligible)
    }

    /// Full decision procedure at an explicit evaluation instant.
    ///
    /// Strict order, short-circuiting on the first applicable signal:
    /// 1. license snapshot from the decision cache;
    /// 2. license record from the store (cached read-through on hit) —
    ///    authoritative when present, RBAC and rules are not consulted;
    /// 3. privileged-role gate;
    /// 4. baseline-permission gate;
    /// 5. per-content rules, all of which must be satisfied.
    ///
    /// Pure with respect to store state apart from the read-through cache
    /// fill; RBAC/rule-derived outcomes are never cached.
    pub fn evaluate(
        &self,
        subject_id: &str,
        content_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<EligibilityDecision> {
        let subject_id = require_id(subject_id, "subject id")?;
        let content_id = require_id(content_id, "content id")?;

        tracing::debug!(subject_id, content_id, "evaluating eligibility");

        if let Some(license) = self.cache.get(content_id)? {
            return Ok(Self::decide_from_license(&license, subject_id, now));
        }

        if let Some(license) = self.licenses.find_by_content_id(content_id)? {
            self.cache.put(license.clone())?;
            return Ok(Self::decide_from_license(&license, subject_id, now));
        }

        self.evaluate_unlicensed(subject_id, content_id)
    }

    fn decide_from_license(
        license: &LicenseRecord,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> EligibilityDecision {
        if license.owner_subject_id != subject_id {
            EligibilityDecision::denied(DecisionReason::NotLicenseOwner)
        } else if license.expiry_at <= now {
            EligibilityDecision::denied(DecisionReason::LicenseExpired)
        } else {
            EligibilityDecision::granted(DecisionReason::LicenseOwned)
        }
    }

    /// RBAC + rule path, entered only when no license record exists.
    fn evaluate_unlicensed(
        &self,
        subject_id: &str,
        content_id: &str,
    ) -> DomainResult<EligibilityDecision> {
        let subject = self
            .identities
            .find_subject(subject_id)?
            .ok_or_else(|| DomainError::not_found(format!("subject {subject_id}")))?;

        let privileged = self
            .policy
            .privileged_roles
            .iter()
            .any(|role| subject.has_role(role.as_str()));
        if !privileged {
            return Ok(EligibilityDecision::denied(DecisionReason::MissingPrivilegedRole));
        }

        let grants = self.resolve_grants(&subject)?;

        if !Self::any_grant(&grants, &self.policy.required_permission) {
            return Ok(EligibilityDecision::denied(
                DecisionReason::MissingBaselinePermission,
            ));
        }

        for rule in self.rules.find_by_content_id(content_id)? {
            let role_satisfied = subject.has_role(&rule.required_role);
            let permission_satisfied =
                Self::any_grant(&grants, &Permission::new(rule.required_permission.clone()));

            if !role_satisfied || !permission_satisfied {
                return Ok(EligibilityDecision::denied(DecisionReason::RuleUnsatisfied));
            }
        }

        // All gates passed and every rule matched (vacuously when none
        // exist): eligible.
        Ok(EligibilityDecision::granted(DecisionReason::RequirementsSatisfied))
    }

    fn resolve_grants(&self, subject: &Subject) -> DomainResult<Vec<RoleGrant>> {
        let mut grants = Vec::with_capacity(subject.roles.len());
        for role in &subject.roles {
            // A role name with no role record grants nothing.
            if let Some(grant) = self.identities.find_role_by_name(role.as_str())? {
                grants.push(grant);
            }
        }
        Ok(grants)
    }

    fn any_grant(grants: &[RoleGrant], permission: &Permission) -> bool {
        grants.iter().any(|grant| grant.grants(permission))
    }

    // ─────────────────────────────────────────────────────────────────────
    // License lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Look up the license for `content_id`. Store-direct; the cache serves
    /// the eligibility path only.
    pub fn get_license(&self, content_id: &str) -> DomainResult<LicenseRecord> {
        let content_id = require_id(content_id, "content id")?;
        self.licenses
            .find_by_content_id(content_id)?
            .ok_or_else(|| DomainError::not_found(format!("no license for content id {content_id}")))
    }

    pub fn get_all_licenses(&self) -> DomainResult<Vec<LicenseRecord>> {
        Ok(self.licenses.find_all()?)
    }

    /// Issue a license for `content_id` to `subject_id`, valid for the
    /// policy's validity window from now. Populates the decision cache in
    /// the same unit of work.
    pub fn create_license(&self, content_id: &str, subject_id: &str) -> DomainResult<LicenseRecord> {
        let content_id = require_id(content_id, "content id")?;
        let subject_id = require_id(subject_id, "subject id")?;

        let _guard = self.lock_mutations()?;

        if self.licenses.find_by_content_id(content_id)?.is_some() {
            return Err(DomainError::already_exists(format!(
                "license already exists for content id {content_id}"
            )));
        }

        let record = LicenseRecord::issue(
            content_id,
            subject_id,
            Utc::now(),
            self.policy.license_validity,
        );
        let record = self.licenses.save(record)?;
        self.cache.put(record.clone())?;

        tracing::info!(content_id, subject_id, expiry_at = %record.expiry_at, "license created");
        Ok(record)
    }

    /// Replace the license for `record.content_id`, preserving the stored
    /// record's identity and creation instant. Refreshes the cache entry.
    pub fn update_license(&self, record: LicenseRecord) -> DomainResult<LicenseRecord> {
        let content_id = require_id(&record.content_id, "content id")?.to_string();
        require_id(&record.owner_subject_id, "subject id")?;

        let _guard = self.lock_mutations()?;

        let existing = self
            .licenses
            .find_by_content_id(&content_id)?
            .ok_or_else(|| {
                DomainError::not_found(format!("no license for content id {content_id}"))
            })?;

        let updated = LicenseRecord {
            id: existing.id,
            created_at: existing.created_at,
            content_id,
            ..record
        };
        let updated = self.licenses.save(updated)?;
        self.cache.put(updated.clone())?;

        tracing::info!(content_id = %updated.content_id, "license updated");
        Ok(updated)
    }

    /// Remove the license for `content_id` and evict its cache entry in the
    /// same logical operation.
    pub fn delete_license(&self, content_id: &str) -> DomainResult<()> {
        let content_id = require_id(content_id, "content id")?;

        let _guard = self.lock_mutations()?;

        if !self.licenses.delete_by_content_id(content_id)? {
            return Err(DomainError::not_found(format!(
                "no license for content id {content_id}"
            )));
        }
        self.cache.invalidate(content_id)?;

        tracing::info!(content_id, "license deleted");
        Ok(())
    }

    fn lock_mutations(&self) -> DomainResult<MutexGuard<'_, ()>> {
        self.mutation
            .lock()
            .map_err(|_| DomainError::store("mutation lock poisoned"))
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use entitle_auth::Role;
    use entitle_core::Rule;
    use entitle_store::{
        InMemoryDecisionCache, InMemoryIdentityStore, InMemoryLicenseStore, InMemoryRuleStore,
    };
    use proptest::prelude::*;

    struct Harness {
        licenses: Arc<InMemoryLicenseStore>,
        identities: Arc<InMemoryIdentityStore>,
        rules: Arc<InMemoryRuleStore>,
        cache: Arc<InMemoryDecisionCache>,
        engine: Arc<EntitlementEngine>,
    }

    impl Harness {
        fn new() -> Self {
            let licenses = Arc::new(InMemoryLicenseStore::new());
            let identities = Arc::new(InMemoryIdentityStore::new());
            let rules = Arc::new(InMemoryRuleStore::new());
            let cache = Arc::new(InMemoryDecisionCache::new());
            let engine = Arc::new(EntitlementEngine::new(
                licenses.clone(),
                identities.clone(),
                rules.clone(),
                cache.clone(),
            ));
            Self {
                licenses,
                identities,
                rules,
                cache,
                engine,
            }
        }

        fn seed_subject(&self, id: &str, roles: &[&'static str]) {
            self.identities
                .upsert_subject(Subject::new(id, roles.iter().map(|r| Role::new(*r)).collect()))
                .unwrap();
        }

        fn seed_role(&self, name: &'static str, permissions: &[&'static str]) {
            self.identities
                .upsert_role(RoleGrant::new(
                    Role::new(name),
                    permissions.iter().map(|p| Permission::new(*p)).collect(),
                ))
                .unwrap();
        }
    }

    #[test]
    fn blank_identifiers_are_invalid_arguments() {
        let h = Harness::new();
        assert!(matches!(
            h.engine.is_eligible("  ", "c1"),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            h.engine.is_eligible("u1", ""),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            h.engine.create_license("", "u1"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn license_owner_is_eligible_until_expiry() {
        let h = Harness::new();
        let record = h.engine.create_license("c1", "u1").unwrap();

        assert_eq!(record.expiry_at, record.created_at + Duration::days(30));
        assert!(h.engine.is_eligible("u1", "c1").unwrap());
        assert!(!h.engine.is_eligible("u2", "c1").unwrap());
    }

    #[test]
    fn expired_license_denies_with_reason() {
        let h = Harness::new();
        let now = Utc::now();
        h.licenses
            .save(LicenseRecord::issue("c1", "u1", now - Duration::days(40), Duration::days(30)))
            .unwrap();

        let decision = h.engine.evaluate("u1", "c1", now).unwrap();
        assert!(!decision.eligible);
        assert_eq!(decision.reason, DecisionReason::LicenseExpired);
    }

    #[test]
    fn expiry_boundary_is_not_eligible() {
        let h = Harness::new();
        let record = h.engine.create_license("c1", "u1").unwrap();

        let at_expiry = h.engine.evaluate("u1", "c1", record.expiry_at).unwrap();
        assert!(!at_expiry.eligible);

        let just_before = h
            .engine
            .evaluate("u1", "c1", record.expiry_at - Duration::seconds(1))
            .unwrap();
        assert!(just_before.eligible);
    }

    #[test]
    fn license_fast_path_ignores_identity_store() {
        // No subject record exists at all; the license alone decides.
        let h = Harness::new();
        h.engine.create_license("c1", "ghost").unwrap();
        assert!(h.engine.is_eligible("ghost", "c1").unwrap());
    }

    #[test]
    fn duplicate_create_conflicts_and_preserves_original() {
        let h = Harness::new();
        let original = h.engine.create_license("c1", "u1").unwrap();

        let err = h.engine.create_license("c1", "u2").unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        let stored = h.engine.get_license("c1").unwrap();
        assert_eq!(stored, original);
    }

    #[test]
    fn update_preserves_created_at_and_id() {
        let h = Harness::new();
        let original = h.engine.create_license("c1", "u1").unwrap();

        let mut input = original.clone();
        input.id = uuid::Uuid::now_v7();
        input.created_at = original.created_at - Duration::days(365);
        input.expiry_at = original.expiry_at + Duration::days(10);

        let updated = h.engine.update_license(input).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.expiry_at, original.expiry_at + Duration::days(10));
    }

    #[test]
    fn update_of_absent_license_is_not_found() {
        let h = Harness::new();
        let input = LicenseRecord::issue("missing", "u1", Utc::now(), Duration::days(30));
        assert!(matches!(
            h.engine.update_license(input),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let h = Harness::new();
        h.engine.create_license("c1", "u1").unwrap();

        h.engine.delete_license("c1").unwrap();
        assert!(matches!(
            h.engine.get_license("c1"),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            h.engine.delete_license("c1"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn delete_falls_through_to_rbac_path() {
        let h = Harness::new();
        h.seed_subject("u1", &[]);

        h.engine.create_license("c1", "u1").unwrap();
        assert!(h.engine.is_eligible("u1", "c1").unwrap());

        h.engine.delete_license("c1").unwrap();
        let decision = h.engine.evaluate("u1", "c1", Utc::now()).unwrap();
        assert!(!decision.eligible);
        assert_eq!(decision.reason, DecisionReason::MissingPrivilegedRole);
    }

    #[test]
    fn unknown_subject_on_rbac_path_is_not_found() {
        let h = Harness::new();
        assert!(matches!(
            h.engine.is_eligible("nobody", "c1"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn privileged_role_with_baseline_permission_is_eligible() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS"]);
        h.seed_subject("admin1", &["Admin"]);

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert!(decision.eligible);
        assert_eq!(decision.reason, DecisionReason::RequirementsSatisfied);
    }

    #[test]
    fn missing_privileged_role_denies() {
        let h = Harness::new();
        h.seed_role("Viewer", &["LICENSE_ACCESS"]);
        h.seed_subject("u1", &["Viewer"]);

        let decision = h.engine.evaluate("u1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::MissingPrivilegedRole);
    }

    #[test]
    fn missing_baseline_permission_denies() {
        let h = Harness::new();
        h.seed_role("Admin", &["SOMETHING_ELSE"]);
        h.seed_subject("admin1", &["Admin"]);

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::MissingBaselinePermission);
    }

    #[test]
    fn dangling_role_reference_grants_nothing() {
        // Subject holds "Admin" but no such role record exists.
        let h = Harness::new();
        h.seed_subject("admin1", &["Admin"]);

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::MissingBaselinePermission);
    }

    #[test]
    fn satisfied_rules_grant_access() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS", "DOWNLOAD"]);
        h.seed_subject("admin1", &["Admin"]);
        h.rules.add_rule(Rule::new("docX", "Admin", "DOWNLOAD")).unwrap();

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert!(decision.eligible);
    }

    #[test]
    fn rule_with_unheld_role_denies() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS"]);
        h.seed_subject("admin1", &["Admin"]);
        h.rules
            .add_rule(Rule::new("docX", "Auditor", "LICENSE_ACCESS"))
            .unwrap();

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::RuleUnsatisfied);
    }

    #[test]
    fn rule_with_unheld_permission_denies() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS"]);
        h.seed_subject("admin1", &["Admin"]);
        h.rules.add_rule(Rule::new("docX", "Admin", "EXPORT")).unwrap();

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::RuleUnsatisfied);
    }

    #[test]
    fn any_unsatisfied_rule_denies_even_with_others_satisfied() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS", "DOWNLOAD"]);
        h.seed_subject("admin1", &["Admin"]);
        h.rules.add_rule(Rule::new("docX", "Admin", "DOWNLOAD")).unwrap();
        h.rules.add_rule(Rule::new("docX", "Admin", "EXPORT")).unwrap();

        let decision = h.engine.evaluate("admin1", "docX", Utc::now()).unwrap();
        assert_eq!(decision.reason, DecisionReason::RuleUnsatisfied);
    }

    // ── cache coherence ──────────────────────────────────────────────────

    #[test]
    fn create_populates_cache_and_delete_evicts() {
        let h = Harness::new();
        h.engine.create_license("c1", "u1").unwrap();
        assert!(h.cache.get("c1").unwrap().is_some());

        h.engine.delete_license("c1").unwrap();
        assert!(h.cache.get("c1").unwrap().is_none());
    }

    #[test]
    fn update_refreshes_cache_entry() {
        let h = Harness::new();
        let original = h.engine.create_license("c1", "u1").unwrap();

        let mut input = original.clone();
        input.expiry_at = original.expiry_at + Duration::days(5);
        h.engine.update_license(input).unwrap();

        let cached = h.cache.get("c1").unwrap().unwrap();
        assert_eq!(cached.expiry_at, original.expiry_at + Duration::days(5));
    }

    #[test]
    fn query_path_reads_through_into_cache() {
        let h = Harness::new();
        // Seed the store directly, bypassing the engine's write path.
        h.licenses
            .save(LicenseRecord::issue("c1", "u1", Utc::now(), Duration::days(30)))
            .unwrap();
        assert!(h.cache.get("c1").unwrap().is_none());

        assert!(h.engine.is_eligible("u1", "c1").unwrap());
        assert!(h.cache.get("c1").unwrap().is_some());
    }

    #[test]
    fn rbac_outcomes_are_not_cached() {
        let h = Harness::new();
        h.seed_role("Admin", &["LICENSE_ACCESS"]);
        h.seed_subject("admin1", &["Admin"]);

        assert!(h.engine.is_eligible("admin1", "docX").unwrap());
        assert!(h.cache.get("docX").unwrap().is_none());
    }

    #[test]
    fn cached_snapshot_stays_per_subject_correct() {
        let h = Harness::new();
        h.engine.create_license("c1", "u1").unwrap();

        // Prime the cache through one subject, then query another.
        assert!(h.engine.is_eligible("u1", "c1").unwrap());
        assert!(!h.engine.is_eligible("u2", "c1").unwrap());
    }

    // ── concurrency ──────────────────────────────────────────────────────

    #[test]
    fn concurrent_creates_resolve_to_one_winner() {
        let h = Harness::new();
        let engine = h.engine.clone();

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.create_license("c1", &format!("u{i}")))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::AlreadyExists(_))))
            .count();
        assert_eq!((successes, conflicts), (1, 1));
    }

    #[test]
    fn concurrent_deletes_resolve_to_one_winner() {
        let h = Harness::new();
        h.engine.create_license("c1", "u1").unwrap();
        let engine = h.engine.clone();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.delete_license("c1"))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let missing = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::NotFound(_))))
            .count();
        assert_eq!((successes, missing), (1, 1));
    }

    // ── properties ───────────────────────────────────────────────────────

    fn id_strategy() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,12}"
    }

    proptest! {
        #[test]
        fn expired_license_is_eligible_for_no_one(
            owner in id_strategy(),
            caller in id_strategy(),
            age_days in 31i64..3650,
        ) {
            let h = Harness::new();
            let now = Utc::now();
            h.licenses
                .save(LicenseRecord::issue(
                    "c1",
                    owner,
                    now - Duration::days(age_days),
                    Duration::days(30),
                ))
                .unwrap();

            prop_assert!(!h.engine.evaluate(&caller, "c1", now).unwrap().eligible);
        }

        #[test]
        fn live_license_is_eligible_only_for_owner(
            owner in id_strategy(),
            caller in id_strategy(),
        ) {
            let h = Harness::new();
            let now = Utc::now();
            h.licenses
                .save(LicenseRecord::issue("c1", owner.clone(), now, Duration::days(30)))
                .unwrap();

            let decision = h.engine.evaluate(&caller, "c1", now).unwrap();
            prop_assert_eq!(decision.eligible, caller == owner);
        }
    }
}
