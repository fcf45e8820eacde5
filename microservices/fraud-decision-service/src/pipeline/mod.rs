//! Decision Pipeline (component I): orchestrates feature computation,
//! risk scoring and policy evaluation under soft latency budgets, then
//! fires post-decision side effects without blocking the response
//! (spec §4.9).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::warn;

use crate::config::{LatencyTargets, SafeModeConfig};
use crate::error::Result;
use crate::evidence::EvidenceService;
use crate::features::{FeatureSet, FeatureStore};
use crate::policy::versioning::PolicyVersioningService;
use crate::policy::PolicyEngine;
use crate::scoring::RiskScorer;
use crate::types::{Decision, DecisionResponse, FrictionType, PaymentEvent, RiskScores, Severity};

pub struct DecisionPipeline {
    features: Arc<FeatureStore>,
    scorer: Arc<RiskScorer>,
    policy: Arc<RwLock<PolicyEngine>>,
    versioning: Option<Arc<PolicyVersioningService>>,
    evidence: Option<Arc<EvidenceService>>,
    policy_version_id: Arc<RwLock<Option<i64>>>,
    latency: LatencyTargets,
    safe_mode: SafeModeConfig,
}

impl DecisionPipeline {
    pub fn new(
        features: Arc<FeatureStore>,
        scorer: Arc<RiskScorer>,
        policy: Arc<RwLock<PolicyEngine>>,
        versioning: Option<Arc<PolicyVersioningService>>,
        evidence: Option<Arc<EvidenceService>>,
        latency: LatencyTargets,
        safe_mode: SafeModeConfig,
    ) -> Self {
        Self {
            features,
            scorer,
            policy,
            versioning,
            evidence,
            policy_version_id: Arc::new(RwLock::new(None)),
            latency,
            safe_mode,
        }
    }

    /// Called after the policy engine is (re)loaded or a new version is
    /// activated, so `policy_version_id` is served from memory on the
    /// decision hot path rather than a per-request database round trip.
    pub async fn set_active_policy_version_id(&self, id: Option<i64>) {
        *self.policy_version_id.write().await = id;
    }

    pub async fn decide(&self, event: PaymentEvent) -> Result<DecisionResponse> {
        let start = Instant::now();
        event.validate()?;

        if self.safe_mode.enabled {
            return Ok(self.safe_mode_response(&event, start));
        }

        if let Some(cached) = self.idempotent_replay(&event).await {
            return Ok(cached);
        }

        let feature_start = Instant::now();
        let features = match timeout_or_default(
            self.latency.feature_ms,
            self.features.compute_features(&event),
            FeatureSet::default,
        )
        .await
        {
            Ok(features) => features,
            Err(features) => {
                warn!(transaction_id = %event.transaction_id, "feature computation exceeded soft budget, using degraded features");
                features
            }
        };
        let feature_time_ms = feature_start.elapsed().as_millis() as u64;

        let scoring_start = Instant::now();
        let (scores, mut reasons) = match timeout_or_default(
            self.latency.scoring_ms,
            self.scorer.score(&event, &features),
            || (RiskScores::default(), Vec::new()),
        )
        .await
        {
            Ok(result) => result,
            Err(result) => {
                warn!(transaction_id = %event.transaction_id, "risk scoring exceeded soft budget, using rules-only fallback");
                result
            }
        };
        let scoring_time_ms = scoring_start.elapsed().as_millis() as u64;

        let policy_start = Instant::now();
        let (decision, policy_reasons, friction_type, review_priority, policy_version) = {
            let policy = self.policy.read().await;
            let (decision, policy_reasons, friction_type, review_priority) = policy.evaluate(&event, &features, &scores);
            (decision, policy_reasons, friction_type, review_priority, policy.version().to_string())
        };
        reasons.extend(policy_reasons);
        let policy_time_ms = policy_start.elapsed().as_millis() as u64;
        if policy_time_ms > self.latency.policy_ms {
            warn!(transaction_id = %event.transaction_id, policy_time_ms, "policy evaluation exceeded soft budget");
        }

        let friction_message = friction_type.map(friction_message_for);
        let review_notes = highest_severity_notes(&reasons);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        let response = DecisionResponse {
            transaction_id: event.transaction_id.clone(),
            idempotency_key: event.idempotency_key.clone(),
            decision,
            reasons,
            scores,
            friction_type,
            friction_message,
            review_priority,
            review_notes,
            processing_time_ms,
            feature_time_ms,
            scoring_time_ms,
            policy_time_ms,
            policy_version,
            is_cached: false,
        };

        self.spawn_side_effects(event, features, response.clone(), matches!(response.decision, Decision::Block)).await;

        if processing_time_ms > self.latency.e2e_ms {
            warn!(transaction_id = %response.transaction_id, processing_time_ms, "slow decision request");
        }

        Ok(response)
    }

    async fn idempotent_replay(&self, event: &PaymentEvent) -> Option<DecisionResponse> {
        let evidence = self.evidence.as_ref()?;
        let cached = evidence.get_idempotency_response(&event.idempotency_key).await.ok()??;
        let mut response: DecisionResponse = serde_json::from_value(cached).ok()?;
        response.is_cached = true;
        Some(response)
    }

    fn safe_mode_response(&self, event: &PaymentEvent, start: Instant) -> DecisionResponse {
        let decision = parse_decision(&self.safe_mode.decision);
        DecisionResponse {
            transaction_id: event.transaction_id.clone(),
            idempotency_key: event.idempotency_key.clone(),
            decision,
            reasons: vec![crate::types::DecisionReason {
                code: "SAFE_MODE".to_string(),
                description: "Safe mode is enabled; policy evaluation bypassed".to_string(),
                severity: Severity::Medium,
                triggered_by: "safe_mode".to_string(),
                value: 0.0,
                threshold: 0.0,
            }],
            scores: RiskScores::default(),
            friction_type: None,
            friction_message: None,
            review_priority: None,
            review_notes: None,
            processing_time_ms: start.elapsed().as_millis() as u64,
            feature_time_ms: 0,
            scoring_time_ms: 0,
            policy_time_ms: 0,
            policy_version: "safe-mode".to_string(),
            is_cached: false,
        }
    }

    /// Profile updates, evidence capture and idempotency write run
    /// concurrently in the background; none of them may delay or fail
    /// the response (spec §4.9 step 7).
    async fn spawn_side_effects(&self, event: PaymentEvent, features: FeatureSet, response: DecisionResponse, is_decline: bool) {
        let feature_store = self.features.clone();
        let evidence = self.evidence.clone();
        let policy_version_id = *self.policy_version_id.read().await;

        tokio::spawn(async move {
            if let Err(e) = feature_store.update_entity_profiles(&event, is_decline).await {
                warn!(error = %e, transaction_id = %event.transaction_id, "profile update failed");
            }

            let Some(evidence) = evidence else { return };

            if evidence.capture_evidence(&event, &features, &response, policy_version_id).await.is_none() {
                warn!(transaction_id = %event.transaction_id, "evidence capture failed");
            }

            match serde_json::to_value(&response) {
                Ok(response_json) => {
                    if let Err(e) = evidence.store_idempotency_response(&event.idempotency_key, &response_json).await {
                        warn!(error = %e, "idempotency write failed");
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize response for idempotency store"),
            }
        });
    }
}

/// Races `fut` against a soft budget; returns `Ok` on completion within
/// budget, `Err(default())` if the budget trips.
async fn timeout_or_default<T, F>(budget_ms: u64, fut: impl std::future::Future<Output = T>, default: F) -> std::result::Result<T, T>
where
    F: FnOnce() -> T,
{
    match tokio::time::timeout(Duration::from_millis(budget_ms), fut).await {
        Ok(value) => Ok(value),
        Err(_) => Err(default()),
    }
}

fn parse_decision(raw: &str) -> Decision {
    match raw.to_uppercase().as_str() {
        "BLOCK" => Decision::Block,
        "REVIEW" => Decision::Review,
        "FRICTION" => Decision::Friction,
        _ => Decision::Allow,
    }
}

fn friction_message_for(friction_type: FrictionType) -> String {
    match friction_type {
        FrictionType::ThreeDs => "Additional 3-D Secure verification required".to_string(),
        FrictionType::Otp => "One-time passcode verification required".to_string(),
        FrictionType::StepUp => "Step-up authentication required".to_string(),
        FrictionType::Captcha => "CAPTCHA challenge required".to_string(),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Low => 0,
        Severity::Medium => 1,
        Severity::High => 2,
        Severity::Critical => 3,
    }
}

/// Joins the descriptions of the highest-severity reasons (spec §4.9
/// step 6).
fn highest_severity_notes(reasons: &[crate::types::DecisionReason]) -> Option<String> {
    let highest = reasons.iter().map(|r| severity_rank(r.severity)).max()?;
    let notes: Vec<&str> = reasons
        .iter()
        .filter(|r| severity_rank(r.severity) == highest)
        .map(|r| r.description.as_str())
        .collect();
    if notes.is_empty() {
        None
    } else {
        Some(notes.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatencyTargets, SafeModeConfig};
    use crate::detectors::DetectionEngine;
    use crate::features::profile::InMemoryProfileStore;
    use crate::velocity::InMemoryVelocityStore;

    fn test_latency() -> LatencyTargets {
        LatencyTargets { e2e_ms: 200, feature_ms: 50, scoring_ms: 25, policy_ms: 5 }
    }

    fn pipeline(safe_mode: SafeModeConfig) -> DecisionPipeline {
        let features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::default()), Arc::new(InMemoryProfileStore::default())));
        let scorer = Arc::new(RiskScorer::new(DetectionEngine::new(), None, 0.7));
        let policy = Arc::new(RwLock::new(PolicyEngine::new(crate::policy::PolicyRules::default()).unwrap()));
        DecisionPipeline::new(features, scorer, policy, None, None, test_latency(), safe_mode)
    }

    #[tokio::test]
    async fn clean_event_allows_with_no_reasons() {
        let pipeline = pipeline(SafeModeConfig { enabled: false, decision: "ALLOW".to_string() });
        let response = pipeline.decide(PaymentEvent::fixture()).await.unwrap();
        assert_eq!(response.decision, Decision::Allow);
        assert!(response.reasons.is_empty());
        assert!(!response.is_cached);
    }

    #[tokio::test]
    async fn safe_mode_bypasses_scoring_and_policy() {
        let pipeline = pipeline(SafeModeConfig { enabled: true, decision: "ALLOW".to_string() });
        let response = pipeline.decide(PaymentEvent::fixture()).await.unwrap();
        assert_eq!(response.decision, Decision::Allow);
        assert_eq!(response.reasons.len(), 1);
        assert_eq!(response.reasons[0].code, "SAFE_MODE");
        assert_eq!(response.policy_version, "safe-mode");
    }

    #[tokio::test]
    async fn invalid_event_is_rejected_before_scoring() {
        let pipeline = pipeline(SafeModeConfig { enabled: false, decision: "ALLOW".to_string() });
        let mut event = PaymentEvent::fixture();
        event.amount_cents = -1;
        assert!(pipeline.decide(event).await.is_err());
    }

    #[test]
    fn highest_severity_notes_picks_max_severity_only() {
        use crate::types::DecisionReason;
        let reasons = vec![
            DecisionReason { code: "A".into(), description: "low one".into(), severity: Severity::Low, triggered_by: "x".into(), value: 0.0, threshold: 0.0 },
            DecisionReason { code: "B".into(), description: "high one".into(), severity: Severity::High, triggered_by: "x".into(), value: 0.0, threshold: 0.0 },
        ];
        assert_eq!(highest_severity_notes(&reasons).unwrap(), "high one");
    }

    #[test]
    fn parse_decision_defaults_to_allow_on_unknown() {
        assert_eq!(parse_decision("nonsense"), Decision::Allow);
        assert_eq!(parse_decision("block"), Decision::Block);
    }
}
