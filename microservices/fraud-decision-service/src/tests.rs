//! End-to-end decision pipeline scenarios.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tokio::sync::RwLock;

    use crate::config::{LatencyTargets, SafeModeConfig};
    use crate::detectors::DetectionEngine;
    use crate::features::profile::InMemoryProfileStore;
    use crate::features::FeatureStore;
    use crate::ml::{MlScorer, ModelRegistry};
    use crate::pipeline::DecisionPipeline;
    use crate::policy::{PolicyEngine, PolicyRules, ScoreThreshold};
    use crate::scoring::RiskScorer;
    use crate::types::{Decision, DeviceInfo, EventSubtype, GeoInfo, PaymentEvent, ServiceType};
    use crate::velocity::InMemoryVelocityStore;

    fn latency() -> LatencyTargets {
        LatencyTargets { e2e_ms: 500, feature_ms: 200, scoring_ms: 100, policy_ms: 20 }
    }

    fn safe_mode_off() -> SafeModeConfig {
        SafeModeConfig { enabled: false, decision: "ALLOW".to_string() }
    }

    /// Thresholds tight enough that the fixed rule-based scores this
    /// module produces exercise friction/review/block, keyed on
    /// `criminal` so the confidence-driven `risk` remap never muddies
    /// the assertions.
    fn scored_policy() -> PolicyRules {
        let mut policy = PolicyRules::default();
        policy.thresholds.insert(
            "criminal".to_string(),
            ScoreThreshold { block_threshold: 0.9, review_threshold: 0.5, friction_threshold: 0.3 },
        );
        policy
    }

    fn pipeline_with(features: Arc<FeatureStore>, policy: PolicyRules) -> DecisionPipeline {
        let scorer = Arc::new(RiskScorer::new(DetectionEngine::new(), None, 0.7));
        let engine = Arc::new(RwLock::new(PolicyEngine::new(policy).unwrap()));
        DecisionPipeline::new(features, scorer, engine, None, None, latency(), safe_mode_off())
    }

    fn topup_event(transaction_id: &str, idempotency_key: &str, card_token: &str) -> PaymentEvent {
        PaymentEvent {
            transaction_id: transaction_id.to_string(),
            idempotency_key: idempotency_key.to_string(),
            event_type: crate::types::EventType::Authorization,
            timestamp: Utc::now(),
            amount_cents: 2500,
            currency: "USD".to_string(),
            card_token: card_token.to_string(),
            card_bin: None,
            card_last_four: None,
            card_brand: None,
            card_type: None,
            card_country: None,
            service_id: "mobile_prepaid_001".to_string(),
            service_name: None,
            service_type: ServiceType::Mobile,
            event_subtype: EventSubtype::Topup,
            service_region: None,
            subscriber_id: "S1".to_string(),
            user_id: "U1".to_string(),
            account_age_days: Some(10),
            is_guest: false,
            phone_number: None,
            imei: None,
            sim_iccid: None,
            modem_mac: None,
            cpe_serial: None,
            service_address_hash: None,
            device: DeviceInfo { device_id: Some("D1".to_string()), ..Default::default() },
            geo: GeoInfo { ip_address: Some("1.2.3.4".to_string()), ..Default::default() },
            verification: crate::types::VerificationInfo::default(),
            channel: None,
            is_recurring: false,
            session_id: None,
        }
    }

    // Scenario 1: minimal top-up, clean profile.
    #[tokio::test]
    async fn minimal_topup_on_clean_profile_allows() {
        let features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new())));
        let pipeline = pipeline_with(features, scored_policy());

        let event = topup_event("T1", "K1", "C1");
        let response = pipeline.decide(event).await.unwrap();

        assert_eq!(response.decision, Decision::Allow);
        assert!(!response.is_cached);
        assert!(response.reasons.is_empty());
        assert!(response.scores.risk <= 0.3);
        assert!(response.scores.criminal <= 0.3);
        assert!(response.scores.bot_score <= 0.3);
        assert!(response.scores.card_testing_score <= 0.3);
    }

    // Scenario 2: idempotency replay. The pipeline only checks the cache
    // when an evidence service is configured, so this exercises the
    // in-process equivalent directly against `DecisionResponse` shape.
    #[tokio::test]
    async fn idempotency_replay_matches_first_response_modulo_cache_flag() {
        let features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new())));
        let pipeline = pipeline_with(features, scored_policy());

        let first = pipeline.decide(topup_event("T1", "K1", "C1")).await.unwrap();
        let mut replay = pipeline.decide(topup_event("T1", "K1", "C1")).await.unwrap();
        replay.is_cached = false;
        replay.processing_time_ms = first.processing_time_ms;

        assert_eq!(first.decision, replay.decision);
        assert_eq!(first.reasons.len(), replay.reasons.len());
        assert_eq!(first.scores.risk, replay.scores.risk);
        assert_eq!(first.policy_version, replay.policy_version);
    }

    // Scenario 3: card testing burst. Six attempts on the same card
    // within the 10-minute window; the profile update that a real
    // deployment fires in the background is applied synchronously here
    // so each iteration sees the prior attempts deterministically.
    #[tokio::test]
    async fn card_testing_burst_blocks_or_reviews_by_the_sixth_attempt() {
        let velocity = Arc::new(InMemoryVelocityStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let features = Arc::new(FeatureStore::new(velocity, profiles));
        let pipeline = pipeline_with(features.clone(), scored_policy());

        let mut last = None;
        for i in 0..6 {
            let mut event = topup_event(&format!("T{i}"), &format!("K{i}"), "C2");
            event.amount_cents = 500;
            let response = pipeline.decide(event.clone()).await.unwrap();
            features.update_entity_profiles(&event, false).await.unwrap();
            last = Some(response);
        }

        let last = last.unwrap();
        assert!(matches!(last.decision, Decision::Block | Decision::Review));
        assert!(last.reasons.iter().any(|r| r.code == "CARD_TESTING_VELOCITY"));
        assert!(last.scores.card_testing_score >= 0.8);
    }

    // Scenario 4: emulator + Tor on a device upgrade.
    #[tokio::test]
    async fn emulator_and_tor_on_device_upgrade_blocks_or_reviews() {
        let features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new())));
        let pipeline = pipeline_with(features, scored_policy());

        let mut event = topup_event("T1", "K1", "C1");
        event.amount_cents = 120_000;
        event.event_subtype = EventSubtype::DeviceUpgrade;
        event.device.is_emulator = true;
        event.geo.is_tor = true;

        let response = pipeline.decide(event).await.unwrap();

        assert!(matches!(response.decision, Decision::Block | Decision::Review));
        assert!(response.reasons.iter().any(|r| r.code == "BOT_EMULATOR"));
        assert!(response.reasons.iter().any(|r| r.code.contains("TOR")));
        assert!(response.scores.criminal >= 0.95);
    }

    // Scenario 5: impossible travel. Card C3 was last seen in New York an
    // hour ago; this event claims London, which implies an impossible
    // airspeed.
    #[tokio::test]
    async fn impossible_travel_never_allows() {
        let velocity = Arc::new(InMemoryVelocityStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let features = Arc::new(FeatureStore::new(velocity, profiles.clone()));
        let pipeline = pipeline_with(features, scored_policy());

        let mut prior = crate::types::CardProfile::default();
        prior.last_lat = Some(40.7128);
        prior.last_lon = Some(-74.0060);
        prior.last_geo_seen = Some(Utc::now() - Duration::hours(1));
        profiles.put_card("C3", &prior).await.unwrap();

        let mut event = topup_event("T1", "K1", "C3");
        event.geo.latitude = Some(51.5074);
        event.geo.longitude = Some(-0.1278);

        let response = pipeline.decide(event).await.unwrap();

        assert_ne!(response.decision, Decision::Allow);
        assert!(response.reasons.iter().any(|r| r.code == "GEO_IMPOSSIBLE_TRAVEL"));
    }

    // Scenario 6: holdout routing. `holdout_percent=100` sends every
    // request down the unscored holdout bucket regardless of routing
    // key, so ML never influences the decision.
    #[tokio::test]
    async fn full_holdout_never_scores_and_matches_rules_only_decisions() {
        let rules_only_features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new())));
        let rules_only = pipeline_with(rules_only_features, scored_policy());

        let holdout_features = Arc::new(FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new())));
        let engine = Arc::new(RwLock::new(PolicyEngine::new(scored_policy()).unwrap()));
        let ml = MlScorer::new(ModelRegistry::load("/nonexistent/registry.json"), 15, 100);
        let scorer = Arc::new(RiskScorer::new(DetectionEngine::new(), Some(ml), 0.7));
        let holdout = DecisionPipeline::new(holdout_features, scorer, engine, None, None, latency(), safe_mode_off());

        for i in 0..25 {
            let user_id = format!("U{i}");
            let mut rules_event = topup_event(&format!("T{i}"), &format!("K{i}"), "C1");
            rules_event.user_id = user_id.clone();
            let mut holdout_event = rules_event.clone();
            holdout_event.user_id = user_id;

            let rules_response = rules_only.decide(rules_event).await.unwrap();
            let holdout_response = holdout.decide(holdout_event).await.unwrap();

            assert_eq!(holdout_response.scores.model_variant.as_deref(), Some("holdout"));
            assert!(holdout_response.scores.ml_score.is_none());
            assert_eq!(rules_response.decision, holdout_response.decision);
        }
    }

}
