//! Policy Engine (component F): allowlists, blocklists, explicit rules,
//! and score thresholds, in that evaluation order. Separated from the
//! risk scorer so business users can tune thresholds and rules without
//! a deploy (spec §4.6).

pub mod versioning;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{FraudError, Result};
use crate::features::FeatureSet;
use crate::types::{Decision, DecisionReason, FrictionType, PaymentEvent, ReviewPriority, RiskScores, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    Allow,
    Friction,
    Review,
    Block,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub conditions: BTreeMap<String, serde_json::Value>,
    pub action: RuleAction,
    #[serde(default)]
    pub friction_type: Option<FrictionType>,
    #[serde(default)]
    pub review_priority: Option<ReviewPriority>,
}

fn default_true() -> bool {
    true
}
fn default_priority() -> i32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreThreshold {
    #[serde(default = "default_block")]
    pub block_threshold: f64,
    #[serde(default = "default_review")]
    pub review_threshold: f64,
    #[serde(default = "default_friction")]
    pub friction_threshold: f64,
}

fn default_block() -> f64 {
    0.9
}
fn default_review() -> f64 {
    0.7
}
fn default_friction() -> f64 {
    0.5
}

impl ScoreThreshold {
    fn validate(&self, score_type: &str) -> Result<()> {
        for (label, value) in [
            ("friction_threshold", self.friction_threshold),
            ("review_threshold", self.review_threshold),
            ("block_threshold", self.block_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FraudError::PolicyUndefined(format!(
                    "{score_type}.{label} must be within [0,1], got {value}"
                )));
            }
        }
        if !(self.friction_threshold < self.review_threshold && self.review_threshold < self.block_threshold) {
            return Err(FraudError::PolicyUndefined(format!(
                "{score_type} thresholds must satisfy friction < review < block"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRules {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_action: Option<RuleAction>,
    #[serde(default)]
    pub thresholds: BTreeMap<String, ScoreThreshold>,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(default)]
    pub blocklist_cards: HashSet<String>,
    #[serde(default)]
    pub blocklist_devices: HashSet<String>,
    #[serde(default)]
    pub blocklist_ips: HashSet<String>,
    #[serde(default)]
    pub blocklist_users: HashSet<String>,
    #[serde(default)]
    pub allowlist_cards: HashSet<String>,
    #[serde(default)]
    pub allowlist_users: HashSet<String>,
    #[serde(default)]
    pub allowlist_services: HashSet<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl PolicyRules {
    pub fn validate(&self) -> Result<()> {
        for (score_type, threshold) in &self.thresholds {
            threshold.validate(score_type)?;
        }
        Ok(())
    }

    fn sorted_rules(&self) -> Vec<&PolicyRule> {
        let mut rules: Vec<&PolicyRule> = self.rules.iter().filter(|r| r.enabled).collect();
        rules.sort_by_key(|r| r.priority);
        rules
    }
}

pub struct PolicyEngine {
    policy: PolicyRules,
    policy_hash: String,
}

impl PolicyEngine {
    pub fn new(policy: PolicyRules) -> Result<Self> {
        policy.validate()?;
        let policy_hash = compute_hash(&policy);
        Ok(Self { policy, policy_hash })
    }

    pub fn hash(&self) -> &str {
        &self.policy_hash
    }

    pub fn version(&self) -> &str {
        &self.policy.version
    }

    pub fn reload(&mut self, policy: PolicyRules) -> Result<()> {
        policy.validate()?;
        self.policy_hash = compute_hash(&policy);
        self.policy = policy;
        Ok(())
    }

    /// Evaluates policy for a transaction. Returns `(decision, reasons,
    /// friction_type, review_priority)` per the five-step evaluation
    /// order in spec §4.6.
    pub fn evaluate(
        &self,
        event: &PaymentEvent,
        features: &FeatureSet,
        scores: &RiskScores,
    ) -> (Decision, Vec<DecisionReason>, Option<FrictionType>, Option<ReviewPriority>) {
        let mut reasons = Vec::new();

        if self.policy.allowlist_cards.contains(&event.card_token) {
            reasons.push(allow_reason("ALLOWLIST_CARD", "Card is on allowlist"));
            return (Decision::Allow, reasons, None, None);
        }
        if self.policy.allowlist_users.contains(&event.user_id) {
            reasons.push(allow_reason("ALLOWLIST_USER", "User is on allowlist"));
            return (Decision::Allow, reasons, None, None);
        }
        if self.policy.allowlist_services.contains(&event.service_id) {
            reasons.push(allow_reason("ALLOWLIST_SERVICE", "Service is on allowlist"));
            return (Decision::Allow, reasons, None, None);
        }

        if self.policy.blocklist_cards.contains(&event.card_token) {
            reasons.push(block_reason("BLOCKLIST_CARD", "Card is on blocklist"));
            return (Decision::Block, reasons, None, None);
        }
        if let Some(device_id) = &event.device.device_id {
            if self.policy.blocklist_devices.contains(device_id) {
                reasons.push(block_reason("BLOCKLIST_DEVICE", "Device is on blocklist"));
                return (Decision::Block, reasons, None, None);
            }
        }
        if let Some(ip) = &event.geo.ip_address {
            if self.policy.blocklist_ips.contains(ip) {
                reasons.push(block_reason("BLOCKLIST_IP", "IP is on blocklist"));
                return (Decision::Block, reasons, None, None);
            }
        }
        if self.policy.blocklist_users.contains(&event.user_id) {
            reasons.push(block_reason("BLOCKLIST_USER", "User is on blocklist"));
            return (Decision::Block, reasons, None, None);
        }

        for rule in self.policy.sorted_rules() {
            if rule_matches(rule, event, features, scores) {
                reasons.push(rule_reason(rule));
                match rule.action {
                    RuleAction::Block => return (Decision::Block, reasons, None, None),
                    RuleAction::Review => return (Decision::Review, reasons, None, rule.review_priority),
                    RuleAction::Friction => return (Decision::Friction, reasons, rule.friction_type, None),
                    RuleAction::Allow => return (Decision::Allow, reasons, None, None),
                    RuleAction::Continue => continue,
                }
            }
        }

        let (decision, threshold_reasons, friction_type, review_priority) = self.apply_thresholds(scores);
        reasons.extend(threshold_reasons);
        if decision != Decision::Allow {
            return (decision, reasons, friction_type, review_priority);
        }

        let default_decision = match self.policy.default_action {
            Some(RuleAction::Block) => Decision::Block,
            Some(RuleAction::Review) => Decision::Review,
            Some(RuleAction::Friction) => Decision::Friction,
            _ => Decision::Allow,
        };
        (default_decision, reasons, None, None)
    }

    fn apply_thresholds(
        &self,
        scores: &RiskScores,
    ) -> (Decision, Vec<DecisionReason>, Option<FrictionType>, Option<ReviewPriority>) {
        let mut reasons = Vec::new();
        let mut highest = Decision::Allow;
        let mut friction_type = None;
        let mut review_priority = None;

        let score_values: BTreeMap<&str, f64> =
            [("risk", scores.risk), ("criminal", scores.criminal), ("friendly", scores.friendly_fraud)].into_iter().collect();

        for (score_type, threshold) in &self.policy.thresholds {
            let Some(&value) = score_values.get(score_type.as_str()) else {
                continue;
            };

            if value >= threshold.block_threshold {
                reasons.push(threshold_reason(score_type, "BLOCK", Severity::Critical, value, threshold.block_threshold));
                return (Decision::Block, reasons, None, None);
            }

            if value >= threshold.review_threshold {
                if Decision::Review.severity() > highest.severity() {
                    highest = Decision::Review;
                    review_priority = Some(if value >= 0.8 { ReviewPriority::High } else { ReviewPriority::Medium });
                }
                reasons.push(threshold_reason(score_type, "REVIEW", Severity::High, value, threshold.review_threshold));
            } else if value >= threshold.friction_threshold {
                if Decision::Friction.severity() > highest.severity() {
                    highest = Decision::Friction;
                    friction_type = Some(FrictionType::ThreeDs);
                }
                reasons.push(threshold_reason(score_type, "FRICTION", Severity::Medium, value, threshold.friction_threshold));
            }
        }

        (highest, reasons, friction_type, review_priority)
    }
}

fn allow_reason(code: &str, description: &str) -> DecisionReason {
    DecisionReason { code: code.to_string(), description: description.to_string(), severity: Severity::Low, triggered_by: "allowlist".to_string(), value: 0.0, threshold: 0.0 }
}

fn block_reason(code: &str, description: &str) -> DecisionReason {
    DecisionReason { code: code.to_string(), description: description.to_string(), severity: Severity::Critical, triggered_by: "blocklist".to_string(), value: 0.0, threshold: 0.0 }
}

fn rule_reason(rule: &PolicyRule) -> DecisionReason {
    let severity = if rule.action == RuleAction::Block { Severity::High } else { Severity::Medium };
    DecisionReason {
        code: format!("RULE_{}", rule.id.to_uppercase()),
        description: rule.description.clone().unwrap_or_else(|| rule.name.clone()),
        severity,
        triggered_by: rule.id.clone(),
        value: 0.0,
        threshold: 0.0,
    }
}

fn threshold_reason(score_type: &str, stage: &str, severity: Severity, value: f64, threshold: f64) -> DecisionReason {
    DecisionReason {
        code: format!("THRESHOLD_{}_{}", score_type.to_uppercase(), stage),
        description: format!("{score_type} score {value:.2} exceeds {stage} threshold"),
        severity,
        triggered_by: format!("{score_type}_score"),
        value,
        threshold,
    }
}

fn condition_value(key: &str, event: &PaymentEvent, features: &FeatureSet, scores: &RiskScores) -> Option<serde_json::Value> {
    let base_key = strip_comparator_suffix(key);
    let value = match base_key {
        "risk_score" => serde_json::json!(scores.risk),
        "criminal_score" => serde_json::json!(scores.criminal),
        "friendly_score" => serde_json::json!(scores.friendly_fraud),
        "amount_cents" => serde_json::json!(event.amount_cents),
        "amount_usd" => serde_json::json!(features.amount_usd),
        "device_is_emulator" => serde_json::json!(features.entity.device_is_emulator),
        "device_is_rooted" => serde_json::json!(features.entity.device_is_rooted),
        "ip_is_tor" => serde_json::json!(features.entity.ip_is_tor),
        "ip_is_datacenter" => serde_json::json!(features.entity.ip_is_datacenter),
        "ip_is_vpn" => serde_json::json!(features.entity.ip_is_vpn),
        "is_guest" => serde_json::json!(features.is_guest),
        "is_new_card_for_user" => serde_json::json!(features.is_new_card_for_user),
        "is_new_device_for_user" => serde_json::json!(features.is_new_device_for_user),
        "account_age_days" => serde_json::json!(features.account_age_days),
        _ => return None,
    };
    Some(value)
}

fn strip_comparator_suffix(key: &str) -> &str {
    for suffix in ["_gte", "_gt", "_lte", "_lt", "_ne"] {
        if let Some(stripped) = key.strip_suffix(suffix) {
            return stripped;
        }
    }
    key
}

fn check_condition(key: &str, actual: &serde_json::Value, expected: &serde_json::Value) -> bool {
    let (actual_f, expected_f) = (actual.as_f64(), expected.as_f64());

    if key.ends_with("_gte") {
        return matches!((actual_f, expected_f), (Some(a), Some(e)) if a >= e);
    }
    if key.ends_with("_gt") {
        return matches!((actual_f, expected_f), (Some(a), Some(e)) if a > e);
    }
    if key.ends_with("_lte") {
        return matches!((actual_f, expected_f), (Some(a), Some(e)) if a <= e);
    }
    if key.ends_with("_lt") {
        return matches!((actual_f, expected_f), (Some(a), Some(e)) if a < e);
    }
    if key.ends_with("_ne") {
        return actual != expected;
    }
    actual == expected
}

fn rule_matches(rule: &PolicyRule, event: &PaymentEvent, features: &FeatureSet, scores: &RiskScores) -> bool {
    for (condition_key, expected) in &rule.conditions {
        let Some(actual) = condition_value(condition_key, event, features, scores) else {
            return false;
        };
        if !check_condition(condition_key, &actual, expected) {
            return false;
        }
    }
    true
}

fn compute_hash(policy: &PolicyRules) -> String {
    let json = serde_json::to_string(policy).unwrap_or_default();
    let digest = Sha256::digest(json.as_bytes());
    hex::encode(digest)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentEvent;

    fn scores() -> RiskScores {
        RiskScores::default()
    }

    #[test]
    fn invalid_thresholds_reject_at_load() {
        let mut policy = PolicyRules::default();
        policy.thresholds.insert(
            "risk".to_string(),
            ScoreThreshold { block_threshold: 0.5, review_threshold: 0.6, friction_threshold: 0.7 },
        );
        assert!(PolicyEngine::new(policy).is_err());
    }

    #[test]
    fn allowlisted_card_allows_before_anything_else() {
        let mut policy = PolicyRules::default();
        policy.allowlist_cards.insert("C1".to_string());
        policy.blocklist_cards.insert("C1".to_string());
        let engine = PolicyEngine::new(policy).unwrap();
        let (decision, reasons, _, _) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores());
        assert_eq!(decision, Decision::Allow);
        assert_eq!(reasons[0].code, "ALLOWLIST_CARD");
    }

    #[test]
    fn blocklisted_card_blocks() {
        let mut policy = PolicyRules::default();
        policy.blocklist_cards.insert("C1".to_string());
        let engine = PolicyEngine::new(policy).unwrap();
        let (decision, _, _, _) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores());
        assert_eq!(decision, Decision::Block);
    }

    #[test]
    fn risk_threshold_block_wins_over_review() {
        let mut policy = PolicyRules::default();
        policy.thresholds.insert(
            "risk".to_string(),
            ScoreThreshold { block_threshold: 0.9, review_threshold: 0.7, friction_threshold: 0.5 },
        );
        let engine = PolicyEngine::new(policy).unwrap();
        let mut scores = scores();
        scores.risk = 0.95;
        let (decision, _, _, _) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores);
        assert_eq!(decision, Decision::Block);
    }

    #[test]
    fn review_priority_high_above_point_eight() {
        let mut policy = PolicyRules::default();
        policy.thresholds.insert(
            "risk".to_string(),
            ScoreThreshold { block_threshold: 0.99, review_threshold: 0.7, friction_threshold: 0.5 },
        );
        let engine = PolicyEngine::new(policy).unwrap();
        let mut scores = scores();
        scores.risk = 0.85;
        let (decision, _, _, review_priority) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores);
        assert_eq!(decision, Decision::Review);
        assert_eq!(review_priority, Some(ReviewPriority::High));
    }

    #[test]
    fn explicit_rule_condition_with_gte_suffix_matches() {
        let mut policy = PolicyRules::default();
        policy.rules.push(PolicyRule {
            id: "big_amount".to_string(),
            name: "Big amount".to_string(),
            description: None,
            enabled: true,
            priority: 1,
            conditions: [("amount_cents_gte".to_string(), serde_json::json!(1000))].into_iter().collect(),
            action: RuleAction::Review,
            friction_type: None,
            review_priority: Some(ReviewPriority::Low),
        });
        let engine = PolicyEngine::new(policy).unwrap();
        let mut event = PaymentEvent::fixture();
        event.amount_cents = 2500;
        let (decision, reasons, _, review_priority) = engine.evaluate(&event, &FeatureSet::default(), &scores());
        assert_eq!(decision, Decision::Review);
        assert_eq!(review_priority, Some(ReviewPriority::Low));
        assert_eq!(reasons[0].code, "RULE_BIG_AMOUNT");
    }

    #[test]
    fn continue_action_falls_through_to_next_rule() {
        let mut policy = PolicyRules::default();
        policy.rules.push(PolicyRule {
            id: "noop".to_string(),
            name: "noop".to_string(),
            description: None,
            enabled: true,
            priority: 1,
            conditions: BTreeMap::new(),
            action: RuleAction::Continue,
            friction_type: None,
            review_priority: None,
        });
        policy.rules.push(PolicyRule {
            id: "fallback_block".to_string(),
            name: "fallback".to_string(),
            description: None,
            enabled: true,
            priority: 2,
            conditions: BTreeMap::new(),
            action: RuleAction::Block,
            friction_type: None,
            review_priority: None,
        });
        let engine = PolicyEngine::new(policy).unwrap();
        let (decision, _, _, _) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores());
        assert_eq!(decision, Decision::Block);
    }

    #[test]
    fn default_action_applies_when_nothing_matches() {
        let mut policy = PolicyRules::default();
        policy.default_action = Some(RuleAction::Review);
        let engine = PolicyEngine::new(policy).unwrap();
        let (decision, _, _, _) = engine.evaluate(&PaymentEvent::fixture(), &FeatureSet::default(), &scores());
        assert_eq!(decision, Decision::Review);
    }
}
