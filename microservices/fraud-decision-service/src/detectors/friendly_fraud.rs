//! Friendly-fraud detector (spec §4.3.5): post-transaction dispute risk
//! (chargeback/refund history, guest high-value purchases) combined with
//! recurring-subscription abuse signals. The two sub-scores are combined
//! by taking their max rather than aggregated together, since they
//! capture distinct fraud patterns that should not dilute each other.

use async_trait::async_trait;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, RiskTier, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.4;
const DISPUTE_BOOST_K: f64 = 0.03;
const SUBSCRIPTION_BOOST_K: f64 = 0.05;

const CHARGEBACK_RATE_90D_THRESHOLD: f64 = 0.03;
const CHARGEBACK_COUNT_90D_THRESHOLD: u64 = 2;
const REFUND_COUNT_90D_THRESHOLD: u64 = 5;
const CARD_CHARGEBACK_COUNT_THRESHOLD: u64 = 1;
const DEVICE_CHARGEBACK_COUNT_THRESHOLD: u64 = 2;
const GUEST_HIGH_VALUE_USD_THRESHOLD: f64 = 500.0;
const NEW_USER_ACCOUNT_AGE_DAYS: u32 = 7;
const SUBSCRIPTION_USER_TRANSACTIONS_24H_THRESHOLD: u64 = 3;

pub struct FriendlyFraudDetector;

impl Default for FriendlyFraudDetector {
    fn default() -> Self {
        Self
    }
}

fn dispute_score(event: &PaymentEvent, features: &FeatureSet, result: &mut DetectionResult) -> f64 {
    let mut signals = Vec::new();

    if features.entity.user_chargeback_rate_90d >= CHARGEBACK_RATE_90D_THRESHOLD {
        signals.push(0.7);
        result.add_reason(
            "FRIENDLY_FRAUD_CHARGEBACK_RATE",
            "User's estimated 90-day chargeback rate exceeds the acceptable threshold",
            Severity::High,
            "user_chargeback_rate_90d",
            features.entity.user_chargeback_rate_90d,
            CHARGEBACK_RATE_90D_THRESHOLD,
        );
    }

    // chargeback_count_90d is approximated via the lifetime counter, since
    // a dedicated 90-day window is not tracked separately (spec §9).
    if features.entity.user_chargeback_count_lifetime >= CHARGEBACK_COUNT_90D_THRESHOLD {
        signals.push(0.6);
        result.add_reason(
            "FRIENDLY_FRAUD_CHARGEBACK_COUNT",
            "User has multiple chargebacks on record",
            Severity::High,
            "user_chargeback_count",
            features.entity.user_chargeback_count_lifetime as f64,
            CHARGEBACK_COUNT_90D_THRESHOLD as f64,
        );
    }

    if features.entity.user_refund_count_90d >= REFUND_COUNT_90D_THRESHOLD {
        signals.push(0.4);
        result.add_reason(
            "FRIENDLY_FRAUD_REFUND_COUNT",
            "User has an elevated refund count over the last 90 days",
            Severity::Medium,
            "user_refund_count_90d",
            features.entity.user_refund_count_90d as f64,
            REFUND_COUNT_90D_THRESHOLD as f64,
        );
    }

    if features.entity.card_chargeback_count >= CARD_CHARGEBACK_COUNT_THRESHOLD {
        signals.push(0.5);
        result.add_reason(
            "FRIENDLY_FRAUD_CARD_CHARGEBACK",
            "Card has a prior chargeback on record",
            Severity::Medium,
            "card_chargeback_count",
            features.entity.card_chargeback_count as f64,
            CARD_CHARGEBACK_COUNT_THRESHOLD as f64,
        );
    }

    if features.entity.device_chargeback_count >= DEVICE_CHARGEBACK_COUNT_THRESHOLD {
        signals.push(0.5);
        result.add_reason(
            "FRIENDLY_FRAUD_DEVICE_CHARGEBACK",
            "Device has multiple prior chargebacks on record",
            Severity::Medium,
            "device_chargeback_count",
            features.entity.device_chargeback_count as f64,
            DEVICE_CHARGEBACK_COUNT_THRESHOLD as f64,
        );
    }

    match features.entity.user_risk_tier {
        RiskTier::High => {
            signals.push(0.6);
            result.add_reason("FRIENDLY_FRAUD_RISK_TIER", "User is in the high risk tier", Severity::High, "user_risk_tier", 1.0, 0.0);
        }
        RiskTier::Elevated => {
            signals.push(0.4);
            result.add_reason(
                "FRIENDLY_FRAUD_RISK_TIER",
                "User is in the elevated risk tier",
                Severity::Medium,
                "user_risk_tier",
                1.0,
                0.0,
            );
        }
        _ => {}
    }

    if event.is_guest && features.amount_usd >= GUEST_HIGH_VALUE_USD_THRESHOLD {
        signals.push(0.4);
        result.add_reason(
            "FRIENDLY_FRAUD_GUEST_HIGH_VALUE",
            "Guest checkout for a high-value purchase",
            Severity::Medium,
            "amount_usd",
            features.amount_usd,
            GUEST_HIGH_VALUE_USD_THRESHOLD,
        );
    }

    aggregate(&signals, DISPUTE_BOOST_K, TRIGGER_THRESHOLD).0
}

fn subscription_abuse_score(event: &PaymentEvent, features: &FeatureSet, result: &mut DetectionResult) -> f64 {
    if !event.is_recurring {
        return 0.0;
    }

    let mut signals = Vec::new();
    let is_new_user = features.account_age_days < NEW_USER_ACCOUNT_AGE_DAYS;

    if is_new_user && features.is_new_card_for_user {
        signals.push(0.4);
        result.add_reason(
            "SUBSCRIPTION_ABUSE_NEW_USER_NEW_CARD",
            "Recurring charge on a new account using a card never seen for this user",
            Severity::Medium,
            "account_age_days",
            features.account_age_days as f64,
            NEW_USER_ACCOUNT_AGE_DAYS as f64,
        );
    }

    if features.velocity.user_transactions_24h >= SUBSCRIPTION_USER_TRANSACTIONS_24H_THRESHOLD {
        signals.push(0.3);
        result.add_reason(
            "SUBSCRIPTION_ABUSE_TRANSACTION_BURST",
            "Many recurring-eligible transactions for this user within 24 hours",
            Severity::Low,
            "user_transactions_24h",
            features.velocity.user_transactions_24h as f64,
            SUBSCRIPTION_USER_TRANSACTIONS_24H_THRESHOLD as f64,
        );
    }

    if event.geo.is_vpn || event.geo.is_proxy {
        signals.push(0.2);
        result.add_reason(
            "SUBSCRIPTION_ABUSE_VPN_PROXY",
            "Recurring charge initiated through a VPN or proxy",
            Severity::Low,
            "ip_is_vpn_or_proxy",
            1.0,
            0.0,
        );
    }

    aggregate(&signals, SUBSCRIPTION_BOOST_K, TRIGGER_THRESHOLD).0
}

#[async_trait]
impl Detector for FriendlyFraudDetector {
    fn name(&self) -> &'static str {
        "friendly_fraud"
    }

    async fn detect(&self, event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut result = DetectionResult::default();
        let dispute = dispute_score(event, features, &mut result);
        let subscription = subscription_abuse_score(event, features, &mut result);
        let score = dispute.max(subscription);
        result.score = score;
        result.triggered = score >= TRIGGER_THRESHOLD;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use crate::types::PaymentEvent;

    #[tokio::test]
    async fn clean_profile_does_not_trigger() {
        let detector = FriendlyFraudDetector::default();
        let result = detector.detect(&PaymentEvent::fixture(), &FeatureSet::default()).await;
        assert!(!result.triggered);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn high_chargeback_rate_triggers() {
        let detector = FriendlyFraudDetector::default();
        let mut features = FeatureSet::default();
        features.entity.user_chargeback_rate_90d = 0.05;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(result.triggered);
        assert!(result.reasons.iter().any(|r| r.code == "FRIENDLY_FRAUD_CHARGEBACK_RATE"));
    }

    #[tokio::test]
    async fn guest_high_value_triggers() {
        let detector = FriendlyFraudDetector::default();
        let mut event = PaymentEvent::fixture();
        event.is_guest = true;
        let mut features = FeatureSet::default();
        features.amount_usd = 600.0;
        let result = detector.detect(&event, &features).await;
        assert!(result.triggered);
    }

    #[tokio::test]
    async fn non_recurring_never_gets_subscription_abuse_signals() {
        let detector = FriendlyFraudDetector::default();
        let mut event = PaymentEvent::fixture();
        event.is_recurring = false;
        let mut features = FeatureSet::default();
        features.account_age_days = 0;
        features.is_new_card_for_user = true;
        let result = detector.detect(&event, &features).await;
        assert!(!result.reasons.iter().any(|r| r.code.starts_with("SUBSCRIPTION_ABUSE")));
    }

    #[tokio::test]
    async fn recurring_new_user_new_card_triggers_subscription_abuse() {
        let detector = FriendlyFraudDetector::default();
        let mut event = PaymentEvent::fixture();
        event.is_recurring = true;
        let mut features = FeatureSet::default();
        features.account_age_days = 1;
        features.is_new_card_for_user = true;
        let result = detector.detect(&event, &features).await;
        assert!(result.triggered);
        assert!(result.reasons.iter().any(|r| r.code == "SUBSCRIPTION_ABUSE_NEW_USER_NEW_CARD"));
    }
}
