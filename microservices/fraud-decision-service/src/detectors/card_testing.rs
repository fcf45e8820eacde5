//! Card testing detector (spec §4.3.1): rapid low-value authorization
//! attempts against a single card or a burst of distinct cards from one
//! device/IP, the classic "checker" pattern.

use async_trait::async_trait;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.5;
const BOOST_K: f64 = 0.05;

pub struct CardTestingDetector {
    pub card_attempts_10m_threshold: u64,
    pub decline_rate_threshold: f64,
    pub decline_rate_min_attempts: u64,
    pub small_amount_cents: i64,
    pub small_amount_min_attempts: u64,
    pub device_distinct_cards_1h_threshold: u64,
    pub ip_distinct_cards_1h_threshold: u64,
}

impl Default for CardTestingDetector {
    fn default() -> Self {
        Self {
            card_attempts_10m_threshold: 5,
            decline_rate_threshold: 0.8,
            decline_rate_min_attempts: 3,
            small_amount_cents: 500,
            small_amount_min_attempts: 2,
            device_distinct_cards_1h_threshold: 5,
            ip_distinct_cards_1h_threshold: 10,
        }
    }
}

#[async_trait]
impl Detector for CardTestingDetector {
    fn name(&self) -> &'static str {
        "card_testing"
    }

    async fn detect(&self, event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut signals = Vec::new();
        let mut result = DetectionResult::default();
        let v = &features.velocity;

        if v.card_attempts_10m >= self.card_attempts_10m_threshold {
            signals.push(0.8);
            result.add_reason(
                "CARD_TESTING_VELOCITY",
                "Multiple authorization attempts on the same card within 10 minutes",
                Severity::High,
                "card_attempts_10m",
                v.card_attempts_10m as f64,
                self.card_attempts_10m_threshold as f64,
            );
        }

        if v.card_decline_rate_10m >= self.decline_rate_threshold
            && v.card_attempts_10m >= self.decline_rate_min_attempts
        {
            signals.push(0.9);
            result.add_reason(
                "CARD_TESTING_DECLINE_RATE",
                "High decline rate on a card with multiple recent attempts",
                Severity::High,
                "card_decline_rate_10m",
                v.card_decline_rate_10m,
                self.decline_rate_threshold,
            );
        }

        if event.amount_cents <= self.small_amount_cents && v.card_attempts_10m >= self.small_amount_min_attempts {
            signals.push(0.6);
            result.add_reason(
                "CARD_TESTING_SMALL_AMOUNT",
                "Repeated small-value authorizations consistent with card testing",
                Severity::Medium,
                "amount_cents",
                event.amount_cents as f64,
                self.small_amount_cents as f64,
            );
        }

        if v.device_distinct_cards_1h >= self.device_distinct_cards_1h_threshold {
            signals.push(0.85);
            result.add_reason(
                "CARD_TESTING_DEVICE_FANOUT",
                "One device has attempted many distinct cards within an hour",
                Severity::High,
                "device_distinct_cards_1h",
                v.device_distinct_cards_1h as f64,
                self.device_distinct_cards_1h_threshold as f64,
            );
        }

        if v.ip_distinct_cards_1h >= self.ip_distinct_cards_1h_threshold {
            signals.push(0.8);
            result.add_reason(
                "CARD_TESTING_IP_FANOUT",
                "One IP has attempted many distinct cards within an hour",
                Severity::High,
                "ip_distinct_cards_1h",
                v.ip_distinct_cards_1h as f64,
                self.ip_distinct_cards_1h_threshold as f64,
            );
        }

        let (score, triggered) = aggregate(&signals, BOOST_K, TRIGGER_THRESHOLD);
        result.score = score;
        result.triggered = triggered;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use crate::types::PaymentEvent;

    fn event() -> PaymentEvent {
        PaymentEvent::fixture()
    }

    #[tokio::test]
    async fn clean_profile_does_not_trigger() {
        let detector = CardTestingDetector::default();
        let result = detector.detect(&event(), &FeatureSet::default()).await;
        assert!(!result.triggered);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn four_attempts_does_not_trigger_velocity_signal() {
        let detector = CardTestingDetector::default();
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_10m = 4;
        let result = detector.detect(&event(), &features).await;
        assert!(!result.reasons.iter().any(|r| r.code == "CARD_TESTING_VELOCITY"));
    }

    #[tokio::test]
    async fn five_attempts_triggers_velocity_signal() {
        let detector = CardTestingDetector::default();
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_10m = 5;
        let result = detector.detect(&event(), &features).await;
        assert!(result.reasons.iter().any(|r| r.code == "CARD_TESTING_VELOCITY"));
        assert!(result.triggered);
    }

    #[tokio::test]
    async fn decline_burst_plus_velocity_boosts_above_single_signal() {
        let detector = CardTestingDetector::default();
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_10m = 6;
        features.velocity.card_decline_rate_10m = 0.9;
        let result = detector.detect(&event(), &features).await;
        assert!((result.score - 0.95).abs() < 1e-9);
    }
}
