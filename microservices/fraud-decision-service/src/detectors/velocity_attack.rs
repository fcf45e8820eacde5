//! Velocity attack detector (spec §4.3.2): broader rate-of-activity
//! anomalies that card testing's tighter thresholds miss — sustained
//! high-volume abuse across card, device, IP and user entities.

use async_trait::async_trait;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.4;
const BOOST_K: f64 = 0.03;

pub struct VelocityAttackDetector {
    pub card_attempts_1h_threshold: u64,
    pub device_distinct_cards_24h_threshold: u64,
    pub ip_distinct_cards_1h_threshold: u64,
    pub user_transactions_24h_threshold: u64,
    pub user_amount_24h_threshold_cents: i64,
    pub card_distinct_merchants_24h_threshold: u64,
    pub card_distinct_devices_24h_threshold: u64,
    pub card_distinct_ips_24h_threshold: u64,
}

impl Default for VelocityAttackDetector {
    fn default() -> Self {
        Self {
            card_attempts_1h_threshold: 10,
            device_distinct_cards_24h_threshold: 5,
            ip_distinct_cards_1h_threshold: 10,
            user_transactions_24h_threshold: 20,
            user_amount_24h_threshold_cents: 500_000,
            card_distinct_merchants_24h_threshold: 10,
            card_distinct_devices_24h_threshold: 3,
            card_distinct_ips_24h_threshold: 5,
        }
    }
}

/// Scales linearly to 1.0 at 2x the threshold, matching the original
/// detector's `min(1, value / (threshold * 2))` scaling.
fn scaled(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (value / (threshold * 2.0)).min(1.0)
}

fn severity_for(value: f64, threshold: f64) -> Severity {
    if value >= threshold * 2.0 {
        Severity::Critical
    } else {
        Severity::High
    }
}

#[async_trait]
impl Detector for VelocityAttackDetector {
    fn name(&self) -> &'static str {
        "velocity_attack"
    }

    async fn detect(&self, _event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut signals = Vec::new();
        let mut result = DetectionResult::default();
        let v = &features.velocity;

        if v.card_attempts_1h >= self.card_attempts_1h_threshold {
            let value = v.card_attempts_1h as f64;
            let threshold = self.card_attempts_1h_threshold as f64;
            let score = scaled(value, threshold);
            signals.push(score);
            result.add_reason(
                "VELOCITY_CARD_ATTEMPTS",
                "Card authorization attempts exceed the hourly velocity threshold",
                severity_for(value, threshold),
                "card_attempts_1h",
                value,
                threshold,
            );
        }

        if v.device_distinct_cards_24h >= self.device_distinct_cards_24h_threshold {
            let value = v.device_distinct_cards_24h as f64;
            let threshold = self.device_distinct_cards_24h_threshold as f64;
            signals.push(scaled(value, threshold));
            result.add_reason(
                "VELOCITY_DEVICE_CARD_FANOUT",
                "Device has used many distinct cards within 24 hours",
                severity_for(value, threshold),
                "device_distinct_cards_24h",
                value,
                threshold,
            );
        }

        if v.ip_distinct_cards_1h >= self.ip_distinct_cards_1h_threshold {
            let value = v.ip_distinct_cards_1h as f64;
            let threshold = self.ip_distinct_cards_1h_threshold as f64;
            signals.push(scaled(value, threshold));
            result.add_reason(
                "VELOCITY_IP_CARD_FANOUT",
                "IP has used many distinct cards within an hour",
                severity_for(value, threshold),
                "ip_distinct_cards_1h",
                value,
                threshold,
            );
        }

        if v.user_transactions_24h >= self.user_transactions_24h_threshold {
            signals.push(0.5);
            result.add_reason(
                "VELOCITY_USER_TRANSACTIONS",
                "User transaction count exceeds the daily velocity threshold",
                Severity::Medium,
                "user_transactions_24h",
                v.user_transactions_24h as f64,
                self.user_transactions_24h_threshold as f64,
            );
        }

        if v.user_amount_24h_cents >= self.user_amount_24h_threshold_cents {
            signals.push(0.5);
            result.add_reason(
                "VELOCITY_USER_AMOUNT",
                "User spend exceeds the daily velocity threshold",
                Severity::Medium,
                "user_amount_24h_cents",
                v.user_amount_24h_cents as f64,
                self.user_amount_24h_threshold_cents as f64,
            );
        }

        if v.card_distinct_merchants_24h >= self.card_distinct_merchants_24h_threshold {
            signals.push(0.5);
            result.add_reason(
                "VELOCITY_CARD_MERCHANT_FANOUT",
                "Card used across many distinct merchants within 24 hours",
                Severity::Medium,
                "card_distinct_merchants_24h",
                v.card_distinct_merchants_24h as f64,
                self.card_distinct_merchants_24h_threshold as f64,
            );
        }

        if v.card_distinct_devices_24h >= self.card_distinct_devices_24h_threshold
            || v.card_distinct_ips_24h >= self.card_distinct_ips_24h_threshold
        {
            signals.push(2.0 / 3.0);
            result.add_reason(
                "VELOCITY_CARD_DEVICE_IP_FANOUT",
                "Card used across many distinct devices or IPs within 24 hours",
                Severity::Medium,
                "card_distinct_devices_24h_or_ips_24h",
                v.card_distinct_devices_24h.max(v.card_distinct_ips_24h) as f64,
                self.card_distinct_devices_24h_threshold as f64,
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
    use crate::types::{PaymentEvent, Severity};

    fn event() -> PaymentEvent {
        PaymentEvent::fixture()
    }

    #[tokio::test]
    async fn below_threshold_does_not_trigger() {
        let detector = VelocityAttackDetector::default();
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_1h = 9;
        let result = detector.detect(&event(), &features).await;
        assert!(!result.triggered);
    }

    #[tokio::test]
    async fn double_threshold_is_critical_severity() {
        let detector = VelocityAttackDetector::default();
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_1h = 20;
        let result = detector.detect(&event(), &features).await;
        assert!(result.triggered);
        assert_eq!(result.reasons[0].severity, Severity::Critical);
        assert!((result.score - 1.0).abs() < 1e-9);
    }
}
