//! High-value transaction detector (supplemental to the original
//! detector roster: folded in as a sixth signal source feeding the risk
//! scorer's criminal-score blend, mirroring the original scoring
//! pipeline's dedicated high-value scorer).

use async_trait::async_trait;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.4;
const BOOST_K: f64 = 0.05;

pub struct HighValueDetector {
    pub high_value_usd_threshold: f64,
}

impl Default for HighValueDetector {
    fn default() -> Self {
        Self { high_value_usd_threshold: 1000.0 }
    }
}

#[async_trait]
impl Detector for HighValueDetector {
    fn name(&self) -> &'static str {
        "high_value"
    }

    async fn detect(&self, _event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut result = DetectionResult::default();

        if features.amount_usd < self.high_value_usd_threshold {
            return result;
        }

        let mut signals = Vec::new();

        if features.account_age_days == 0 {
            signals.push(0.6);
            result.add_reason(
                "HIGH_VALUE_NEW_ACCOUNT",
                "High-value transaction from an account created today",
                Severity::High,
                "account_age_days",
                features.account_age_days as f64,
                0.0,
            );
        }

        if features.is_new_card_for_user {
            signals.push(0.5);
            result.add_reason(
                "HIGH_VALUE_NEW_CARD",
                "High-value transaction on a card never seen for this user",
                Severity::Medium,
                "is_new_card_for_user",
                1.0,
                0.0,
            );
        }

        if !features.has_3ds {
            signals.push(0.4);
            result.add_reason(
                "HIGH_VALUE_NO_3DS",
                "High-value transaction completed without 3-D Secure",
                Severity::Medium,
                "has_3ds",
                0.0,
                1.0,
            );
        }

        if !features.avs_match {
            signals.push(0.5);
            result.add_reason(
                "HIGH_VALUE_AVS_FAIL",
                "High-value transaction with a failed address verification check",
                Severity::High,
                "avs_match",
                0.0,
                1.0,
            );
        }

        if !features.cvv_match {
            signals.push(0.6);
            result.add_reason(
                "HIGH_VALUE_CVV_FAIL",
                "High-value transaction with a failed card verification value check",
                Severity::High,
                "cvv_match",
                0.0,
                1.0,
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

    #[tokio::test]
    async fn below_high_value_threshold_never_triggers() {
        let detector = HighValueDetector::default();
        let mut features = FeatureSet::default();
        features.amount_usd = 50.0;
        features.account_age_days = 0;
        features.is_new_card_for_user = true;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(!result.triggered);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn high_value_new_account_and_card_triggers() {
        let detector = HighValueDetector::default();
        let mut features = FeatureSet::default();
        features.amount_usd = 1500.0;
        features.account_age_days = 0;
        features.is_new_card_for_user = true;
        features.has_3ds = true;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(result.triggered);
        assert!(result.reasons.iter().any(|r| r.code == "HIGH_VALUE_NEW_ACCOUNT"));
        assert!(result.reasons.iter().any(|r| r.code == "HIGH_VALUE_NEW_CARD"));
    }

    #[tokio::test]
    async fn high_value_clean_profile_with_3ds_does_not_trigger() {
        let detector = HighValueDetector::default();
        let mut features = FeatureSet::default();
        features.amount_usd = 1500.0;
        features.account_age_days = 365;
        features.is_new_card_for_user = false;
        features.has_3ds = true;
        features.avs_match = true;
        features.cvv_match = true;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(!result.triggered);
    }
}
