//! Risk Scorer (component E): blends the detector roster's rule-based
//! criminal score with an optional ML score, applies near-binary bot
//! overrides, and folds in the friendly-fraud score with a confidence
//! remap.

use crate::detectors::DetectionEngine;
use crate::features::FeatureSet;
use crate::ml::MlScorer;
use crate::types::{DecisionReason, PaymentEvent, RiskScores};

const WEIGHT_CARD_TESTING: f64 = 1.0;
const WEIGHT_VELOCITY: f64 = 0.9;
const WEIGHT_GEO: f64 = 0.7;
const WEIGHT_BOT: f64 = 1.0;
const WEIGHT_HIGH_VALUE: f64 = 0.8;

const BOT_OVERRIDE_SCORE: f64 = 0.95;
const CONFIDENCE_REMAP_THRESHOLD: f64 = 0.5;
const CONFIDENCE_REMAP_FLOOR: f64 = 0.3;

pub struct RiskScorer {
    detectors: DetectionEngine,
    ml: Option<MlScorer>,
    ml_weight: f64,
}

impl RiskScorer {
    pub fn new(detectors: DetectionEngine, ml: Option<MlScorer>, ml_weight: f64) -> Self {
        Self { detectors, ml, ml_weight }
    }

    pub async fn score(&self, event: &PaymentEvent, features: &FeatureSet) -> (RiskScores, Vec<DecisionReason>) {
        let results = self.detectors.run_all(event, features).await;

        let mut scores = RiskScores::default();
        let mut rule_criminal = 0.0_f64;
        let mut friendly_score = 0.0_f64;
        let mut reasons = Vec::new();

        for (name, result) in &results {
            if result.triggered {
                reasons.extend(result.reasons.iter().cloned());
            }
            match *name {
                "card_testing" => {
                    scores.card_testing_score = result.score;
                    rule_criminal = rule_criminal.max(WEIGHT_CARD_TESTING * result.score);
                }
                "velocity_attack" => {
                    scores.velocity_score = result.score;
                    rule_criminal = rule_criminal.max(WEIGHT_VELOCITY * result.score);
                }
                "geo" => {
                    scores.geo_score = result.score;
                    rule_criminal = rule_criminal.max(WEIGHT_GEO * result.score);
                }
                "bot" => {
                    scores.bot_score = result.score;
                    rule_criminal = rule_criminal.max(WEIGHT_BOT * result.score);
                }
                "high_value" => {
                    scores.high_value_score = result.score;
                    rule_criminal = rule_criminal.max(WEIGHT_HIGH_VALUE * result.score);
                }
                "friendly_fraud" => {
                    scores.friendly_fraud_score = result.score;
                    friendly_score = result.score;
                }
                _ => {}
            }
        }
        rule_criminal = rule_criminal.min(1.0);

        let mut criminal_score = rule_criminal;
        if let Some(ml) = &self.ml {
            let ml_result = ml.score(features, &event.user_id);
            if let Some(ml_score) = ml_result.score {
                criminal_score = self.ml_weight * ml_score + (1.0 - self.ml_weight) * rule_criminal;
            }
            scores.ml_score = ml_result.score;
            scores.model_version = ml_result.model_version;
            scores.model_variant = Some(ml_result.model_variant.to_string());
        }

        if features.entity.device_is_emulator || features.entity.ip_is_tor || event.device.is_emulator || event.geo.is_tor {
            criminal_score = criminal_score.max(BOT_OVERRIDE_SCORE);
        }

        scores.criminal = criminal_score;
        scores.friendly_fraud = friendly_score;

        let confidence = compute_confidence(features);
        scores.confidence = confidence;

        let mut risk_score = criminal_score.max(friendly_score);
        if confidence < CONFIDENCE_REMAP_THRESHOLD {
            risk_score = CONFIDENCE_REMAP_FLOOR + (risk_score - CONFIDENCE_REMAP_FLOOR) * confidence * 2.0;
        }
        scores.risk = risk_score;

        scores.round();
        (scores, reasons)
    }
}

/// Confidence is the mean of four factors: card history, user history,
/// device history, and data completeness (spec §4.5).
fn compute_confidence(features: &FeatureSet) -> f64 {
    let card_history = if features.entity.card_age_hours > 0.0 {
        (features.velocity.card_attempts_24h as f64 / 10.0).min(1.0)
    } else {
        0.3
    };

    let user_history = if features.account_age_days > 0 && !features.is_guest {
        (features.velocity.user_transactions_24h as f64 / 20.0).min(1.0)
    } else {
        0.3
    };

    let device_history = if features.entity.device_age_hours > 0.0 {
        (features.velocity.device_distinct_cards_24h as f64 / 5.0).min(1.0)
    } else {
        0.4
    };

    let mut completeness = 0.0;
    if features.device_id_present {
        completeness += 0.3;
    }
    if features.ip_country.is_some() {
        completeness += 0.3;
    }
    if features.entity.card_user_match || features.has_3ds {
        completeness += 0.4;
    }

    (card_history + user_history + device_history + completeness) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::DetectionEngine;
    use crate::types::PaymentEvent;

    #[tokio::test]
    async fn clean_event_scores_low_risk() {
        let scorer = RiskScorer::new(DetectionEngine::new(), None, 0.7);
        let features = FeatureSet::default();
        let (scores, _) = scorer.score(&PaymentEvent::fixture(), &features).await;
        assert!(scores.risk < 0.3);
    }

    #[tokio::test]
    async fn emulator_overrides_criminal_score_to_at_least_0_95() {
        let scorer = RiskScorer::new(DetectionEngine::new(), None, 0.7);
        let mut event = PaymentEvent::fixture();
        event.device.is_emulator = true;
        let features = FeatureSet::default();
        let (scores, _) = scorer.score(&event, &features).await;
        assert!(scores.criminal >= BOT_OVERRIDE_SCORE - 1e-9);
    }

    #[test]
    fn confidence_is_mean_of_four_factors_bounded() {
        let features = FeatureSet::default();
        let confidence = compute_confidence(&features);
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[tokio::test]
    async fn low_confidence_compresses_risk_toward_floor() {
        let scorer = RiskScorer::new(DetectionEngine::new(), None, 0.7);
        let mut features = FeatureSet::default();
        features.velocity.card_attempts_1h = 20;
        let (scores, _) = scorer.score(&PaymentEvent::fixture(), &features).await;
        if scores.confidence < CONFIDENCE_REMAP_THRESHOLD {
            assert!(scores.risk <= scores.criminal.max(scores.friendly_fraud) + 1e-9);
        }
    }
}
