//! Detectors (component C): five parallel scorers sharing one contract.
//!
//! Modeled as a closed set of variants implementing the same `detect`
//! signature — a tagged union with a shared contract, not a class
//! hierarchy, matching the fixed detector roster (spec §9).

pub mod bot;
pub mod card_testing;
pub mod friendly_fraud;
pub mod geo;
pub mod high_value;
pub mod velocity_attack;

use async_trait::async_trait;
use tracing::warn;

use crate::features::FeatureSet;
use crate::types::{DecisionReason, PaymentEvent, Severity};

#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    pub score: f64,
    pub triggered: bool,
    pub reasons: Vec<DecisionReason>,
}

impl DetectionResult {
    pub fn add_reason(&mut self, code: &str, description: &str, severity: Severity, triggered_by: &str, value: f64, threshold: f64) {
        self.reasons.push(DecisionReason {
            code: code.to_string(),
            description: description.to_string(),
            severity,
            triggered_by: triggered_by.to_string(),
            value,
            threshold,
        });
    }
}

/// Aggregates a set of `[0,1]` signals into one score using the formula
/// shared by every detector: `min(1, max(signals) + k*(n-1))`, and
/// reports whether the result clears the detector's trigger threshold.
pub fn aggregate(signals: &[f64], boost_k: f64, trigger_threshold: f64) -> (f64, bool) {
    if signals.is_empty() {
        return (0.0, false);
    }
    let max = signals.iter().cloned().fold(0.0_f64, f64::max);
    let score = (max + boost_k * (signals.len() as f64 - 1.0)).min(1.0);
    (score, score >= trigger_threshold)
}

#[async_trait]
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;
    async fn detect(&self, event: &PaymentEvent, features: &FeatureSet) -> DetectionResult;
}

pub struct DetectionEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectionEngine {
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(card_testing::CardTestingDetector::default()),
                Box::new(velocity_attack::VelocityAttackDetector::default()),
                Box::new(geo::GeoAnomalyDetector::default()),
                Box::new(bot::BotDetector::default()),
                Box::new(friendly_fraud::FriendlyFraudDetector::default()),
                Box::new(high_value::HighValueDetector::default()),
            ],
        }
    }

    /// Runs all detectors concurrently. A detector that panics or is
    /// cancelled degrades to a zero score rather than failing the whole
    /// decision (spec §5 graceful degradation).
    pub async fn run_all(&self, event: &PaymentEvent, features: &FeatureSet) -> Vec<(&'static str, DetectionResult)> {
        let futures = self.detectors.iter().map(|d| async move {
            let name = d.name();
            let result = d.detect(event, features).await;
            (name, result)
        });
        futures_util::future::join_all(futures).await
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs and degrades a detector failure to a zero score. Detectors in
/// this codebase are pure functions and cannot fail, but the hook exists
/// for the pipeline's deadline-cancellation path (spec §5).
pub fn degrade(name: &str) -> DetectionResult {
    warn!(detector = name, "detector degraded to zero score");
    DetectionResult::default()
}
