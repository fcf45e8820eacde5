//! ML Scorer (component D): champion/challenger/holdout routing over a
//! small JSON-backed model registry, with a fixed-order feature vector
//! shared between live scoring and offline evidence replay.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::features::FeatureSet;

/// Canonical feature column order. Both live scoring and offline
/// extraction from an evidence snapshot must agree on this order.
pub const FEATURE_COLUMNS: &[&str] = &[
    "card_attempts_10m",
    "card_attempts_1h",
    "card_attempts_24h",
    "device_distinct_cards_1h",
    "device_distinct_cards_24h",
    "ip_distinct_cards_1h",
    "user_amount_24h_cents",
    "card_decline_rate_1h",
    "card_age_hours",
    "device_age_hours",
    "user_account_age_days",
    "user_chargeback_count_lifetime",
    "user_chargeback_rate_90d",
    "user_refund_count_90d",
    "card_distinct_devices_30d",
    "card_distinct_users_30d",
    "amount_usd",
    "amount_zscore",
    "is_new_card_for_user",
    "is_new_device_for_user",
    "hour_of_day",
    "is_weekend",
    "is_emulator",
    "is_rooted",
    "is_datacenter_ip",
    "is_vpn",
    "is_tor",
    "ip_risk_score",
];

fn as_number(value: Option<&serde_json::Value>) -> f64 {
    match value {
        None | Some(serde_json::Value::Null) => 0.0,
        Some(serde_json::Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extracts a feature dict from a live `FeatureSet`.
pub fn extract_feature_dict(features: &FeatureSet) -> BTreeMap<String, f64> {
    let v = &features.velocity;
    let e = &features.entity;
    let mut values = BTreeMap::new();
    values.insert("card_attempts_10m".to_string(), v.card_attempts_10m as f64);
    values.insert("card_attempts_1h".to_string(), v.card_attempts_1h as f64);
    values.insert("card_attempts_24h".to_string(), v.card_attempts_24h as f64);
    values.insert("device_distinct_cards_1h".to_string(), v.device_distinct_cards_1h as f64);
    values.insert("device_distinct_cards_24h".to_string(), v.device_distinct_cards_24h as f64);
    values.insert("ip_distinct_cards_1h".to_string(), v.ip_distinct_cards_1h as f64);
    values.insert("user_amount_24h_cents".to_string(), v.user_amount_24h_cents as f64);
    values.insert("card_decline_rate_1h".to_string(), v.card_decline_rate_1h);
    values.insert("card_age_hours".to_string(), e.card_age_hours);
    values.insert("device_age_hours".to_string(), e.device_age_hours);
    values.insert("user_account_age_days".to_string(), e.user_account_age_days as f64);
    values.insert("user_chargeback_count_lifetime".to_string(), e.user_chargeback_count_lifetime as f64);
    values.insert("user_chargeback_rate_90d".to_string(), e.user_chargeback_rate_90d);
    values.insert("user_refund_count_90d".to_string(), e.user_refund_count_90d as f64);
    values.insert("card_distinct_devices_30d".to_string(), v.card_distinct_devices_30d as f64);
    values.insert("card_distinct_users_30d".to_string(), v.card_distinct_users_30d as f64);
    values.insert("amount_usd".to_string(), features.amount_usd);
    values.insert("amount_zscore".to_string(), features.amount_zscore);
    values.insert("is_new_card_for_user".to_string(), bool_f64(features.is_new_card_for_user));
    values.insert("is_new_device_for_user".to_string(), bool_f64(features.is_new_device_for_user));
    values.insert("hour_of_day".to_string(), features.hour_of_day as f64);
    values.insert("is_weekend".to_string(), bool_f64(features.is_weekend));
    values.insert("is_emulator".to_string(), bool_f64(e.device_is_emulator));
    values.insert("is_rooted".to_string(), bool_f64(e.device_is_rooted));
    values.insert("is_datacenter_ip".to_string(), bool_f64(e.ip_is_datacenter));
    values.insert("is_vpn".to_string(), bool_f64(e.ip_is_vpn));
    values.insert("is_tor".to_string(), bool_f64(e.ip_is_tor));
    values.insert("ip_risk_score".to_string(), e.ip_risk_score);
    values
}

/// Extracts the same feature dict from an evidence snapshot's stored
/// JSON, for offline replay and drift analysis.
pub fn extract_from_snapshot(snapshot: &serde_json::Value) -> BTreeMap<String, f64> {
    let velocity = snapshot.get("velocity");
    let entity = snapshot.get("entity");
    let transaction = snapshot.get("transaction");

    let get = |obj: Option<&serde_json::Value>, key: &str| obj.and_then(|o| o.get(key));

    let attempts_1h = as_number(get(velocity, "card_attempts_1h"));
    let declines_1h = as_number(get(velocity, "card_declines_1h"));
    let decline_rate_1h = match get(velocity, "card_decline_rate_1h") {
        Some(serde_json::Value::Null) | None => {
            if attempts_1h > 0.0 {
                declines_1h / attempts_1h
            } else {
                0.0
            }
        }
        other => as_number(other),
    };

    let mut values = BTreeMap::new();
    values.insert("card_attempts_10m".to_string(), as_number(get(velocity, "card_attempts_10m")));
    values.insert("card_attempts_1h".to_string(), attempts_1h);
    values.insert("card_attempts_24h".to_string(), as_number(get(velocity, "card_attempts_24h")));
    values.insert("device_distinct_cards_1h".to_string(), as_number(get(velocity, "device_distinct_cards_1h")));
    values.insert("device_distinct_cards_24h".to_string(), as_number(get(velocity, "device_distinct_cards_24h")));
    values.insert("ip_distinct_cards_1h".to_string(), as_number(get(velocity, "ip_distinct_cards_1h")));
    values.insert("user_amount_24h_cents".to_string(), as_number(get(velocity, "user_amount_24h_cents")));
    values.insert("card_decline_rate_1h".to_string(), decline_rate_1h);
    values.insert("card_age_hours".to_string(), as_number(get(entity, "card_age_hours")));
    values.insert("device_age_hours".to_string(), as_number(get(entity, "device_age_hours")));
    values.insert("user_account_age_days".to_string(), as_number(get(entity, "user_account_age_days")));
    values.insert("user_chargeback_count_lifetime".to_string(), as_number(get(entity, "user_chargeback_count")));
    values.insert("user_chargeback_rate_90d".to_string(), as_number(get(entity, "user_chargeback_rate_90d")));
    values.insert("user_refund_count_90d".to_string(), as_number(get(entity, "user_refund_count_90d")));
    values.insert("card_distinct_devices_30d".to_string(), as_number(get(velocity, "card_distinct_devices_30d")));
    values.insert("card_distinct_users_30d".to_string(), as_number(get(velocity, "card_distinct_users_30d")));
    values.insert("amount_usd".to_string(), as_number(get(transaction, "amount_usd")));
    values.insert("amount_zscore".to_string(), as_number(get(transaction, "amount_zscore")));
    values.insert("is_new_card_for_user".to_string(), as_number(get(transaction, "is_new_card_for_user")));
    values.insert("is_new_device_for_user".to_string(), as_number(get(transaction, "is_new_device_for_user")));
    values.insert("hour_of_day".to_string(), as_number(get(transaction, "hour_of_day")));
    values.insert("is_weekend".to_string(), as_number(get(transaction, "is_weekend")));
    values.insert("is_emulator".to_string(), as_number(get(entity, "device_is_emulator")));
    values.insert("is_rooted".to_string(), as_number(get(entity, "device_is_rooted")));
    values.insert("is_datacenter_ip".to_string(), as_number(get(entity, "ip_is_datacenter")));
    values.insert("is_vpn".to_string(), as_number(get(entity, "ip_is_vpn")));
    values.insert("is_tor".to_string(), as_number(get(entity, "ip_is_tor")));
    values.insert("ip_risk_score".to_string(), as_number(get(entity, "ip_risk_score")));
    values
}

fn bool_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Returns the feature vector ordered by `FEATURE_COLUMNS`, defaulting
/// missing keys to zero.
pub fn vector_from_feature_dict(values: &BTreeMap<String, f64>) -> Vec<f64> {
    FEATURE_COLUMNS.iter().map(|name| values.get(*name).copied().unwrap_or(0.0)).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub version: String,
    pub path: String,
    pub framework: String,
    pub model_type: String,
    pub trained_at: String,
    #[serde(default)]
    pub auc: Option<f64>,
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub window_end: Option<String>,
}

/// Loads and persists model registry metadata, a small JSON file
/// mapping `{slot: ModelEntry}` (spec §4.4, SPEC_FULL §F1).
pub struct ModelRegistry {
    path: PathBuf,
    data: RwLock<BTreeMap<String, ModelEntry>>,
}

impl ModelRegistry {
    pub fn load(registry_path: impl AsRef<Path>) -> Self {
        let path = registry_path.as_ref().to_path_buf();
        let data = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Self { path, data: RwLock::new(data) }
    }

    pub fn get(&self, slot: &str) -> Option<ModelEntry> {
        self.data.read().expect("registry lock poisoned").get(slot).cloned()
    }

    pub fn set(&self, slot: &str, entry: ModelEntry) {
        {
            let mut data = self.data.write().expect("registry lock poisoned");
            data.insert(slot.to_string(), entry);
        }
        self.save();
    }

    /// Seeds an empty registry with a champion entry so scoring never
    /// panics on first boot; a no-op if the registry already has data.
    pub fn ensure_default(&self, champion: Option<ModelEntry>) {
        let is_empty = self.data.read().expect("registry lock poisoned").is_empty();
        if !is_empty {
            return;
        }
        if let Some(entry) = champion {
            self.set("champion", entry);
        }
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let data = self.data.read().expect("registry lock poisoned");
        if let Ok(json) = serde_json::to_string_pretty(&*data) {
            if let Err(err) = std::fs::write(&self.path, json) {
                warn!(error = %err, path = %self.path.display(), "failed to persist model registry");
            }
        }
    }
}

/// A model backing that can be scored in-process. Concrete model
/// frameworks this service does not link against (xgboost, lightgbm)
/// fall through the `None` path in `load_model`, same as the original's
/// "framework unavailable" branch.
pub trait Model: Send + Sync {
    fn predict(&self, vector: &[f64]) -> f64;
}

/// Logistic-regression model: `sigmoid(bias + weights . vector)`,
/// loaded from a small JSON file of coefficients. The only model type
/// this service links natively; any other `model_type` degrades to a
/// null score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl Model for LogisticModel {
    fn predict(&self, vector: &[f64]) -> f64 {
        let z: f64 = self.bias + vector.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

#[derive(Debug, Clone)]
pub struct MlScoreResult {
    pub score: Option<f64>,
    pub model_version: Option<String>,
    pub model_variant: &'static str,
    pub latency_ms: f64,
}

/// Scores transactions using champion/challenger/holdout ML routing
/// (spec §4.4).
pub struct MlScorer {
    registry: ModelRegistry,
    challenger_percent: u8,
    holdout_percent: u8,
    models: RwLock<BTreeMap<String, std::sync::Arc<dyn Model>>>,
}

impl MlScorer {
    pub fn new(registry: ModelRegistry, challenger_percent: u8, holdout_percent: u8) -> Self {
        Self {
            registry,
            challenger_percent: challenger_percent.min(100),
            holdout_percent: holdout_percent.min(100),
            models: RwLock::new(BTreeMap::new()),
        }
    }

    fn route_variant(&self, routing_key: &str) -> &'static str {
        if routing_key.is_empty() {
            return "champion";
        }
        let digest = Sha256::digest(routing_key.as_bytes());
        let bucket = (u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 100) as u8;
        if bucket < self.holdout_percent {
            "holdout"
        } else if bucket < self.holdout_percent + self.challenger_percent {
            "challenger"
        } else {
            "champion"
        }
    }

    fn load_model(&self, entry: &ModelEntry) -> Option<std::sync::Arc<dyn Model>> {
        let cache_key = format!("{}:{}", entry.name, entry.path);
        if let Some(model) = self.models.read().expect("model cache lock poisoned").get(&cache_key) {
            return Some(model.clone());
        }
        if entry.path.is_empty() {
            return None;
        }
        if entry.model_type != "logistic_regression" {
            warn!(model_type = %entry.model_type, "unsupported model_type, framework unavailable");
            return None;
        }
        let path = Path::new(&entry.path);
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "model file not found");
                return None;
            }
        };
        let model: LogisticModel = match serde_json::from_str(&contents) {
            Ok(m) => m,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "model file could not be parsed");
                return None;
            }
        };
        let model: std::sync::Arc<dyn Model> = std::sync::Arc::new(model);
        self.models.write().expect("model cache lock poisoned").insert(cache_key, model.clone());
        Some(model)
    }

    pub fn score(&self, features: &FeatureSet, routing_key: &str) -> MlScoreResult {
        let started = std::time::Instant::now();
        let variant = self.route_variant(routing_key);

        if variant == "holdout" {
            return MlScoreResult { score: None, model_version: None, model_variant: variant, latency_ms: elapsed_ms(started) };
        }

        let Some(entry) = self.registry.get(variant) else {
            return MlScoreResult { score: None, model_version: None, model_variant: variant, latency_ms: elapsed_ms(started) };
        };

        let Some(model) = self.load_model(&entry) else {
            return MlScoreResult {
                score: None,
                model_version: Some(entry.version),
                model_variant: variant,
                latency_ms: elapsed_ms(started),
            };
        };

        let feature_values = extract_feature_dict(features);
        let vector = vector_from_feature_dict(&feature_values);
        let raw_score = model.predict(&vector).clamp(0.0, 1.0);

        MlScoreResult {
            score: Some(raw_score),
            model_version: Some(entry.version),
            model_variant: variant,
            latency_ms: elapsed_ms(started),
        }
    }
}

fn elapsed_ms(started: std::time::Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;

    #[test]
    fn feature_vector_length_matches_column_count() {
        let features = FeatureSet::default();
        let dict = extract_feature_dict(&features);
        let vector = vector_from_feature_dict(&dict);
        assert_eq!(vector.len(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn live_and_snapshot_extraction_agree_on_missing_fields() {
        let live_vector = vector_from_feature_dict(&extract_feature_dict(&FeatureSet::default()));
        let snapshot = serde_json::json!({});
        let snapshot_vector = vector_from_feature_dict(&extract_from_snapshot(&snapshot));
        assert_eq!(live_vector, snapshot_vector);
    }

    #[test]
    fn snapshot_falls_back_to_computing_decline_rate() {
        let snapshot = serde_json::json!({
            "velocity": {"card_attempts_1h": 10, "card_declines_1h": 5},
        });
        let dict = extract_from_snapshot(&snapshot);
        assert_eq!(dict.get("card_decline_rate_1h").copied(), Some(0.5));
    }

    #[test]
    fn routing_is_deterministic_for_same_key() {
        let registry = ModelRegistry { path: PathBuf::from("/dev/null"), data: RwLock::new(BTreeMap::new()) };
        let scorer = MlScorer::new(registry, 15, 5);
        let a = scorer.route_variant("user_42");
        let b = scorer.route_variant("user_42");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_routing_key_always_champion() {
        let registry = ModelRegistry { path: PathBuf::from("/dev/null"), data: RwLock::new(BTreeMap::new()) };
        let scorer = MlScorer::new(registry, 15, 5);
        assert_eq!(scorer.route_variant(""), "champion");
    }

    #[test]
    fn missing_registry_entry_scores_null() {
        let registry = ModelRegistry { path: PathBuf::from("/dev/null"), data: RwLock::new(BTreeMap::new()) };
        let scorer = MlScorer::new(registry, 0, 0);
        let result = scorer.score(&FeatureSet::default(), "anything");
        assert!(result.score.is_none());
        assert_eq!(result.model_variant, "champion");
    }

    #[test]
    fn logistic_model_predicts_within_unit_interval() {
        let model = LogisticModel { bias: 0.1, weights: vec![0.5; FEATURE_COLUMNS.len()] };
        let vector = vec![1.0; FEATURE_COLUMNS.len()];
        let score = model.predict(&vector);
        assert!((0.0..=1.0).contains(&score));
    }
}
