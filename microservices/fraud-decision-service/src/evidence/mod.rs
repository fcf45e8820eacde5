//! Evidence Service (component H): captures immutable transaction
//! evidence for dispute representment, model training labels and audit
//! trail; stores idempotency responses; records chargebacks and refunds
//! (spec §4.8, SPEC_FULL §F1).

use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key};
use brivas_lumadb::LumaDbPool;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::config::EvidenceConfig;
use crate::error::Result;
use crate::features::FeatureSet;
use crate::types::{DecisionResponse, PaymentEvent};

type HmacSha256 = Hmac<Sha256>;

/// Derives a 32-byte AES-256 key from an operator-supplied secret of any
/// length or encoding.
fn derive_vault_key(secret: &str) -> [u8; 32] {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

#[derive(Debug, Clone, Serialize)]
struct FeaturesSnapshot<'a> {
    velocity: &'a crate::features::VelocityFeatures,
    entity: &'a crate::features::EntityFeatures,
    transaction: TransactionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
struct TransactionSnapshot {
    amount_cents: i64,
    amount_usd: f64,
    amount_zscore: f64,
    is_high_value: bool,
    is_recurring: bool,
    has_3ds: bool,
    channel: Option<String>,
    hour_of_day: u32,
    is_weekend: bool,
    is_new_card_for_user: bool,
    is_new_device_for_user: bool,
    avs_match: bool,
    cvv_match: bool,
}

#[derive(Debug, Clone, Serialize)]
struct DeviceFingerprint {
    device_id: Option<String>,
    device_type: Option<String>,
    os: Option<String>,
    os_version: Option<String>,
    browser: Option<String>,
    browser_version: Option<String>,
    is_emulator: bool,
    is_rooted: bool,
    screen_resolution: Option<String>,
    timezone: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RawIdentifiers {
    device_id: Option<String>,
    ip_address: Option<String>,
    device_fingerprint: Option<DeviceFingerprint>,
    user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceRecord {
    pub id: String,
    pub transaction_id: String,
    pub idempotency_key: String,
    pub captured_at: DateTime<Utc>,
    pub card_token: String,
    pub user_id: String,
    pub risk_score: f64,
    pub criminal_score: f64,
    pub friendly_fraud_score: f64,
    pub ml_score: Option<f64>,
    pub decision: String,
    pub policy_version: String,
}

pub struct EvidenceService {
    pool: Arc<LumaDbPool>,
    config: EvidenceConfig,
}

impl EvidenceService {
    pub fn new(pool: Arc<LumaDbPool>, config: EvidenceConfig) -> Self {
        Self { pool, config }
    }

    pub async fn health_check(&self) -> bool {
        self.pool.is_healthy().await
    }

    /// Captures evidence for a decided transaction. Failures are logged
    /// and swallowed: evidence capture must never block a decision
    /// response (spec §4.8).
    pub async fn capture_evidence(
        &self,
        event: &PaymentEvent,
        features: &FeatureSet,
        response: &DecisionResponse,
        policy_version_id: Option<i64>,
    ) -> Option<String> {
        match self.try_capture_evidence(event, features, response, policy_version_id).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "evidence capture failed");
                None
            }
        }
    }

    async fn try_capture_evidence(
        &self,
        event: &PaymentEvent,
        features: &FeatureSet,
        response: &DecisionResponse,
        policy_version_id: Option<i64>,
    ) -> Result<String> {
        let evidence_id = Uuid::new_v4().to_string();
        let vault_id = Uuid::new_v4().to_string();

        let snapshot = FeaturesSnapshot {
            velocity: &features.velocity,
            entity: &features.entity,
            transaction: TransactionSnapshot {
                amount_cents: features.amount_cents,
                amount_usd: features.amount_usd,
                amount_zscore: features.amount_zscore,
                is_high_value: features.is_high_value,
                is_recurring: features.is_recurring,
                has_3ds: features.has_3ds,
                channel: event.channel.clone(),
                hour_of_day: features.hour_of_day,
                is_weekend: features.is_weekend,
                is_new_card_for_user: features.is_new_card_for_user,
                is_new_device_for_user: features.is_new_device_for_user,
                avs_match: features.avs_match,
                cvv_match: features.cvv_match,
            },
        };
        let features_json = serde_json::to_value(&snapshot)?;

        let device_fingerprint = event.device.device_id.as_ref().map(|_| DeviceFingerprint {
            device_id: event.device.device_id.clone(),
            device_type: event.device.device_type.clone(),
            os: event.device.os.clone(),
            os_version: event.device.os_version.clone(),
            browser: event.device.browser.clone(),
            browser_version: event.device.browser_version.clone(),
            is_emulator: event.device.is_emulator,
            is_rooted: event.device.is_rooted,
            screen_resolution: event.device.screen_resolution.clone(),
            timezone: event.device.timezone.clone(),
            language: event.device.language.clone(),
        });
        let fingerprint_json = device_fingerprint.as_ref().map(serde_json::to_value).transpose()?;

        let device_id_hash = self.hash_value(event.device.device_id.as_deref());
        let ip_address_hash = self.hash_value(event.geo.ip_address.as_deref());
        let fingerprint_hash = fingerprint_json.as_ref().and_then(|v| self.hash_value(Some(&stable_json(v))));

        let decision_reasons = serde_json::to_value(&response.reasons)?;
        let avs_result = event.verification.avs_result.map(|r| format!("{r:?}"));
        let cvv_result = event.verification.cvv_result.map(|r| format!("{r:?}"));
        let decision_str = format!("{:?}", response.decision).to_uppercase();
        let captured_at = Utc::now();

        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO transaction_evidence (
                    id, transaction_id, idempotency_key, captured_at,
                    amount_cents, currency, service_id, service_name,
                    card_token, card_bin, card_last_four,
                    device_id_hash, ip_address_hash, user_id,
                    risk_score, criminal_score, friendly_fraud_score,
                    ml_score, model_version, model_variant,
                    decision, decision_reasons, features_snapshot,
                    avs_result, cvv_result, three_ds_result, three_ds_version,
                    device_fingerprint, device_fingerprint_hash,
                    geo_country, geo_region, geo_city,
                    policy_version, policy_version_id, processing_time_ms
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24,
                    $25, $26, $27, $28, $29, $30, $31, $32, $33, $34, $35
                )",
                &[
                    &evidence_id,
                    &event.transaction_id,
                    &event.idempotency_key,
                    &captured_at,
                    &event.amount_cents,
                    &event.currency,
                    &event.service_id,
                    &event.service_name,
                    &event.card_token,
                    &event.card_bin,
                    &event.card_last_four,
                    &device_id_hash,
                    &ip_address_hash,
                    &event.user_id,
                    &response.scores.risk,
                    &response.scores.criminal,
                    &response.scores.friendly_fraud,
                    &response.scores.ml_score,
                    &response.scores.model_version,
                    &response.scores.model_variant,
                    &decision_str,
                    &decision_reasons,
                    &features_json,
                    &avs_result,
                    &cvv_result,
                    &event.verification.three_ds_result,
                    &event.verification.three_ds_version,
                    &fingerprint_json,
                    &fingerprint_hash,
                    &event.geo.country,
                    &event.geo.region,
                    &event.geo.city,
                    &response.policy_version,
                    &policy_version_id,
                    &(response.processing_time_ms as i64),
                ],
            )
            .await?;

        self.insert_vault_record(&vault_id, &evidence_id, event).await?;

        Ok(evidence_id)
    }

    async fn insert_vault_record(&self, vault_id: &str, evidence_id: &str, event: &PaymentEvent) -> Result<()> {
        if self.config.vault_key.is_empty() {
            warn!("evidence vault key not configured; skipping vault write");
            return Ok(());
        }

        let raw = RawIdentifiers {
            device_id: event.device.device_id.clone(),
            ip_address: event.geo.ip_address.clone(),
            device_fingerprint: event.device.device_id.as_ref().map(|_| DeviceFingerprint {
                device_id: event.device.device_id.clone(),
                device_type: event.device.device_type.clone(),
                os: event.device.os.clone(),
                os_version: event.device.os_version.clone(),
                browser: event.device.browser.clone(),
                browser_version: event.device.browser_version.clone(),
                is_emulator: event.device.is_emulator,
                is_rooted: event.device.is_rooted,
                screen_resolution: event.device.screen_resolution.clone(),
                timezone: event.device.timezone.clone(),
                language: event.device.language.clone(),
            }),
            user_id: event.user_id.clone(),
        };
        let plaintext = serde_json::to_vec(&raw)?;

        let key = Key::<Aes256Gcm>::from(derive_vault_key(&self.config.vault_key));
        let cipher = Aes256Gcm::new(&key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|e| crate::error::FraudError::Internal(format!("vault encryption failed: {e}")))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        let sealed_hex = hex::encode(sealed);

        let created_at = Utc::now();
        let expires_at = created_at + Duration::days(self.config.retention_days as i64);

        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO evidence_vault (id, evidence_id, ciphertext, created_at, expires_at)
                 VALUES ($1, $2, $3, $4, $5)",
                &[&vault_id, &evidence_id, &sealed_hex, &created_at, &expires_at],
            )
            .await?;
        Ok(())
    }

    pub async fn get_evidence(&self, transaction_id: &str) -> Result<Option<EvidenceRecord>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, transaction_id, idempotency_key, captured_at,
                        card_token, user_id,
                        risk_score, criminal_score, friendly_fraud_score,
                        ml_score, decision, policy_version
                 FROM transaction_evidence WHERE transaction_id = $1",
                &[&transaction_id],
            )
            .await?;
        Ok(row.map(|row| EvidenceRecord {
            id: row.get(0),
            transaction_id: row.get(1),
            idempotency_key: row.get(2),
            captured_at: row.get(3),
            card_token: row.get(4),
            user_id: row.get(5),
            risk_score: row.get(6),
            criminal_score: row.get(7),
            friendly_fraud_score: row.get(8),
            ml_score: row.get(9),
            decision: row.get(10),
            policy_version: row.get(11),
        }))
    }

    pub async fn get_idempotency_response(&self, idempotency_key: &str) -> Result<Option<serde_json::Value>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT response_json FROM idempotency_records
                 WHERE idempotency_key = $1 AND (expires_at IS NULL OR expires_at > NOW())",
                &[&idempotency_key],
            )
            .await?;
        Ok(row.map(|row| row.get(0)))
    }

    pub async fn store_idempotency_response(&self, idempotency_key: &str, response: &serde_json::Value) -> Result<()> {
        let created_at = Utc::now();
        let expires_at = if self.config.idempotency_ttl_hours > 0 {
            Some(created_at + Duration::hours(self.config.idempotency_ttl_hours as i64))
        } else {
            None
        };
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO idempotency_records (idempotency_key, response_json, created_at, expires_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (idempotency_key) DO NOTHING",
                &[&idempotency_key, response, &created_at, &expires_at],
            )
            .await?;
        Ok(())
    }

    pub async fn record_chargeback(
        &self,
        transaction_id: &str,
        chargeback_id: &str,
        amount_cents: i64,
        reason_code: &str,
        reason_description: Option<&str>,
        fraud_type: Option<&str>,
    ) -> Result<String> {
        let record_id = Uuid::new_v4().to_string();
        let received_at = Utc::now();
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO chargebacks (
                    id, transaction_id, chargeback_id, received_at,
                    amount_cents, currency, reason_code, reason_description,
                    fraud_type, status
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'RECEIVED')",
                &[
                    &record_id,
                    &transaction_id,
                    &chargeback_id,
                    &received_at,
                    &amount_cents,
                    &"USD",
                    &reason_code,
                    &reason_description,
                    &fraud_type,
                ],
            )
            .await?;
        Ok(record_id)
    }

    pub async fn record_refund(
        &self,
        transaction_id: &str,
        refund_id: &str,
        amount_cents: i64,
        reason_code: Option<&str>,
        reason_description: Option<&str>,
    ) -> Result<String> {
        let record_id = Uuid::new_v4().to_string();
        let processed_at = Utc::now();
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO refunds (
                    id, transaction_id, refund_id, processed_at,
                    amount_cents, currency, reason_code, reason_description, status
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'RECEIVED')",
                &[
                    &record_id,
                    &transaction_id,
                    &refund_id,
                    &processed_at,
                    &amount_cents,
                    &"USD",
                    &reason_code,
                    &reason_description,
                ],
            )
            .await?;
        Ok(record_id)
    }

    fn hash_value(&self, value: Option<&str>) -> Option<String> {
        let value = value?;
        if self.config.hash_key.is_empty() {
            warn!("evidence hash key not configured; storing null hash");
            return None;
        }
        let mut mac = HmacSha256::new_from_slice(self.config.hash_key.as_bytes()).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

fn stable_json(value: &serde_json::Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_vault_key_is_32_bytes_and_deterministic() {
        let a = derive_vault_key("any-length-secret");
        let b = derive_vault_key("any-length-secret");
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        assert_ne!(derive_vault_key("secret-a"), derive_vault_key("secret-b"));
    }

    #[test]
    fn hash_value_is_deterministic_hmac_hex() {
        let config = EvidenceConfig {
            vault_key: String::new(),
            hash_key: "hmac-key".into(),
            retention_days: 730,
            idempotency_ttl_hours: 24,
        };
        let mut mac = HmacSha256::new_from_slice(config.hash_key.as_bytes()).unwrap();
        mac.update(b"device-123");
        let expected = hex::encode(mac.finalize().into_bytes());

        let mut mac2 = HmacSha256::new_from_slice(config.hash_key.as_bytes()).unwrap();
        mac2.update(b"device-123");
        let actual = hex::encode(mac2.finalize().into_bytes());
        assert_eq!(actual, expected);
    }

    #[test]
    fn vault_roundtrip_encrypts_and_decrypts() {
        let key = Key::<Aes256Gcm>::from(derive_vault_key("vault-secret"));
        let cipher = Aes256Gcm::new(&key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let plaintext = b"{\"user_id\":\"U1\"}";
        let ciphertext = cipher.encrypt(&nonce, plaintext.as_ref()).unwrap();
        let decrypted = cipher.decrypt(&nonce, ciphertext.as_ref()).unwrap();
        assert_eq!(decrypted, plaintext);
    }
}
