//! Policy Versioning Service (component G): every policy change creates
//! a new immutable version; activation is an atomic swap of the
//! `is_active` flag. Semantic version bumps follow the original's
//! scheme: rule/rollback changes bump MINOR, threshold/list changes
//! bump PATCH (spec §4.7, SPEC_FULL §F1).

use std::sync::Arc;

use brivas_lumadb::LumaDbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{FraudError, Result};

use super::PolicyRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyVersion {
    pub id: i64,
    pub version: String,
    pub policy_content: PolicyRules,
    pub policy_hash: String,
    pub change_type: String,
    pub change_summary: String,
    pub changed_by: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub previous_version: Option<String>,
}

/// Change types that bump MINOR rather than PATCH.
const MINOR_CHANGE_TYPES: &[&str] = &["rule_add", "rule_update", "rule_delete", "rollback"];

fn increment_version(current: &str, change_type: &str) -> String {
    let parts: Vec<&str> = current.split('.').collect();
    let (major, minor, patch) = match parts.as_slice() {
        [maj, min, pat] => {
            let parsed = (maj.parse::<u32>(), min.parse::<u32>(), pat.parse::<u32>());
            match parsed {
                (Ok(maj), Ok(min), Ok(pat)) => (maj, min, pat),
                _ => return "1.0.1".to_string(),
            }
        }
        _ => return "1.0.1".to_string(),
    };

    if MINOR_CHANGE_TYPES.contains(&change_type) {
        format!("{major}.{}.0", minor + 1)
    } else {
        format!("{major}.{minor}.{}", patch + 1)
    }
}

fn compute_hash(policy: &PolicyRules) -> String {
    let json = serde_json::to_string(policy).unwrap_or_default();
    hex::encode(Sha256::digest(json.as_bytes()))
}

pub struct PolicyVersioningService {
    pool: Arc<LumaDbPool>,
}

impl PolicyVersioningService {
    pub fn new(pool: Arc<LumaDbPool>) -> Self {
        Self { pool }
    }

    /// Seeds the initial version if no version is active.
    pub async fn initialize(&self, default_policy: PolicyRules) -> Result<()> {
        if self.get_active_version().await?.is_some() {
            return Ok(());
        }
        self.save_version(default_policy, "initial", "Initial policy version", "system", Some("1.0.0")).await?;
        Ok(())
    }

    async fn save_version(
        &self,
        mut policy: PolicyRules,
        change_type: &str,
        change_summary: &str,
        changed_by: &str,
        explicit_version: Option<&str>,
    ) -> Result<PolicyVersion> {
        policy.validate()?;

        let current = self.get_active_version().await?;
        let previous_version = current.map(|c| c.version);

        let version = match explicit_version {
            Some(v) => v.to_string(),
            None => increment_version(previous_version.as_deref().unwrap_or("1.0.0"), change_type),
        };
        policy.version = version.clone();

        let policy_hash = compute_hash(&policy);
        let policy_json = serde_json::to_value(&policy).map_err(|e| FraudError::Internal(e.to_string()))?;

        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        tx.execute("UPDATE policy_versions SET is_active = FALSE WHERE is_active = TRUE", &[]).await?;

        let row = tx
            .query_one(
                "INSERT INTO policy_versions (
                    version, policy_content, policy_hash, change_type,
                    change_summary, changed_by, is_active, previous_version
                ) VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
                RETURNING id, created_at",
                &[&version, &policy_json, &policy_hash, &change_type, &change_summary, &changed_by, &previous_version],
            )
            .await?;

        tx.commit().await?;

        Ok(PolicyVersion {
            id: row.get(0),
            version,
            policy_content: policy,
            policy_hash,
            change_type: change_type.to_string(),
            change_summary: change_summary.to_string(),
            changed_by: changed_by.to_string(),
            created_at: row.get(1),
            is_active: true,
            previous_version,
        })
    }

    pub async fn get_active_version(&self) -> Result<Option<PolicyVersion>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, version, policy_content, policy_hash, change_type,
                        change_summary, changed_by, created_at, is_active, previous_version
                 FROM policy_versions WHERE is_active = TRUE LIMIT 1",
                &[],
            )
            .await?;
        row.map(row_to_version).transpose()
    }

    pub async fn get_version(&self, version: &str) -> Result<Option<PolicyVersion>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, version, policy_content, policy_hash, change_type,
                        change_summary, changed_by, created_at, is_active, previous_version
                 FROM policy_versions WHERE version = $1",
                &[&version],
            )
            .await?;
        row.map(row_to_version).transpose()
    }

    pub async fn list_versions(&self, limit: i64) -> Result<Vec<PolicyVersion>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, version, policy_content, policy_hash, change_type,
                        change_summary, changed_by, created_at, is_active, previous_version
                 FROM policy_versions ORDER BY created_at DESC LIMIT $1",
                &[&limit],
            )
            .await?;
        rows.into_iter().map(row_to_version).collect()
    }

    pub async fn update_thresholds(&self, update: impl FnOnce(&mut PolicyRules), changed_by: &str) -> Result<PolicyVersion> {
        self.apply_change(update, "threshold", "Updated score thresholds", changed_by).await
    }

    /// Generic mutation entry point for rule CRUD and list add/remove
    /// endpoints (spec §6.3); `change_type` drives the semantic version
    /// bump via `increment_version`.
    pub async fn apply_change(
        &self,
        update: impl FnOnce(&mut PolicyRules),
        change_type: &str,
        change_summary: &str,
        changed_by: &str,
    ) -> Result<PolicyVersion> {
        let current = self.get_active_version().await?.ok_or_else(|| FraudError::PolicyUndefined("no active policy".into()))?;
        let mut policy = current.policy_content;
        update(&mut policy);
        self.save_version(policy, change_type, change_summary, changed_by, None).await
    }

    pub async fn rollback(&self, target_version: &str, changed_by: &str) -> Result<PolicyVersion> {
        let target = self
            .get_version(target_version)
            .await?
            .ok_or_else(|| FraudError::PolicyUndefined(format!("version '{target_version}' not found")))?;
        self.save_version(
            target.policy_content,
            "rollback",
            &format!("Rolled back to version {target_version}"),
            changed_by,
            None,
        )
        .await
    }
}

fn row_to_version(row: tokio_postgres::Row) -> Result<PolicyVersion> {
    let policy_content: serde_json::Value = row.get(2);
    let policy_content: PolicyRules = serde_json::from_value(policy_content).map_err(|e| FraudError::Internal(e.to_string()))?;
    Ok(PolicyVersion {
        id: row.get(0),
        version: row.get(1),
        policy_content,
        policy_hash: row.get(3),
        change_type: row.get(4),
        change_summary: row.get(5),
        changed_by: row.get(6),
        created_at: row.get(7),
        is_active: row.get(8),
        previous_version: row.get(9),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_change_bumps_patch() {
        assert_eq!(increment_version("1.2.3", "threshold"), "1.2.4");
    }

    #[test]
    fn rule_change_bumps_minor_and_resets_patch() {
        assert_eq!(increment_version("1.2.3", "rule_add"), "1.3.0");
    }

    #[test]
    fn rollback_bumps_minor() {
        assert_eq!(increment_version("2.4.9", "rollback"), "2.5.0");
    }

    #[test]
    fn list_change_bumps_patch() {
        assert_eq!(increment_version("1.0.0", "list_add"), "1.0.1");
    }

    #[test]
    fn malformed_version_falls_back() {
        assert_eq!(increment_version("not-a-version", "threshold"), "1.0.1");
    }
}
