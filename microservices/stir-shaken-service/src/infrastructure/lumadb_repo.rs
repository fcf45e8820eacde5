//! LumaDB Repository for STIR/SHAKEN
//!
//! Persistence layer using LumaDB for certificates, TN authorizations, and audit logs.

use uuid::Uuid;

/// STIR/SHAKEN LumaDB Repository
pub struct StirShakenRepository {
    // TODO: Add LumaDB client
}

impl StirShakenRepository {
    pub async fn new(_lumadb_url: &str) -> brivas_core::Result<Self> {
        // TODO: Initialize LumaDB connection
        Ok(Self {})
    }

    // Certificate operations

    pub async fn save_certificate(&self, _cert: &CertificateEntity) -> brivas_core::Result<()> {
        // TODO: INSERT INTO brivas_stir_shaken.certificates
        Ok(())
    }

    pub async fn get_certificate(&self, _id: &Uuid) -> brivas_core::Result<Option<CertificateEntity>> {
        // TODO: SELECT FROM brivas_stir_shaken.certificates WHERE id = $1
        Ok(None)
    }

    pub async fn list_certificates(&self) -> brivas_core::Result<Vec<CertificateEntity>> {
        // TODO: SELECT FROM brivas_stir_shaken.certificates
        Ok(vec![])
    }

    pub async fn delete_certificate(&self, _id: &Uuid) -> brivas_core::Result<()> {
        // TODO: DELETE FROM brivas_stir_shaken.certificates WHERE id = $1
        Ok(())
    }

    // TN Authorization operations

    pub async fn save_tn_authorization(&self, _auth: &TnAuthorizationEntity) -> brivas_core::Result<()> {
        // TODO: INSERT INTO brivas_stir_shaken.tn_authorizations
        Ok(())
    }

    pub async fn get_tn_authorization(
        &self,
        _number: &str,
        _customer_id: &Uuid,
    ) -> brivas_core::Result<Option<TnAuthorizationEntity>> {
        // TODO: SELECT FROM brivas_stir_shaken.tn_authorizations
        Ok(None)
    }

    // Audit logging

    pub async fn log_signing_event(&self, _event: &SigningEventEntity) -> brivas_core::Result<()> {
        // TODO: INSERT INTO brivas_stir_shaken.signing_events
        Ok(())
    }

    pub async fn log_verification_event(&self, _event: &VerificationEventEntity) -> brivas_core::Result<()> {
        // TODO: INSERT INTO brivas_stir_shaken.verification_events
        Ok(())
    }
}

// Entity types

pub struct CertificateEntity {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub issuer: String,
    pub spc: String,
    pub serial_number: String,
    pub certificate_pem: String,
    pub private_key_pem_encrypted: Vec<u8>,
    pub certificate_url: String,
    pub public_key_hash: String,
    pub not_before: chrono::DateTime<chrono::Utc>,
    pub not_after: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub is_default: bool,
    pub pop_ids: Vec<String>,
}

pub struct TnAuthorizationEntity {
    pub id: Uuid,
    pub number: String,
    pub customer_id: Uuid,
    pub max_attestation: String,
    pub valid_from: chrono::DateTime<chrono::Utc>,
    pub valid_until: chrono::DateTime<chrono::Utc>,
}

pub struct SigningEventEntity {
    pub id: Uuid,
    pub call_id: String,
    pub orig_tn: String,
    pub dest_tn: String,
    pub attestation: String,
    pub certificate_id: Uuid,
    pub pop_id: String,
    pub signed_at: chrono::DateTime<chrono::Utc>,
}

pub struct VerificationEventEntity {
    pub id: Uuid,
    pub call_id: String,
    pub from_tn: String,
    pub to_tn: String,
    pub status: String,
    pub attestation: Option<String>,
    pub signer_spc: Option<String>,
    pub pop_id: String,
    pub verified_at: chrono::DateTime<chrono::Utc>,
    pub error_detail: Option<String>,
}
