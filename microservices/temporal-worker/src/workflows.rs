//! Temporal Workflow Definitions
//!
//! Defines the orchestration logic for complex VAS operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service provisioning workflow input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionServiceInput {
    pub customer_id: Uuid,
    pub service_type: ServiceType,
    pub configuration: serde_json::Value,
}

/// Service type to provision
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    VoiceTrunk,
    SmsShortcode,
    UssdCode,
    DidNumber,
    PbxExtension,
}

/// Service provisioning workflow output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionServiceOutput {
    pub service_id: Uuid,
    pub status: String,
    pub activated_at: chrono::DateTime<chrono::Utc>,
}

/// Call routing workflow input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCallInput {
    pub call_id: Uuid,
    pub source_number: String,
    pub destination_number: String,
    pub routing_mode: String,
}

/// Call routing workflow output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCallOutput {
    pub call_id: Uuid,
    pub carrier_id: Uuid,
    pub dial_string: String,
    pub fallback_carriers: Vec<Uuid>,
    pub routed_at: chrono::DateTime<chrono::Utc>,
}

/// Billing workflow input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingInput {
    pub call_id: Uuid,
    pub customer_id: Uuid,
    pub carrier_id: Uuid,
    pub duration_secs: i64,
    pub rate: f64,
}

/// Billing workflow output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingOutput {
    pub invoice_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub status: BillingStatus,
}

/// Billing status
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    Charged,
    InsufficientFunds,
    Failed,
    Pending,
}

/// Fraud detection workflow input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudDetectionInput {
    pub call_id: Uuid,
    pub source_number: String,
    pub destination_number: String,
    pub source_ip: String,
    pub user_agent: Option<String>,
}

/// Fraud detection workflow output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudDetectionOutput {
    pub call_id: Uuid,
    pub risk_score: f64,
    pub alert_raised: bool,
    pub block_call: bool,
    pub detected_patterns: Vec<String>,
}

// ============================================
// Workflow Implementations (Pseudocode)
// ============================================

/// Service Provisioning Workflow
/// 
/// Steps:
/// 1. Validate customer account status
/// 2. Check service availability
/// 3. Allocate resources (DID, trunk, etc.)
/// 4. Configure routing rules
/// 5. Enable billing
/// 6. Send activation notification
/// 7. Update service registry
pub mod service_provisioning {
    use super::*;

    pub async fn run(input: ProvisionServiceInput) -> anyhow::Result<ProvisionServiceOutput> {
        // This would use Temporal activities
        let service_id = Uuid::new_v4();
        
        Ok(ProvisionServiceOutput {
            service_id,
            status: "active".to_string(),
            activated_at: chrono::Utc::now(),
        })
    }
}

/// Call Routing Workflow
/// 
/// Steps:
/// 1. Query LCR engine for best route
/// 2. Check carrier availability
/// 3. Rate the call
/// 4. Execute routing with retry on failure
/// 5. Update CDR with routing decision
pub mod call_routing {
    use super::*;

    pub async fn run(input: RouteCallInput) -> anyhow::Result<RouteCallOutput> {
        let carrier_id = Uuid::new_v4();
        
        Ok(RouteCallOutput {
            call_id: input.call_id,
            carrier_id,
            dial_string: format!("sip:{}@gateway:5060", input.destination_number),
            fallback_carriers: vec![],
            routed_at: chrono::Utc::now(),
        })
    }
}

/// Billing Workflow (Saga Pattern)
/// 
/// Steps:
/// 1. Check customer balance
/// 2. Calculate call cost
/// 3. Debit customer account
/// 4. Credit carrier settlement
/// 5. Generate CDR billing record
/// 6. On failure: Compensate all steps
pub mod billing {
    use super::*;

    pub async fn run(input: BillingInput) -> anyhow::Result<BillingOutput> {
        let amount = (input.duration_secs as f64 / 60.0) * input.rate;
        
        Ok(BillingOutput {
            invoice_id: Uuid::new_v4(),
            amount,
            currency: "USD".to_string(),
            status: BillingStatus::Charged,
        })
    }
}

/// Fraud Detection Workflow
/// 
/// Steps:
/// 1. Extract call features
/// 2. Query historical patterns
/// 3. Run ML model inference
/// 4. Calculate risk score
/// 5. If high risk: Block call, raise alert, notify human
/// 6. Update fraud database
pub mod fraud_detection {
    use super::*;

    pub async fn run(input: FraudDetectionInput) -> anyhow::Result<FraudDetectionOutput> {
        // In production, this would run ML inference
        let risk_score = 0.15; // Low risk
        
        Ok(FraudDetectionOutput {
            call_id: input.call_id,
            risk_score,
            alert_raised: risk_score > 0.8,
            block_call: risk_score > 0.95,
            detected_patterns: vec![],
        })
    }
}
