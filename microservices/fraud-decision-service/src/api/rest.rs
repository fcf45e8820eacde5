//! Fraud Decision Service REST API

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::FraudError;
use crate::evidence::EvidenceService;
use crate::features::FeatureStore;
use crate::pipeline::DecisionPipeline;
use crate::policy::versioning::{PolicyVersion, PolicyVersioningService};
use crate::policy::{PolicyEngine, PolicyRule, PolicyRules, ScoreThreshold};
use crate::types::{ChargebackRequest, DecisionResponse, PaymentEvent, RefundRequest};
use crate::velocity::VelocityStore;

type ApiError = (StatusCode, Json<serde_json::Value>);
type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DecisionPipeline>,
    pub policy: Arc<RwLock<PolicyEngine>>,
    pub versioning: Option<Arc<PolicyVersioningService>>,
    pub evidence: Option<Arc<EvidenceService>>,
    pub features: Arc<FeatureStore>,
    pub velocity: Arc<dyn VelocityStore>,
}

pub fn create_router(
    pipeline: Arc<DecisionPipeline>,
    policy: Arc<RwLock<PolicyEngine>>,
    versioning: Option<Arc<PolicyVersioningService>>,
    evidence: Option<Arc<EvidenceService>>,
    features: Arc<FeatureStore>,
    velocity: Arc<dyn VelocityStore>,
) -> Router {
    let state = AppState { pipeline, policy, versioning, evidence, features, velocity };

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/v1/decisions", post(decide))
        .route("/v1/policy/version", get(get_policy_version))
        .route("/v1/policy/reload", post(reload_policy))
        .route("/v1/policy/thresholds", post(update_thresholds))
        .route("/v1/policy/rules", post(mutate_rule))
        .route("/v1/policy/lists", post(mutate_list))
        .route("/v1/policy/rollback", post(rollback_policy))
        .route("/v1/chargebacks", post(record_chargeback))
        .route("/v1/refunds", post(record_refund))
        .with_state(state)
}

fn error_response(err: FraudError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(serde_json::json!({ "error": err.error_code(), "message": err.to_string() }));
    (status, body)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let velocity_up = state.velocity.health_check().await;
    let database_up = match &state.evidence {
        Some(evidence) => evidence.health_check().await,
        None => true,
    };
    let policy_version = state.policy.read().await.version().to_string();
    let status = if velocity_up && database_up { "healthy" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "components": {
            "velocity_store": if velocity_up { "up" } else { "down" },
            "database": if database_up { "up" } else { "down" },
            "policy": "up",
        },
        "policy_version": policy_version,
    }))
}

async fn ready() -> &'static str {
    "OK"
}

// Decision endpoint (spec §6.1)

async fn decide(State(state): State<AppState>, Json(event): Json<PaymentEvent>) -> ApiResult<Json<DecisionResponse>> {
    state.pipeline.decide(event).await.map(Json).map_err(error_response)
}

// Policy endpoints (spec §6.3)

#[derive(Serialize)]
struct PolicyVersionResponse {
    version: String,
    hash: String,
}

impl From<&PolicyVersion> for PolicyVersionResponse {
    fn from(v: &PolicyVersion) -> Self {
        Self { version: v.version.clone(), hash: v.policy_hash.clone() }
    }
}

async fn get_policy_version(State(state): State<AppState>) -> ApiResult<Json<PolicyVersionResponse>> {
    if let Some(versioning) = &state.versioning {
        let version = versioning.get_active_version().await.map_err(error_response)?;
        let version = version.ok_or_else(|| error_response(FraudError::PolicyUndefined("no active policy".into())))?;
        return Ok(Json((&version).into()));
    }
    let engine = state.policy.read().await;
    Ok(Json(PolicyVersionResponse { version: engine.version().to_string(), hash: engine.hash().to_string() }))
}

/// Swaps the live policy engine's content and updates the pipeline's
/// cached active-version id after a versioning mutation.
async fn activate_version(state: &AppState, version: PolicyVersion) -> ApiResult<Json<PolicyVersionResponse>> {
    {
        let mut engine = state.policy.write().await;
        engine.reload(version.policy_content.clone()).map_err(error_response)?;
    }
    state.pipeline.set_active_policy_version_id(Some(version.id)).await;
    Ok(Json((&version).into()))
}

fn require_versioning(state: &AppState) -> ApiResult<&Arc<PolicyVersioningService>> {
    state.versioning.as_ref().ok_or_else(|| error_response(FraudError::DependencyUnavailable("policy versioning not configured".into())))
}

async fn reload_policy(State(state): State<AppState>) -> ApiResult<Json<PolicyVersionResponse>> {
    let versioning = require_versioning(&state)?;
    let version = versioning.get_active_version().await.map_err(error_response)?;
    let version = version.ok_or_else(|| error_response(FraudError::PolicyUndefined("no active policy".into())))?;
    activate_version(&state, version).await
}

#[derive(Deserialize)]
struct ThresholdMutationRequest {
    score_type: String,
    threshold: ScoreThreshold,
    changed_by: String,
}

async fn update_thresholds(State(state): State<AppState>, Json(req): Json<ThresholdMutationRequest>) -> ApiResult<Json<PolicyVersionResponse>> {
    let versioning = require_versioning(&state)?;
    let score_type = req.score_type.clone();
    let threshold = req.threshold;
    let version = versioning
        .update_thresholds(move |policy| { policy.thresholds.insert(score_type, threshold); }, &req.changed_by)
        .await
        .map_err(error_response)?;
    activate_version(&state, version).await
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RuleMutationRequest {
    Add { rule: PolicyRule, changed_by: String },
    Update { rule: PolicyRule, changed_by: String },
    Delete { rule_id: String, changed_by: String },
}

async fn mutate_rule(State(state): State<AppState>, Json(req): Json<RuleMutationRequest>) -> ApiResult<Json<PolicyVersionResponse>> {
    let versioning = require_versioning(&state)?;
    let (change_type, summary, changed_by, update): (&str, String, String, Box<dyn FnOnce(&mut PolicyRules) + Send>) = match req {
        RuleMutationRequest::Add { rule, changed_by } => {
            let summary = format!("Added rule {}", rule.id);
            (
                "rule_add",
                summary,
                changed_by,
                Box::new(move |policy: &mut PolicyRules| {
                    policy.rules.retain(|r| r.id != rule.id);
                    policy.rules.push(rule);
                }),
            )
        }
        RuleMutationRequest::Update { rule, changed_by } => {
            let summary = format!("Updated rule {}", rule.id);
            (
                "rule_update",
                summary,
                changed_by,
                Box::new(move |policy: &mut PolicyRules| {
                    policy.rules.retain(|r| r.id != rule.id);
                    policy.rules.push(rule);
                }),
            )
        }
        RuleMutationRequest::Delete { rule_id, changed_by } => {
            let summary = format!("Deleted rule {rule_id}");
            (
                "rule_delete",
                summary,
                changed_by,
                Box::new(move |policy: &mut PolicyRules| {
                    policy.rules.retain(|r| r.id != rule_id);
                }),
            )
        }
    };

    let version = versioning.apply_change(update, change_type, &summary, &changed_by).await.map_err(error_response)?;
    activate_version(&state, version).await
}

fn policy_list<'a>(policy: &'a mut PolicyRules, list: &str) -> Option<&'a mut HashSet<String>> {
    match list {
        "blocklist_cards" => Some(&mut policy.blocklist_cards),
        "blocklist_devices" => Some(&mut policy.blocklist_devices),
        "blocklist_ips" => Some(&mut policy.blocklist_ips),
        "blocklist_users" => Some(&mut policy.blocklist_users),
        "allowlist_cards" => Some(&mut policy.allowlist_cards),
        "allowlist_users" => Some(&mut policy.allowlist_users),
        "allowlist_services" => Some(&mut policy.allowlist_services),
        _ => None,
    }
}

#[derive(Deserialize)]
struct ListMutationRequest {
    list: String,
    action: String,
    value: String,
    changed_by: String,
}

async fn mutate_list(State(state): State<AppState>, Json(req): Json<ListMutationRequest>) -> ApiResult<Json<PolicyVersionResponse>> {
    let versioning = require_versioning(&state)?;
    if policy_list(&mut PolicyRules::default(), &req.list).is_none() {
        return Err(error_response(FraudError::Validation(format!("unknown list '{}'", req.list))));
    }

    let change_type = if req.action == "remove" { "list_remove" } else { "list_add" };
    let summary = format!("{} '{}' {} {}", change_type, req.value, if req.action == "remove" { "from" } else { "to" }, req.list);
    let list_name = req.list.clone();
    let value = req.value.clone();
    let remove = req.action == "remove";

    let version = versioning
        .apply_change(
            move |policy: &mut PolicyRules| {
                if let Some(set) = policy_list(policy, &list_name) {
                    if remove {
                        set.remove(&value);
                    } else {
                        set.insert(value);
                    }
                }
            },
            change_type,
            &summary,
            &req.changed_by,
        )
        .await
        .map_err(error_response)?;
    activate_version(&state, version).await
}

#[derive(Deserialize)]
struct RollbackRequest {
    target_version: String,
    changed_by: String,
}

async fn rollback_policy(State(state): State<AppState>, Json(req): Json<RollbackRequest>) -> ApiResult<Json<PolicyVersionResponse>> {
    let versioning = require_versioning(&state)?;
    let version = versioning.rollback(&req.target_version, &req.changed_by).await.map_err(error_response)?;
    activate_version(&state, version).await
}

// Chargeback / refund ingestion (spec §6.4)

async fn record_chargeback(State(state): State<AppState>, Json(req): Json<ChargebackRequest>) -> ApiResult<Json<serde_json::Value>> {
    let evidence = state
        .evidence
        .as_ref()
        .ok_or_else(|| error_response(FraudError::DependencyUnavailable("evidence service not configured".into())))?;

    let record_id = evidence
        .record_chargeback(
            &req.transaction_id,
            &req.chargeback_id,
            req.amount_cents,
            &req.reason_code,
            req.reason_description.as_deref(),
            req.fraud_type.as_deref(),
        )
        .await
        .map_err(error_response)?;

    if let Some(record) = evidence.get_evidence(&req.transaction_id).await.map_err(error_response)? {
        if let Err(e) = state.features.record_chargeback_impact(&record.card_token, &record.user_id).await {
            warn!(error = %e, transaction_id = %req.transaction_id, "chargeback profile impact update failed");
        }
    }

    Ok(Json(serde_json::json!({ "id": record_id, "status": "RECEIVED" })))
}

async fn record_refund(State(state): State<AppState>, Json(req): Json<RefundRequest>) -> ApiResult<Json<serde_json::Value>> {
    let evidence = state
        .evidence
        .as_ref()
        .ok_or_else(|| error_response(FraudError::DependencyUnavailable("evidence service not configured".into())))?;

    let record_id = evidence
        .record_refund(&req.transaction_id, &req.refund_id, req.amount_cents, Some(&req.reason_code), req.reason_description.as_deref())
        .await
        .map_err(error_response)?;

    if let Some(record) = evidence.get_evidence(&req.transaction_id).await.map_err(error_response)? {
        if let Err(e) = state.features.record_refund_impact(&record.user_id).await {
            warn!(error = %e, transaction_id = %req.transaction_id, "refund profile impact update failed");
        }
    }

    Ok(Json(serde_json::json!({ "id": record_id, "status": "RECEIVED" })))
}

