//! Fraud Decision Service
//!
//! Real-time payment-fraud decisioning for telecommunications
//! transactions: mobile top-ups, SIM activations, device upgrades,
//! broadband activations and equipment purchases. Computes velocity and
//! entity-profile features, scores them with a rule-based detector
//! roster blended with an optional ML model, and evaluates the result
//! against a versioned policy to produce ALLOW/FRICTION/REVIEW/BLOCK
//! decisions within a soft end-to-end latency budget.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use brivas_core::{BrivasService, HealthStatus, MicroserviceRuntime, ReadinessStatus, Result};
use brivas_lumadb::{LumaDbPool, PoolConfig};
use tokio::sync::RwLock;
use tracing::info;

mod api;
mod config;
mod detectors;
mod error;
mod evidence;
mod features;
mod ml;
mod pipeline;
mod policy;
mod scoring;
#[cfg(test)]
mod tests;
mod types;
mod velocity;

use config::FraudConfig;
use evidence::EvidenceService;
use features::profile::RedisProfileStore;
use features::FeatureStore;
use ml::{MlScorer, ModelRegistry};
use pipeline::DecisionPipeline;
use policy::versioning::PolicyVersioningService;
use policy::{PolicyEngine, PolicyRules};
use scoring::RiskScorer;
use velocity::{RedisVelocityStore, VelocityStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_decision_service=debug".parse().expect("valid tracing directive")),
        )
        .json()
        .init();

    info!("Starting Fraud Decision Service");

    let service = Arc::new(FraudDecisionService::new().await?);
    MicroserviceRuntime::run(service).await
}

pub struct FraudDecisionService {
    config: FraudConfig,
    pipeline: Arc<DecisionPipeline>,
    policy: Arc<RwLock<PolicyEngine>>,
    versioning: Arc<PolicyVersioningService>,
    evidence: Arc<EvidenceService>,
    features: Arc<FeatureStore>,
    velocity: Arc<dyn VelocityStore>,
    start_time: Instant,
}

impl FraudDecisionService {
    pub async fn new() -> Result<Self> {
        let config = FraudConfig::from_env().map_err(brivas_core::BrivasError::from)?;

        let velocity: Arc<dyn VelocityStore> = Arc::new(
            RedisVelocityStore::connect(&config.redis_url, &config.redis_key_prefix)
                .await
                .map_err(brivas_core::BrivasError::from)?,
        );
        let profiles = Arc::new(
            RedisProfileStore::connect(&config.redis_url, &config.redis_key_prefix)
                .await
                .map_err(brivas_core::BrivasError::from)?,
        );
        let features = Arc::new(FeatureStore::new(velocity.clone(), profiles));

        let ml_scorer = if config.ml.enabled {
            Some(MlScorer::new(ModelRegistry::load(&config.ml.registry_path), config.ml.challenger_percent, config.ml.holdout_percent))
        } else {
            None
        };
        let scorer = Arc::new(RiskScorer::new(detectors::DetectionEngine::new(), ml_scorer, config.ml.weight));

        let pool_config = PoolConfig { url: config.lumadb_url.clone(), max_size: 32, min_idle: Some(4) };
        let pool = Arc::new(LumaDbPool::new(pool_config).await.map_err(|e| brivas_core::BrivasError::Database(e.to_string()))?);

        let versioning = Arc::new(PolicyVersioningService::new(pool.clone()));
        versioning.initialize(PolicyRules::default()).await.map_err(brivas_core::BrivasError::from)?;
        let active_version = versioning
            .get_active_version()
            .await
            .map_err(brivas_core::BrivasError::from)?
            .ok_or_else(|| brivas_core::BrivasError::Internal("no active policy after initialization".into()))?;

        let policy_engine = PolicyEngine::new(active_version.policy_content.clone()).map_err(brivas_core::BrivasError::from)?;
        let policy = Arc::new(RwLock::new(policy_engine));

        let evidence = Arc::new(EvidenceService::new(pool.clone(), config.evidence.clone()));

        let pipeline = Arc::new(DecisionPipeline::new(
            features.clone(),
            scorer,
            policy.clone(),
            Some(versioning.clone()),
            Some(evidence.clone()),
            config.latency.clone(),
            config.safe_mode.clone(),
        ));
        pipeline.set_active_policy_version_id(Some(active_version.id)).await;

        Ok(Self {
            config,
            pipeline,
            policy,
            versioning,
            evidence,
            features,
            velocity,
            start_time: Instant::now(),
        })
    }
}

#[async_trait::async_trait]
impl BrivasService for FraudDecisionService {
    fn service_id(&self) -> &'static str {
        "fraud-decision-service"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        let velocity_ok = self.velocity.health_check().await;
        let database_ok = self.evidence.health_check().await;
        ReadinessStatus {
            ready: velocity_ok && database_ok,
            dependencies: vec![
                brivas_core::DependencyStatus { name: "velocity_store".to_string(), available: velocity_ok, latency_ms: None },
                brivas_core::DependencyStatus { name: "lumadb".to_string(), available: database_ok, latency_ms: None },
            ],
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Fraud Decision Service");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(http = %self.config.http_bind, "Starting Fraud Decision Service HTTP server");

        let router = api::rest::create_router(
            self.pipeline.clone(),
            self.policy.clone(),
            Some(self.versioning.clone()),
            Some(self.evidence.clone()),
            self.features.clone(),
            self.velocity.clone(),
        );

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
