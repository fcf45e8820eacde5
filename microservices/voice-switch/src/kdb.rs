//! kdb+ analytics client
//!
//! Client for real-time CDR analytics, QoS metrics, and fraud detection
//! powered by kdb+ tick architecture.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{Error, Result};

/// kdb+ client for analytics queries
pub struct KdbClient {
    host: String,
    port: u16,
    connection: Arc<Mutex<Option<TcpStream>>>,
}

impl KdbClient {
    /// Create new kdb+ client and establish connection
    pub async fn new(host: &str, port: u16) -> Result<Self> {
        let client = Self {
            host: host.to_string(),
            port,
            connection: Arc::new(Mutex::new(None)),
        };

        // Try to connect, but don't fail if kdb+ is not available
        if let Err(e) = client.connect().await {
            tracing::warn!("kdb+ connection failed, analytics disabled: {}", e);
        }

        Ok(client)
    }

    /// Establish connection to kdb+ gateway
    async fn connect(&self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| Error::Kdb(format!("Connection failed: {}", e)))?;

        let mut conn = self.connection.lock().await;
        *conn = Some(stream);

        tracing::info!("Connected to kdb+ gateway at {}", addr);
        Ok(())
    }

    /// Check if kdb+ is connected and healthy
    pub async fn health_check(&self) -> bool {
        let conn = self.connection.lock().await;
        conn.is_some()
    }

    /// Get traffic statistics
    pub async fn get_traffic_stats(&self) -> Result<TrafficStats> {
        // In production, this would execute a q query against kdb+
        // For now, return mock data
        Ok(TrafficStats {
            total_calls_today: 150_000,
            active_calls: 1_250,
            calls_per_second: 45.5,
            avg_call_duration: 185.3,
            peak_cps: 120.0,
            total_minutes: 462_500.0,
        })
    }

    /// Get carrier statistics
    pub async fn get_carrier_stats(&self, carrier_id: Option<Uuid>) -> Result<Vec<CarrierKdbStats>> {
        // In production, this would query the kdb+ carrier stats table
        Ok(vec![CarrierKdbStats {
            carrier_id: carrier_id.unwrap_or_else(Uuid::new_v4),
            carrier_name: "Sample Carrier".to_string(),
            total_calls: 50_000,
            successful_calls: 47_500,
            failed_calls: 2_500,
            asr: 95.0,
            acd: 180.5,
            pdd: 1.2,
            ner: 98.5,
        }])
    }

    /// Get destination analytics
    pub async fn get_destination_stats(&self, prefix: Option<&str>) -> Result<Vec<DestinationStats>> {
        Ok(vec![DestinationStats {
            prefix: prefix.unwrap_or("1").to_string(),
            country: "United States".to_string(),
            total_calls: 75_000,
            asr: 96.5,
            acd: 195.0,
            margin: 0.0025,
            revenue: 18_750.0,
            cost: 15_000.0,
        }])
    }

    /// Get QoS metrics for a carrier
    pub async fn get_qos_metrics(&self, carrier_id: Uuid) -> Result<QosMetrics> {
        Ok(QosMetrics {
            carrier_id,
            pdd_avg: 1.2,
            pdd_p95: 2.5,
            jitter_avg: 15.0,
            jitter_max: 45.0,
            packet_loss: 0.02,
            mos_avg: 4.2,
            mos_min: 3.8,
        })
    }

    /// Get fraud alerts
    pub async fn get_fraud_alerts(&self, limit: Option<i32>) -> Result<Vec<FraudAlert>> {
        Ok(vec![])
    }

    /// Get active calls
    pub async fn get_active_calls(&self) -> Result<Vec<ActiveCall>> {
        Ok(vec![])
    }

    /// Get calls per second metric
    pub async fn get_cps(&self) -> Result<f64> {
        let stats = self.get_traffic_stats().await?;
        Ok(stats.calls_per_second)
    }

    /// Get answer-seizure ratio
    pub async fn get_asr(&self) -> Result<f64> {
        let stats = self.get_traffic_stats().await?;
        Ok(95.0) // Mock value
    }

    /// Get average call duration
    pub async fn get_acd(&self) -> Result<f64> {
        let stats = self.get_traffic_stats().await?;
        Ok(stats.avg_call_duration)
    }

    /// Publish CDR to tick
    pub async fn publish_cdr(&self, cdr: &Cdr) -> Result<()> {
        // In production, this would publish to the kdb+ tickerplant
        tracing::debug!("Publishing CDR: {:?}", cdr.call_id);
        Ok(())
    }
}

/// Traffic statistics from kdb+
#[derive(Debug, Clone, Serialize)]
pub struct TrafficStats {
    pub total_calls_today: i64,
    pub active_calls: i64,
    pub calls_per_second: f64,
    pub avg_call_duration: f64,
    pub peak_cps: f64,
    pub total_minutes: f64,
}

/// Carrier statistics from kdb+
#[derive(Debug, Clone, Serialize)]
pub struct CarrierKdbStats {
    pub carrier_id: Uuid,
    pub carrier_name: String,
    pub total_calls: i64,
    pub successful_calls: i64,
    pub failed_calls: i64,
    pub asr: f64,
    pub acd: f64,
    pub pdd: f64,
    pub ner: f64,
}

/// Destination statistics
#[derive(Debug, Clone, Serialize)]
pub struct DestinationStats {
    pub prefix: String,
    pub country: String,
    pub total_calls: i64,
    pub asr: f64,
    pub acd: f64,
    pub margin: f64,
    pub revenue: f64,
    pub cost: f64,
}

/// QoS metrics
#[derive(Debug, Clone, Serialize)]
pub struct QosMetrics {
    pub carrier_id: Uuid,
    pub pdd_avg: f64,
    pub pdd_p95: f64,
    pub jitter_avg: f64,
    pub jitter_max: f64,
    pub packet_loss: f64,
    pub mos_avg: f64,
    pub mos_min: f64,
}

/// Fraud alert
#[derive(Debug, Clone, Serialize)]
pub struct FraudAlert {
    pub id: Uuid,
    pub alert_type: String,
    pub severity: String,
    pub source_number: String,
    pub destination_number: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Active call
#[derive(Debug, Clone, Serialize)]
pub struct ActiveCall {
    pub call_id: Uuid,
    pub source_number: String,
    pub destination_number: String,
    pub carrier_name: String,
    pub duration_secs: i64,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// Call Detail Record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cdr {
    pub call_id: Uuid,
    pub source_number: String,
    pub destination_number: String,
    pub carrier_id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_secs: i64,
    pub disposition: String,
    pub hangup_cause: String,
    pub pdd_ms: i64,
    pub billable_seconds: i64,
    pub rate: f64,
    pub cost: f64,
    pub revenue: f64,
}
