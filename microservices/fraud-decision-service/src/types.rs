//! Core data model: payment events, entity profiles, feature snapshots,
//! decisions and evidence records.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FraudError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Authorization,
    Capture,
    Refund,
    Chargeback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Mobile,
    Broadband,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSubtype {
    SimActivation,
    SimSwap,
    DeviceUpgrade,
    Topup,
    InternationalEnable,
    ServiceActivation,
    EquipmentSwap,
    SpeedUpgrade,
    EquipmentPurchase,
}

impl EventSubtype {
    fn valid_for(&self, service_type: ServiceType) -> bool {
        use EventSubtype::*;
        use ServiceType::*;
        match self {
            SimActivation | SimSwap | DeviceUpgrade | Topup | InternationalEnable => {
                service_type == Mobile
            }
            ServiceActivation | EquipmentSwap | SpeedUpgrade | EquipmentPurchase => {
                service_type == Broadband
            }
        }
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(
            self,
            EventSubtype::DeviceUpgrade
                | EventSubtype::SimSwap
                | EventSubtype::InternationalEnable
                | EventSubtype::EquipmentPurchase
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_id: Option<String>,
    pub device_type: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub is_emulator: bool,
    pub is_rooted: bool,
    pub screen_resolution: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
}

impl DeviceInfo {
    /// Number of descriptive fields missing (used by the bot detector's
    /// incomplete-fingerprint signal).
    pub fn missing_field_count(&self) -> usize {
        [
            self.os.is_none(),
            self.browser.is_none(),
            self.screen_resolution.is_none(),
            self.timezone.is_none(),
            self.language.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoInfo {
    pub ip_address: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_vpn: bool,
    pub is_proxy: bool,
    pub is_datacenter: bool,
    pub is_tor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AvsResult {
    Y,
    M,
    X,
    D,
    F,
    N,
}

impl AvsResult {
    fn is_match(&self) -> bool {
        matches!(self, AvsResult::Y | AvsResult::M | AvsResult::X | AvsResult::D | AvsResult::F)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CvvResult {
    M,
    N,
    P,
    U,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationInfo {
    pub avs_result: Option<AvsResult>,
    pub cvv_result: Option<CvvResult>,
    pub three_ds_result: Option<String>,
    pub three_ds_version: Option<String>,
    pub three_ds_eci: Option<String>,
}

impl VerificationInfo {
    pub fn has_3ds(&self) -> bool {
        self.three_ds_result.is_some()
    }

    /// Absent verification counts as a match (spec §4.2 step 5).
    pub fn avs_match(&self) -> bool {
        self.avs_result.map(|r| r.is_match()).unwrap_or(true)
    }

    pub fn cvv_match(&self) -> bool {
        self.cvv_result.map(|r| r == CvvResult::M).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub transaction_id: String,
    pub idempotency_key: String,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,

    pub amount_cents: i64,
    pub currency: String,

    pub card_token: String,
    pub card_bin: Option<String>,
    pub card_last_four: Option<String>,
    pub card_brand: Option<String>,
    pub card_type: Option<String>,
    pub card_country: Option<String>,

    pub service_id: String,
    pub service_name: Option<String>,
    pub service_type: ServiceType,
    pub event_subtype: EventSubtype,
    pub service_region: Option<String>,

    pub subscriber_id: String,
    pub user_id: String,
    pub account_age_days: Option<u32>,
    pub is_guest: bool,
    pub phone_number: Option<String>,
    pub imei: Option<String>,
    pub sim_iccid: Option<String>,
    pub modem_mac: Option<String>,
    pub cpe_serial: Option<String>,
    pub service_address_hash: Option<String>,

    #[serde(default)]
    pub device: DeviceInfo,
    #[serde(default)]
    pub geo: GeoInfo,
    #[serde(default)]
    pub verification: VerificationInfo,

    pub channel: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub session_id: Option<String>,
}

impl PaymentEvent {
    /// Validates the event against the §3.1 invariants. Returns the first
    /// violation found.
    pub fn validate(&self) -> Result<()> {
        if self.amount_cents < 0 {
            return Err(FraudError::Validation("amount_cents must be non-negative".into()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(FraudError::Validation("currency must be three uppercase letters".into()));
        }
        if let Some(bin) = &self.card_bin {
            if !bin.chars().all(|c| c.is_ascii_digit()) {
                return Err(FraudError::Validation("card_bin must be digits only".into()));
            }
        }
        if let Some(lat) = self.geo.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(FraudError::Validation("latitude out of range".into()));
            }
        }
        if let Some(lon) = self.geo.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(FraudError::Validation("longitude out of range".into()));
            }
        }
        if !self.event_subtype.valid_for(self.service_type) {
            return Err(FraudError::Validation(format!(
                "event_subtype {:?} is not valid for service_type {:?}",
                self.event_subtype, self.service_type
            )));
        }
        Ok(())
    }

    pub fn is_high_value(&self) -> bool {
        self.amount_cents >= 100_000
    }

    pub fn has_3ds(&self) -> bool {
        self.verification.has_3ds()
    }

    pub fn is_high_risk_subtype(&self) -> bool {
        self.event_subtype.is_high_risk()
    }

    pub fn amount_usd(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Hour of day in the device's timezone if present and parseable, else
    /// UTC.
    pub fn hour_of_day(&self) -> u32 {
        if let Some(tz) = &self.device.timezone {
            if let Ok(offset_hours) = tz.parse::<i64>() {
                let shifted = self.timestamp + chrono::Duration::hours(offset_hours);
                return shifted.hour();
            }
        }
        self.timestamp.hour()
    }

    pub fn is_weekend(&self) -> bool {
        self.timestamp.weekday().num_days_from_monday() >= 5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Normal,
    Elevated,
    High,
}

impl Default for RiskTier {
    fn default() -> Self {
        RiskTier::Normal
    }
}

/// Common fields shared by every entity profile kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileCommon {
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub total_transactions: u64,
    pub chargeback_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardProfile {
    pub common: ProfileCommon,
    pub last_geo_seen: Option<DateTime<Utc>>,
    pub last_lat: Option<f64>,
    pub last_lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub common: ProfileCommon,
    pub is_emulator: bool,
    pub is_rooted: bool,
    pub last_country: Option<String>,
    pub last_city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpProfile {
    pub common: ProfileCommon,
    pub is_datacenter: bool,
    pub is_vpn: bool,
    pub is_proxy: bool,
    pub is_tor: bool,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub common: ProfileCommon,
    pub account_age_days: u32,
    pub risk_tier: RiskTier,
    pub transactions_30d: u64,
    pub total_amount_cents: i64,
    pub chargeback_count_90d: u64,
    pub refund_count_90d: u64,
    /// Welford running statistics over transaction amount (cents).
    pub amount_count: u64,
    pub amount_mean_cents: f64,
    pub amount_m2_cents: f64,
}

impl UserProfile {
    /// Folds one new observation into the running mean/variance using
    /// Welford's online algorithm.
    pub fn welford_update(&mut self, amount_cents: f64) {
        self.amount_count += 1;
        let delta = amount_cents - self.amount_mean_cents;
        self.amount_mean_cents += delta / self.amount_count as f64;
        let delta2 = amount_cents - self.amount_mean_cents;
        self.amount_m2_cents += delta * delta2;
    }

    pub fn amount_std_cents(&self) -> Option<f64> {
        if self.amount_count >= 2 {
            Some((self.amount_m2_cents / (self.amount_count as f64 - 1.0)).sqrt())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceProfile {
    pub common: ProfileCommon,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Friction,
    Review,
    Block,
}

impl Decision {
    /// Ordinal severity, low to high — used to track "highest severity so
    /// far" while evaluating thresholds (§4.6 step 4).
    pub fn severity(&self) -> u8 {
        match self {
            Decision::Allow => 0,
            Decision::Friction => 1,
            Decision::Review => 2,
            Decision::Block => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionReason {
    pub code: String,
    pub description: String,
    pub severity: Severity,
    pub triggered_by: String,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionType {
    #[serde(rename = "3DS")]
    ThreeDs,
    Otp,
    StepUp,
    Captcha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskScores {
    pub risk: f64,
    pub criminal: f64,
    pub friendly_fraud: f64,
    pub confidence: f64,
    pub card_testing_score: f64,
    pub velocity_score: f64,
    pub geo_score: f64,
    pub bot_score: f64,
    pub friendly_fraud_score: f64,
    pub high_value_score: f64,
    pub ml_score: Option<f64>,
    pub model_version: Option<String>,
    pub model_variant: Option<String>,
}

impl RiskScores {
    /// Rounds every score field to four decimals (§4.5 last line).
    pub fn round(&mut self) {
        let r = |v: f64| (v * 10_000.0).round() / 10_000.0;
        self.risk = r(self.risk);
        self.criminal = r(self.criminal);
        self.friendly_fraud = r(self.friendly_fraud);
        self.confidence = r(self.confidence);
        self.card_testing_score = r(self.card_testing_score);
        self.velocity_score = r(self.velocity_score);
        self.geo_score = r(self.geo_score);
        self.bot_score = r(self.bot_score);
        self.friendly_fraud_score = r(self.friendly_fraud_score);
        self.high_value_score = r(self.high_value_score);
        if let Some(s) = self.ml_score {
            self.ml_score = Some(r(s));
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub transaction_id: String,
    pub idempotency_key: String,
    pub decision: Decision,
    pub reasons: Vec<DecisionReason>,
    pub scores: RiskScores,
    pub friction_type: Option<FrictionType>,
    pub friction_message: Option<String>,
    pub review_priority: Option<ReviewPriority>,
    pub review_notes: Option<String>,
    pub processing_time_ms: u64,
    pub feature_time_ms: u64,
    pub scoring_time_ms: u64,
    pub policy_time_ms: u64,
    pub policy_version: String,
    pub is_cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargebackRequest {
    pub transaction_id: String,
    pub chargeback_id: String,
    pub amount_cents: i64,
    pub reason_code: String,
    pub reason_description: Option<String>,
    pub fraud_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub refund_id: String,
    pub amount_cents: i64,
    pub reason_code: String,
    pub reason_description: Option<String>,
}

#[cfg(test)]
impl PaymentEvent {
    /// Minimal clean-profile event used across detector and pipeline
    /// tests elsewhere in this crate.
    pub fn fixture() -> PaymentEvent {
        PaymentEvent {
            transaction_id: "T1".into(),
            idempotency_key: "K1".into(),
            event_type: EventType::Authorization,
            timestamp: Utc::now(),
            amount_cents: 2500,
            currency: "USD".into(),
            card_token: "C1".into(),
            card_bin: None,
            card_last_four: None,
            card_brand: None,
            card_type: None,
            card_country: None,
            service_id: "svc".into(),
            service_name: None,
            service_type: ServiceType::Mobile,
            event_subtype: EventSubtype::Topup,
            service_region: None,
            subscriber_id: "S1".into(),
            user_id: "U1".into(),
            account_age_days: Some(10),
            is_guest: false,
            phone_number: None,
            imei: None,
            sim_iccid: None,
            modem_mac: None,
            cpe_serial: None,
            service_address_hash: None,
            device: DeviceInfo::default(),
            geo: GeoInfo::default(),
            verification: VerificationInfo::default(),
            channel: None,
            is_recurring: false,
            session_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_event() -> PaymentEvent {
        PaymentEvent {
            transaction_id: "T1".into(),
            idempotency_key: "K1".into(),
            event_type: EventType::Authorization,
            timestamp: Utc::now(),
            amount_cents: 2500,
            currency: "USD".into(),
            card_token: "C1".into(),
            card_bin: Some("411111".into()),
            card_last_four: None,
            card_brand: None,
            card_type: None,
            card_country: None,
            service_id: "mobile_prepaid_001".into(),
            service_name: None,
            service_type: ServiceType::Mobile,
            event_subtype: EventSubtype::Topup,
            service_region: None,
            subscriber_id: "S1".into(),
            user_id: "U1".into(),
            account_age_days: Some(10),
            is_guest: false,
            phone_number: None,
            imei: None,
            sim_iccid: None,
            modem_mac: None,
            cpe_serial: None,
            service_address_hash: None,
            device: DeviceInfo::default(),
            geo: GeoInfo::default(),
            verification: VerificationInfo::default(),
            channel: None,
            is_recurring: false,
            session_id: None,
        }
    }

    #[test]
    fn validates_clean_event() {
        assert!(base_event().validate().is_ok());
    }

    #[test]
    fn rejects_negative_amount() {
        let mut e = base_event();
        e.amount_cents = -1;
        assert!(e.validate().is_err());
    }

    #[test]
    fn rejects_mismatched_subtype() {
        let mut e = base_event();
        e.event_subtype = EventSubtype::ServiceActivation;
        assert!(e.validate().is_err());
    }

    #[test]
    fn high_value_boundary() {
        let mut e = base_event();
        e.amount_cents = 99_999;
        assert!(!e.is_high_value());
        e.amount_cents = 100_000;
        assert!(e.is_high_value());
    }

    #[test]
    fn welford_running_stats() {
        let mut p = UserProfile::default();
        for amount in [1000.0, 2000.0, 1500.0] {
            p.welford_update(amount);
        }
        assert_eq!(p.amount_count, 3);
        assert!((p.amount_mean_cents - 1500.0).abs() < 1e-9);
        assert!(p.amount_std_cents().unwrap() > 0.0);
    }
}
