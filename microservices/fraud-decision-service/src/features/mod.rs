//! Feature Store (component B): composes velocity counters, entity
//! profiles, and event fields into a `FeatureSet`, and updates profiles
//! after a decision has been made.

pub mod profile;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{PaymentEvent, RiskTier, UserProfile};
use crate::velocity::{windows, EntityType, VelocityStore};
use profile::{touch, ProfileStore};

const UNKNOWN_DEVICE: &str = "__no_device__";
const UNKNOWN_IP: &str = "__no_ip__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VelocityFeatures {
    pub card_attempts_10m: u64,
    pub card_attempts_1h: u64,
    pub card_attempts_24h: u64,
    pub card_declines_10m: u64,
    pub card_declines_1h: u64,
    pub card_decline_rate_10m: f64,
    pub card_decline_rate_1h: f64,
    pub card_distinct_devices_24h: u64,
    pub card_distinct_devices_30d: u64,
    pub card_distinct_ips_24h: u64,
    pub card_distinct_users_30d: u64,
    pub card_distinct_merchants_24h: u64,

    pub device_distinct_cards_1h: u64,
    pub device_distinct_cards_24h: u64,

    pub ip_distinct_cards_1h: u64,

    pub user_transactions_24h: u64,
    pub user_amount_24h_cents: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityFeatures {
    pub card_age_hours: f64,
    pub device_age_hours: f64,
    pub user_account_age_days: u32,
    pub user_chargeback_count_lifetime: u64,
    pub user_chargeback_rate_90d: f64,
    pub user_refund_count_90d: u64,
    pub card_chargeback_count: u64,
    pub device_chargeback_count: u64,
    pub card_user_match: bool,
    pub device_user_match: bool,
    pub user_risk_tier: RiskTier,
    pub card_last_lat: Option<f64>,
    pub card_last_lon: Option<f64>,
    pub card_last_geo_seen: Option<chrono::DateTime<Utc>>,
    pub device_is_emulator: bool,
    pub device_is_rooted: bool,
    pub ip_is_datacenter: bool,
    pub ip_is_vpn: bool,
    pub ip_is_proxy: bool,
    pub ip_is_tor: bool,
    pub ip_risk_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    pub velocity: VelocityFeatures,
    pub entity: EntityFeatures,

    pub amount_cents: i64,
    pub amount_usd: f64,
    pub amount_zscore: f64,
    pub hour_of_day: u32,
    pub is_weekend: bool,
    pub is_new_card_for_user: bool,
    pub is_new_device_for_user: bool,
    pub avs_match: bool,
    pub cvv_match: bool,
    pub is_high_value: bool,
    pub is_recurring: bool,
    pub has_3ds: bool,
    pub is_guest: bool,
    pub account_age_days: u32,

    pub device_is_emulator_event: bool,
    pub ip_is_tor_event: bool,
    pub ip_is_vpn_event: bool,
    pub ip_is_proxy_event: bool,
    pub ip_is_datacenter_event: bool,
    pub ip_country: Option<String>,
    pub card_country: Option<String>,
    pub ip_latitude: Option<f64>,
    pub ip_longitude: Option<f64>,
    pub device_user_agent_os: Option<String>,
    pub device_user_agent_browser: Option<String>,
    pub device_type: Option<String>,
    pub device_missing_fields: usize,
    pub device_id_present: bool,
}

pub struct FeatureStore {
    velocity: Arc<dyn VelocityStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl FeatureStore {
    pub fn new(velocity: Arc<dyn VelocityStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { velocity, profiles }
    }

    /// Composes a `FeatureSet` for an incoming event. Individual lookup
    /// failures degrade that subfield to zero; the call itself never fails.
    pub async fn compute_features(&self, event: &PaymentEvent) -> FeatureSet {
        let device_id = event.device.device_id.as_deref().unwrap_or(UNKNOWN_DEVICE);
        let ip_address = event.geo.ip_address.as_deref().unwrap_or(UNKNOWN_IP);

        let (velocity, user_profile, card_profile, device_profile, ip_profile, card_user_match, device_user_match) = tokio::join!(
            self.compute_velocity(&event.card_token, device_id, ip_address, &event.user_id),
            self.safe_user(&event.user_id),
            self.safe_card(&event.card_token),
            self.safe_device(device_id),
            self.safe_ip(ip_address),
            self.velocity_has_distinct(EntityType::User, &event.user_id, "distinct_cards", &event.card_token, windows::THIRTY_DAYS),
            self.velocity_has_distinct(EntityType::User, &event.user_id, "distinct_devices", device_id, windows::THIRTY_DAYS),
        );

        let now = Utc::now();
        let card_age_hours = card_profile
            .common
            .first_seen
            .map(|seen| (now - seen).num_seconds() as f64 / 3600.0)
            .unwrap_or(0.0);
        let device_age_hours = device_profile
            .common
            .first_seen
            .map(|seen| (now - seen).num_seconds() as f64 / 3600.0)
            .unwrap_or(0.0);

        let entity = EntityFeatures {
            card_age_hours,
            device_age_hours,
            user_account_age_days: user_profile.account_age_days,
            user_chargeback_count_lifetime: user_profile.common.chargeback_count,
            user_chargeback_rate_90d: estimate_chargeback_rate_90d(&user_profile, velocity.user_transactions_24h),
            user_refund_count_90d: user_profile.refund_count_90d,
            card_chargeback_count: card_profile.common.chargeback_count,
            device_chargeback_count: device_profile.common.chargeback_count,
            card_user_match,
            device_user_match,
            user_risk_tier: user_profile.risk_tier,
            card_last_lat: card_profile.last_lat,
            card_last_lon: card_profile.last_lon,
            card_last_geo_seen: card_profile.last_geo_seen,
            device_is_emulator: device_profile.is_emulator,
            device_is_rooted: device_profile.is_rooted,
            ip_is_datacenter: ip_profile.is_datacenter,
            ip_is_vpn: ip_profile.is_vpn,
            ip_is_proxy: ip_profile.is_proxy,
            ip_is_tor: ip_profile.is_tor,
            ip_risk_score: derive_ip_risk_score(ip_profile.is_datacenter, ip_profile.is_vpn, ip_profile.is_tor, ip_profile.is_proxy),
        };

        let amount_zscore = compute_amount_zscore(&user_profile, velocity.user_amount_24h_cents, velocity.user_transactions_24h, event.amount_cents);

        FeatureSet {
            velocity,
            entity,
            amount_cents: event.amount_cents,
            amount_usd: event.amount_usd(),
            amount_zscore,
            hour_of_day: event.hour_of_day(),
            is_weekend: event.is_weekend(),
            is_new_card_for_user: !card_user_match,
            is_new_device_for_user: !device_user_match,
            avs_match: event.verification.avs_match(),
            cvv_match: event.verification.cvv_match(),
            is_high_value: event.is_high_value(),
            is_recurring: event.is_recurring,
            has_3ds: event.has_3ds(),
            is_guest: event.is_guest,
            account_age_days: event.account_age_days.unwrap_or(user_profile.account_age_days),
            device_is_emulator_event: event.device.is_emulator,
            ip_is_tor_event: event.geo.is_tor,
            ip_is_vpn_event: event.geo.is_vpn,
            ip_is_proxy_event: event.geo.is_proxy,
            ip_is_datacenter_event: event.geo.is_datacenter,
            ip_country: event.geo.country.clone(),
            card_country: event.card_country.clone(),
            ip_latitude: event.geo.latitude,
            ip_longitude: event.geo.longitude,
            device_user_agent_os: event.device.os.clone(),
            device_user_agent_browser: event.device.browser.clone(),
            device_type: event.device.device_type.clone(),
            device_missing_fields: event.device.missing_field_count(),
            device_id_present: event.device.device_id.is_some(),
        }
    }

    async fn compute_velocity(
        &self,
        card_token: &str,
        device_id: &str,
        ip_address: &str,
        user_id: &str,
    ) -> VelocityFeatures {
        let (card, device, ip, user) = tokio::join!(
            self.card_velocity(card_token),
            self.device_velocity(device_id),
            self.ip_velocity(ip_address),
            self.user_velocity(user_id),
        );
        VelocityFeatures {
            card_attempts_10m: card.0,
            card_attempts_1h: card.1,
            card_attempts_24h: card.2,
            card_declines_10m: card.3,
            card_declines_1h: card.4,
            card_decline_rate_10m: decline_rate(card.3, card.0),
            card_decline_rate_1h: decline_rate(card.4, card.1),
            card_distinct_devices_24h: card.5,
            card_distinct_devices_30d: card.6,
            card_distinct_ips_24h: card.7,
            card_distinct_users_30d: card.8,
            card_distinct_merchants_24h: card.9,
            device_distinct_cards_1h: device.0,
            device_distinct_cards_24h: device.1,
            ip_distinct_cards_1h: ip,
            user_transactions_24h: user.0,
            user_amount_24h_cents: user.1,
        }
    }

    #[allow(clippy::type_complexity)]
    async fn card_velocity(&self, card_token: &str) -> (u64, u64, u64, u64, u64, u64, u64, u64, u64, u64) {
        let v = &self.velocity;
        let (a10, a1h, a24h, d10, d1h, devices24, devices30, ips24, users30, merchants24) = tokio::join!(
            guard(v.count(EntityType::Card, card_token, "attempts", windows::TEN_MIN)),
            guard(v.count(EntityType::Card, card_token, "attempts", windows::ONE_HOUR)),
            guard(v.count(EntityType::Card, card_token, "attempts", windows::ONE_DAY)),
            guard(v.count(EntityType::Card, card_token, "declines", windows::TEN_MIN)),
            guard(v.count(EntityType::Card, card_token, "declines", windows::ONE_HOUR)),
            guard(v.count_distinct(EntityType::Card, card_token, "distinct_devices", windows::ONE_DAY)),
            guard(v.count_distinct(EntityType::Card, card_token, "distinct_devices", windows::THIRTY_DAYS)),
            guard(v.count_distinct(EntityType::Card, card_token, "distinct_ips", windows::ONE_DAY)),
            guard(v.count_distinct(EntityType::Card, card_token, "distinct_users", windows::THIRTY_DAYS)),
            guard(v.count_distinct(EntityType::Card, card_token, "distinct_merchants", windows::ONE_DAY)),
        );
        (a10, a1h, a24h, d10, d1h, devices24, devices30, ips24, users30, merchants24)
    }

    async fn device_velocity(&self, device_id: &str) -> (u64, u64) {
        let v = &self.velocity;
        let (cards1h, cards24h) = tokio::join!(
            guard(v.count_distinct(EntityType::Device, device_id, "distinct_cards", windows::ONE_HOUR)),
            guard(v.count_distinct(EntityType::Device, device_id, "distinct_cards", windows::ONE_DAY)),
        );
        (cards1h, cards24h)
    }

    async fn ip_velocity(&self, ip_address: &str) -> u64 {
        guard(self.velocity.count_distinct(EntityType::Ip, ip_address, "distinct_cards", windows::ONE_HOUR)).await
    }

    async fn user_velocity(&self, user_id: &str) -> (u64, i64) {
        let transactions = guard(self.velocity.count(EntityType::User, user_id, "transactions", windows::ONE_DAY)).await;
        let amount = self.velocity.get_amount(EntityType::User, user_id, "amount_24h_cents").await.unwrap_or(0);
        (transactions, amount)
    }

    async fn velocity_has_distinct(&self, entity_type: EntityType, entity_id: &str, metric: &str, value: &str, window_s: u64) -> bool {
        self.velocity.has_distinct(entity_type, entity_id, metric, value, window_s).await.unwrap_or(false)
    }

    async fn safe_user(&self, user_id: &str) -> UserProfile {
        self.profiles.get_user(user_id).await.unwrap_or_default()
    }
    async fn safe_card(&self, card_token: &str) -> crate::types::CardProfile {
        self.profiles.get_card(card_token).await.unwrap_or_default()
    }
    async fn safe_device(&self, device_id: &str) -> crate::types::DeviceProfile {
        self.profiles.get_device(device_id).await.unwrap_or_default()
    }
    async fn safe_ip(&self, ip_address: &str) -> crate::types::IpProfile {
        self.profiles.get_ip(ip_address).await.unwrap_or_default()
    }

    /// Updates velocity counters and entity profiles after a decision has
    /// been emitted. Runs fire-and-forget from the pipeline's perspective;
    /// any individual failure here is logged and counted, never
    /// propagated.
    pub async fn update_entity_profiles(&self, event: &PaymentEvent, is_decline: bool) -> Result<()> {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let device_id = event.device.device_id.as_deref().unwrap_or(UNKNOWN_DEVICE);
        let ip_address = event.geo.ip_address.as_deref().unwrap_or(UNKNOWN_IP);

        let v = &self.velocity;
        let _ = tokio::join!(
            v.increment(EntityType::Card, &event.card_token, "attempts", &event.transaction_id, now_ms, windows::ONE_DAY),
            v.add_distinct(EntityType::Card, &event.card_token, "distinct_devices", device_id, now_ms, windows::THIRTY_DAYS),
            v.add_distinct(EntityType::Card, &event.card_token, "distinct_ips", ip_address, now_ms, windows::ONE_DAY),
            v.add_distinct(EntityType::Card, &event.card_token, "distinct_users", &event.user_id, now_ms, windows::THIRTY_DAYS),
            v.add_distinct(EntityType::Card, &event.card_token, "distinct_merchants", &event.service_id, now_ms, windows::ONE_DAY),
            v.add_distinct(EntityType::Device, device_id, "distinct_cards", &event.card_token, now_ms, windows::ONE_DAY),
            v.add_distinct(EntityType::Ip, ip_address, "distinct_cards", &event.card_token, now_ms, windows::ONE_HOUR),
            v.increment(EntityType::User, &event.user_id, "transactions", &event.transaction_id, now_ms, windows::THIRTY_DAYS),
            v.add_distinct(EntityType::User, &event.user_id, "distinct_cards", &event.card_token, now_ms, windows::THIRTY_DAYS),
            v.add_distinct(EntityType::User, &event.user_id, "distinct_devices", device_id, now_ms, windows::THIRTY_DAYS),
        );
        let _ = v
            .increment_amount(EntityType::User, &event.user_id, "amount_24h_cents", event.amount_cents, windows::ONE_DAY)
            .await;
        if is_decline {
            let _ = v.increment(EntityType::Card, &event.card_token, "declines", &event.transaction_id, now_ms, windows::ONE_HOUR).await;
        }

        let mut card_profile = self.profiles.get_card(&event.card_token).await.unwrap_or_default();
        touch(&mut card_profile.common);
        if let (Some(lat), Some(lon)) = (event.geo.latitude, event.geo.longitude) {
            card_profile.last_lat = Some(lat);
            card_profile.last_lon = Some(lon);
            card_profile.last_geo_seen = Some(now);
        }
        self.profiles.put_card(&event.card_token, &card_profile).await?;

        if event.device.device_id.is_some() {
            let mut device_profile = self.profiles.get_device(device_id).await.unwrap_or_default();
            touch(&mut device_profile.common);
            device_profile.is_emulator = device_profile.is_emulator || event.device.is_emulator;
            device_profile.is_rooted = device_profile.is_rooted || event.device.is_rooted;
            device_profile.last_country = event.geo.country.clone();
            device_profile.last_city = event.geo.city.clone();
            self.profiles.put_device(device_id, &device_profile).await?;
        }

        if event.geo.ip_address.is_some() {
            let mut ip_profile = self.profiles.get_ip(ip_address).await.unwrap_or_default();
            touch(&mut ip_profile.common);
            ip_profile.is_datacenter = event.geo.is_datacenter;
            ip_profile.is_vpn = event.geo.is_vpn;
            ip_profile.is_proxy = event.geo.is_proxy;
            ip_profile.is_tor = event.geo.is_tor;
            ip_profile.country = event.geo.country.clone();
            ip_profile.region = event.geo.region.clone();
            ip_profile.city = event.geo.city.clone();
            self.profiles.put_ip(ip_address, &ip_profile).await?;
        }

        let mut user_profile = self.profiles.get_user(&event.user_id).await.unwrap_or_default();
        touch(&mut user_profile.common);
        user_profile.transactions_30d += 1;
        user_profile.total_amount_cents += event.amount_cents;
        if let Some(age) = event.account_age_days {
            user_profile.account_age_days = age;
        }
        user_profile.welford_update(event.amount_cents as f64);
        self.profiles.put_user(&event.user_id, &user_profile).await?;

        let mut service_profile = self.profiles.get_service(&event.service_id).await.unwrap_or_default();
        touch(&mut service_profile.common);
        service_profile.service_name = event.service_name.clone();
        self.profiles.put_service(&event.service_id, &service_profile).await?;

        Ok(())
    }

    /// Bumps card and user chargeback counters after a chargeback is
    /// recorded (spec §6.4).
    pub async fn record_chargeback_impact(&self, card_token: &str, user_id: &str) -> Result<()> {
        let mut card_profile = self.profiles.get_card(card_token).await.unwrap_or_default();
        card_profile.common.chargeback_count += 1;
        self.profiles.put_card(card_token, &card_profile).await?;

        let mut user_profile = self.profiles.get_user(user_id).await.unwrap_or_default();
        user_profile.common.chargeback_count += 1;
        user_profile.chargeback_count_90d += 1;
        self.profiles.put_user(user_id, &user_profile).await?;
        Ok(())
    }

    /// Bumps the user's refund counter after a refund is recorded (spec
    /// §6.4).
    pub async fn record_refund_impact(&self, user_id: &str) -> Result<()> {
        let mut user_profile = self.profiles.get_user(user_id).await.unwrap_or_default();
        user_profile.refund_count_90d += 1;
        self.profiles.put_user(user_id, &user_profile).await?;
        Ok(())
    }
}

async fn guard(fut: impl std::future::Future<Output = Result<u64>>) -> u64 {
    fut.await.unwrap_or(0)
}

fn decline_rate(declines: u64, attempts: u64) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        declines as f64 / attempts as f64
    }
}

/// Approximates a 90-day chargeback rate using 30x the 24h transaction
/// count as a denominator proxy (documented approximation, spec §9).
fn estimate_chargeback_rate_90d(user: &UserProfile, user_transactions_24h: u64) -> f64 {
    let denominator = (30 * user_transactions_24h).max(1);
    user.chargeback_count_90d as f64 / denominator as f64
}

fn derive_ip_risk_score(is_datacenter: bool, is_vpn: bool, is_tor: bool, is_proxy: bool) -> f64 {
    let mut score = 0.0;
    if is_datacenter {
        score += 0.5;
    }
    if is_vpn {
        score += 0.3;
    }
    if is_proxy {
        score += 0.2;
    }
    if is_tor {
        score += 0.7;
    }
    score.min(1.0)
}

fn compute_amount_zscore(user: &UserProfile, user_amount_24h_cents: i64, user_transactions_24h: u64, amount_cents: i64) -> f64 {
    let (mean, std) = if user.amount_count >= 2 {
        (user.amount_mean_cents, user.amount_std_cents().unwrap_or(1.0).max(1.0))
    } else if user_transactions_24h > 0 {
        let mean = user_amount_24h_cents as f64 / user_transactions_24h as f64;
        (mean, mean.max(1.0))
    } else {
        (0.0, 1.0)
    };
    let z = (amount_cents as f64 - mean) / std;
    (z * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::velocity::InMemoryVelocityStore;
    use profile::InMemoryProfileStore;

    fn event() -> PaymentEvent {
        use crate::types::*;
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
            device: DeviceInfo { device_id: Some("D1".into()), ..Default::default() },
            geo: GeoInfo { ip_address: Some("1.2.3.4".into()), ..Default::default() },
            verification: VerificationInfo::default(),
            channel: None,
            is_recurring: false,
            session_id: None,
        }
    }

    #[tokio::test]
    async fn compute_features_on_clean_profile_has_zero_velocity() {
        let store = FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new()));
        let features = store.compute_features(&event()).await;
        assert_eq!(features.velocity.card_attempts_10m, 0);
        assert!(features.is_new_card_for_user);
        assert!(features.is_new_device_for_user);
    }

    #[tokio::test]
    async fn update_then_recompute_reflects_history() {
        let store = FeatureStore::new(Arc::new(InMemoryVelocityStore::new()), Arc::new(InMemoryProfileStore::new()));
        let e = event();
        store.update_entity_profiles(&e, false).await.unwrap();
        let features = store.compute_features(&e).await;
        assert!(!features.is_new_card_for_user);
        assert!(!features.is_new_device_for_user);
        assert_eq!(features.velocity.card_attempts_24h, 1);
    }

    #[test]
    fn amount_zscore_uses_profile_stats_when_available() {
        let mut profile = UserProfile::default();
        profile.welford_update(1000.0);
        profile.welford_update(1200.0);
        let z = compute_amount_zscore(&profile, 0, 0, 5000);
        assert!(z > 0.0);
    }

    #[test]
    fn decline_rate_is_zero_with_no_attempts() {
        assert_eq!(decline_rate(0, 0), 0.0);
    }
}
