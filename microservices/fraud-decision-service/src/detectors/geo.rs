//! Geo anomaly detector (spec §4.3.3): IP/card geography mismatches,
//! high-risk jurisdictions, anonymization networks, and physically
//! impossible travel between a card's last observed location and this
//! transaction's.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.4;
const BOOST_K: f64 = 0.05;
const MAX_TRAVEL_SPEED_KMH: f64 = 1000.0;
const EARTH_RADIUS_KM: f64 = 6371.0;

pub struct GeoAnomalyDetector {
    pub high_risk_countries: HashSet<String>,
}

impl Default for GeoAnomalyDetector {
    fn default() -> Self {
        let high_risk_countries = ["NG", "GH", "ID", "VN", "PH", "UA", "RU"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self { high_risk_countries }
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1r, lat2r) = (lat1.to_radians(), lat2.to_radians());
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1r.cos() * lat2r.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Returns `(impossible, speed_kmh)`. `impossible` is false and speed is
/// `None` if elapsed time is non-positive (skip, per spec §4.3.3).
pub fn check_impossible_travel(
    last_lat: f64,
    last_lon: f64,
    last_seen: chrono::DateTime<chrono::Utc>,
    now_lat: f64,
    now_lon: f64,
    now: chrono::DateTime<chrono::Utc>,
) -> (bool, Option<f64>) {
    let elapsed_hours = (now - last_seen).num_seconds() as f64 / 3600.0;
    if elapsed_hours <= 0.0 {
        return (false, None);
    }
    let distance_km = haversine_km(last_lat, last_lon, now_lat, now_lon);
    let speed_kmh = distance_km / elapsed_hours;
    (speed_kmh > MAX_TRAVEL_SPEED_KMH, Some(speed_kmh))
}

#[async_trait]
impl Detector for GeoAnomalyDetector {
    fn name(&self) -> &'static str {
        "geo"
    }

    async fn detect(&self, event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut signals = Vec::new();
        let mut result = DetectionResult::default();

        if let (Some(ip_country), Some(card_country)) = (&features.ip_country, &features.card_country) {
            if ip_country != card_country {
                signals.push(0.6);
                result.add_reason(
                    "GEO_COUNTRY_MISMATCH",
                    "IP country does not match the card's issuing country",
                    Severity::Medium,
                    "ip_country/card_country",
                    0.0,
                    0.0,
                );
            }
        }

        if let Some(ip_country) = &features.ip_country {
            if self.high_risk_countries.contains(ip_country) {
                signals.push(0.5);
                result.add_reason(
                    "GEO_HIGH_RISK_COUNTRY",
                    "Transaction originates from a high-risk country",
                    Severity::Medium,
                    "ip_country",
                    0.0,
                    0.0,
                );
            }
        }

        if event.geo.is_tor {
            signals.push(0.8);
            result.add_reason("GEO_TOR", "Transaction routed through the Tor network", Severity::High, "ip_is_tor", 1.0, 0.0);
        }

        if event.geo.is_vpn || event.geo.is_proxy {
            signals.push(0.4);
            result.add_reason(
                "GEO_VPN_PROXY",
                "Transaction routed through a VPN or proxy",
                Severity::Low,
                "ip_is_vpn_or_proxy",
                1.0,
                0.0,
            );
        }

        if event.geo.is_datacenter {
            signals.push(0.7);
            result.add_reason(
                "GEO_DATACENTER_IP",
                "Transaction originates from a datacenter IP range",
                Severity::High,
                "ip_is_datacenter",
                1.0,
                0.0,
            );
        }

        if let (Some(last_lat), Some(last_lon), Some(last_seen), Some(now_lat), Some(now_lon)) = (
            features.entity.card_last_lat,
            features.entity.card_last_lon,
            features.entity.card_last_geo_seen,
            event.geo.latitude,
            event.geo.longitude,
        ) {
            let (impossible, speed_kmh) =
                check_impossible_travel(last_lat, last_lon, last_seen, now_lat, now_lon, event.timestamp);
            if impossible {
                if let Some(speed) = speed_kmh {
                    signals.push(0.8);
                    result.add_reason(
                        "GEO_IMPOSSIBLE_TRAVEL",
                        "Card location implies an impossibly fast journey since its last use",
                        Severity::High,
                        "speed_kmh",
                        speed,
                        MAX_TRAVEL_SPEED_KMH,
                    );
                }
            }
        }

        let (score, triggered) = aggregate(&signals, BOOST_K, TRIGGER_THRESHOLD);
        result.score = score;
        result.triggered = triggered;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use crate::types::PaymentEvent;
    use chrono::{Duration, Utc};

    #[test]
    fn speed_boundary_1000_does_not_trigger() {
        let now = Utc::now();
        let last = now - Duration::hours(1);
        // distance chosen so speed is exactly under 1000 km/h
        let (impossible, speed) = check_impossible_travel(0.0, 0.0, last, 0.0, 8.9932, now);
        assert!(speed.unwrap() <= 1000.0);
        assert!(!impossible);
    }

    #[test]
    fn speed_over_1000_triggers() {
        let now = Utc::now();
        let last = now - Duration::hours(1);
        let (impossible, speed) = check_impossible_travel(40.7128, -74.0060, last, 51.5074, -0.1278, now);
        assert!(speed.unwrap() > 1000.0);
        assert!(impossible);
    }

    #[test]
    fn non_positive_elapsed_skips() {
        let now = Utc::now();
        let (impossible, speed) = check_impossible_travel(0.0, 0.0, now, 1.0, 1.0, now);
        assert!(!impossible);
        assert!(speed.is_none());
    }

    #[tokio::test]
    async fn tor_alone_triggers() {
        let detector = GeoAnomalyDetector::default();
        let mut event = PaymentEvent::fixture();
        event.geo.is_tor = true;
        let result = detector.detect(&event, &FeatureSet::default()).await;
        assert!(result.triggered);
        assert!(result.reasons.iter().any(|r| r.code == "GEO_TOR"));
    }

    #[tokio::test]
    async fn impossible_travel_scenario_from_end_to_end_spec() {
        let detector = GeoAnomalyDetector::default();
        let now = Utc::now();
        let mut event = PaymentEvent::fixture();
        event.timestamp = now;
        event.geo.latitude = Some(51.5074);
        event.geo.longitude = Some(-0.1278);
        let mut features = FeatureSet::default();
        features.entity.card_last_lat = Some(40.7128);
        features.entity.card_last_lon = Some(-74.0060);
        features.entity.card_last_geo_seen = Some(now - Duration::hours(1));
        let result = detector.detect(&event, &features).await;
        assert!(result.reasons.iter().any(|r| r.code == "GEO_IMPOSSIBLE_TRAVEL"));
    }
}
