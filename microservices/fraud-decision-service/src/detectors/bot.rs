//! Bot/automation detector (spec §4.3.4): device and network signals
//! that indicate the request did not originate from a genuine
//! consumer handset or browser.

use async_trait::async_trait;

use crate::features::FeatureSet;
use crate::types::{PaymentEvent, Severity};

use super::{aggregate, Detector, DetectionResult};

const TRIGGER_THRESHOLD: f64 = 0.5;
const BOOST_K: f64 = 0.08;

pub struct BotDetector {
    pub missing_fields_threshold: usize,
}

impl Default for BotDetector {
    fn default() -> Self {
        Self { missing_fields_threshold: 3 }
    }
}

/// A Safari user-agent claiming to run on Linux, or a Windows
/// user-agent claiming to be a mobile device, are both signatures of
/// a spoofed or emulated client.
fn is_suspicious_user_agent(os: Option<&str>, browser: Option<&str>, device_type: Option<&str>) -> bool {
    let os = os.unwrap_or("").to_lowercase();
    let browser = browser.unwrap_or("").to_lowercase();
    let device_type = device_type.unwrap_or("").to_lowercase();

    if browser.contains("safari") && os.contains("linux") {
        return true;
    }
    if os.contains("windows") && device_type == "mobile" {
        return true;
    }
    false
}

#[async_trait]
impl Detector for BotDetector {
    fn name(&self) -> &'static str {
        "bot"
    }

    async fn detect(&self, event: &PaymentEvent, features: &FeatureSet) -> DetectionResult {
        let mut signals = Vec::new();
        let mut result = DetectionResult::default();

        if event.device.is_emulator || features.entity.device_is_emulator {
            signals.push(0.9);
            result.add_reason(
                "BOT_EMULATOR",
                "Device reports running inside an emulator",
                Severity::Critical,
                "device_is_emulator",
                1.0,
                0.0,
            );
        }

        if event.device.is_rooted {
            signals.push(0.6);
            result.add_reason(
                "BOT_ROOTED_DEVICE",
                "Device reports a rooted or jailbroken state",
                Severity::Medium,
                "device_is_rooted",
                1.0,
                0.0,
            );
        }

        if event.geo.is_datacenter {
            signals.push(0.8);
            result.add_reason(
                "BOT_DATACENTER_IP",
                "Request originates from a datacenter IP range",
                Severity::High,
                "ip_is_datacenter",
                1.0,
                0.0,
            );
        }

        if event.geo.is_tor {
            signals.push(0.85);
            result.add_reason("BOT_TOR", "Request routed through the Tor network", Severity::High, "ip_is_tor", 1.0, 0.0);
        }

        if event.geo.is_vpn || event.geo.is_proxy {
            signals.push(0.3);
            result.add_reason(
                "BOT_VPN_PROXY",
                "Request routed through a VPN or proxy",
                Severity::Low,
                "ip_is_vpn_or_proxy",
                1.0,
                0.0,
            );
        }

        if is_suspicious_user_agent(
            features.device_user_agent_os.as_deref(),
            features.device_user_agent_browser.as_deref(),
            features.device_type.as_deref(),
        ) {
            signals.push(0.5);
            result.add_reason(
                "BOT_SUSPICIOUS_USER_AGENT",
                "Device user agent is inconsistent with its reported platform",
                Severity::Medium,
                "device_user_agent",
                1.0,
                0.0,
            );
        }

        if features.device_missing_fields >= self.missing_fields_threshold || !features.device_id_present {
            signals.push(0.4);
            result.add_reason(
                "BOT_INCOMPLETE_FINGERPRINT",
                "Device fingerprint is missing fields expected from a genuine client",
                Severity::Medium,
                "device_missing_fields",
                features.device_missing_fields as f64,
                self.missing_fields_threshold as f64,
            );
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

    #[tokio::test]
    async fn clean_device_does_not_trigger() {
        let detector = BotDetector::default();
        let result = detector.detect(&PaymentEvent::fixture(), &FeatureSet::default()).await;
        assert!(!result.triggered);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn emulator_alone_triggers_critical() {
        let detector = BotDetector::default();
        let mut event = PaymentEvent::fixture();
        event.device.is_emulator = true;
        let result = detector.detect(&event, &FeatureSet::default()).await;
        assert!(result.triggered);
        assert_eq!(result.reasons[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn profile_emulator_flag_triggers_without_event_flag() {
        let detector = BotDetector::default();
        let mut features = FeatureSet::default();
        features.entity.device_is_emulator = true;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(result.triggered);
        assert_eq!(result.reasons[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn emulator_and_tor_compound_above_either_alone() {
        let detector = BotDetector::default();
        let mut event = PaymentEvent::fixture();
        event.device.is_emulator = true;
        event.geo.is_tor = true;
        let result = detector.detect(&event, &FeatureSet::default()).await;
        assert!((result.score - (0.9 + BOOST_K)).abs() < 1e-9);
    }

    #[test]
    fn safari_on_linux_is_suspicious() {
        assert!(is_suspicious_user_agent(Some("Linux"), Some("Safari"), None));
    }

    #[test]
    fn windows_mobile_is_suspicious() {
        assert!(is_suspicious_user_agent(Some("Windows"), Some("Chrome"), Some("mobile")));
    }

    #[test]
    fn windows_desktop_is_not_suspicious() {
        assert!(!is_suspicious_user_agent(Some("Windows"), Some("Chrome"), Some("desktop")));
    }

    #[tokio::test]
    async fn incomplete_fingerprint_triggers_when_missing_device_id() {
        let detector = BotDetector::default();
        let mut features = FeatureSet::default();
        features.device_id_present = false;
        let result = detector.detect(&PaymentEvent::fixture(), &features).await;
        assert!(result.reasons.iter().any(|r| r.code == "BOT_INCOMPLETE_FINGERPRINT"));
    }
}
