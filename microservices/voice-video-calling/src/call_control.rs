//! Call Control Module
//!
//! Basic call origination and control stubs.

use crate::VoiceIvrConfig;

/// Call Control (placeholder for OpenSIPS/FreeSWITCH integration)
pub struct CallControl {
    #[allow(dead_code)]
    config: VoiceIvrConfig,
}

impl CallControl {
    pub async fn new(config: &VoiceIvrConfig) -> brivas_core::Result<Self> {
        Ok(Self { config: config.clone() })
    }
}
