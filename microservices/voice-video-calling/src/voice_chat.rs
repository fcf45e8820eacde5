//! Voice Chat Service
//!
//! Send voice messages to chat platforms (WhatsApp, Telegram, etc.)

use serde::{Deserialize, Serialize};

use crate::VoiceIvrConfig;

/// Supported chat platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Platform {
    WhatsApp,
    Telegram,
    FacebookMessenger,
    Viber,
}

/// Audio format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AudioFormat {
    OggOpus,
    Mp3,
    M4a,
    Wav,
}

/// Voice message request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceChatRequest {
    pub platform: Platform,
    pub recipient: String,
    pub audio_data: Vec<u8>,
    pub audio_format: AudioFormat,
    pub duration_seconds: Option<u32>,
    pub metadata: Option<serde_json::Value>,
}

/// Voice message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceChatResponse {
    pub message_id: String,
    pub platform_message_id: Option<String>,
    pub status: DeliveryStatus,
}

/// Delivery status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
    Failed,
}

/// Transcoded audio
#[derive(Debug, Clone)]
pub struct TranscodedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
    pub mime_type: String,
    pub duration_seconds: u32,
}

/// Voice Chat Service
pub struct VoiceChatService {
    #[allow(dead_code)]
    config: VoiceIvrConfig,
}

impl VoiceChatService {
    pub async fn new(config: &VoiceIvrConfig) -> brivas_core::Result<Self> {
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Send voice message to chat platform
    pub async fn send_voice_message(
        &self,
        request: VoiceChatRequest,
    ) -> Result<VoiceChatResponse, VoiceChatError> {
        // Transcode audio to platform-specific format
        let transcoded = self.transcode_audio(
            &request.audio_data,
            &request.audio_format,
            &request.platform,
        ).await?;

        // Get platform-specific limits and format
        let (max_size, required_format) = self.get_platform_requirements(&request.platform);

        if transcoded.data.len() > max_size {
            return Err(VoiceChatError::FileTooLarge {
                size: transcoded.data.len(),
                max: max_size,
            });
        }

        // Send via Unified Messaging Hub
        let message_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            platform = ?request.platform,
            recipient = %request.recipient,
            message_id = %message_id,
            format = ?required_format,
            size = transcoded.data.len(),
            "Voice message sent"
        );

        Ok(VoiceChatResponse {
            message_id,
            platform_message_id: None, // Would be set by platform
            status: DeliveryStatus::Sent,
        })
    }

    /// Transcode audio to platform-specific format
    async fn transcode_audio(
        &self,
        _data: &[u8],
        _source_format: &AudioFormat,
        platform: &Platform,
    ) -> Result<TranscodedAudio, VoiceChatError> {
        // Determine target format based on platform
        let (target_format, mime_type) = match platform {
            Platform::WhatsApp => (AudioFormat::OggOpus, "audio/ogg; codecs=opus"),
            Platform::Telegram => (AudioFormat::OggOpus, "audio/ogg; codecs=opus"),
            Platform::FacebookMessenger => (AudioFormat::Mp3, "audio/mp3"),
            Platform::Viber => (AudioFormat::M4a, "audio/m4a"),
        };

        // TODO: Actual transcoding using ffmpeg or similar
        // For now, return mock data
        Ok(TranscodedAudio {
            data: vec![],
            format: target_format,
            mime_type: mime_type.to_string(),
            duration_seconds: 30,
        })
    }

    /// Get platform-specific requirements
    fn get_platform_requirements(&self, platform: &Platform) -> (usize, AudioFormat) {
        match platform {
            Platform::WhatsApp => (16 * 1024 * 1024, AudioFormat::OggOpus),  // 16MB
            Platform::Telegram => (50 * 1024 * 1024, AudioFormat::OggOpus),  // 50MB
            Platform::FacebookMessenger => (25 * 1024 * 1024, AudioFormat::Mp3),  // 25MB
            Platform::Viber => (200 * 1024 * 1024, AudioFormat::M4a),  // 200MB
        }
    }

    /// Get message status
    pub async fn get_message_status(&self, message_id: &str) -> Result<DeliveryStatus, VoiceChatError> {
        // TODO: Query message status from LumaDB
        tracing::debug!(message_id = %message_id, "Getting message status");
        Ok(DeliveryStatus::Sent)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceChatError {
    #[error("Unsupported platform")]
    UnsupportedPlatform,

    #[error("File too large: {size} bytes (max: {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Transcoding failed: {0}")]
    TranscodingFailed(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}
