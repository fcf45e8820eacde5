//! Video Recording
//!
//! Manages video call and conference recording.

use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Recording session
pub struct Recording {
    pub id: Uuid,
    pub conference_id: Uuid,
    pub recording_type: RecordingType,
    pub state: RecordingState,
    pub storage_url: Option<String>,
    pub size_bytes: u64,
    pub duration_seconds: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub has_transcription: bool,
    pub transcription_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum RecordingType {
    AudioOnly,
    Video,
    ScreenShare,
    Composite,
}

#[derive(Debug, Clone, Copy)]
pub enum RecordingState {
    Pending,
    Recording,
    Processing,
    Ready,
    Failed,
}

/// Recording manager
pub struct RecordingManager {
    /// Storage path/URL for recordings
    storage_path: String,
}

impl RecordingManager {
    pub fn new(storage_path: &str) -> Self {
        Self {
            storage_path: storage_path.to_string(),
        }
    }

    /// Start recording a conference
    pub async fn start_recording(
        &self,
        conference_id: Uuid,
        recording_type: RecordingType,
    ) -> Result<Recording, RecordingError> {
        let recording = Recording {
            id: Uuid::new_v4(),
            conference_id,
            recording_type,
            state: RecordingState::Recording,
            storage_url: None,
            size_bytes: 0,
            duration_seconds: 0,
            started_at: Utc::now(),
            ended_at: None,
            has_transcription: false,
            transcription_url: None,
        };

        // TODO: Signal media server to start recording
        tracing::info!(
            recording_id = %recording.id,
            conference_id = %conference_id,
            "Starting recording"
        );

        Ok(recording)
    }

    /// Stop recording
    pub async fn stop_recording(&self, recording_id: Uuid) -> Result<Recording, RecordingError> {
        // TODO: Signal media server to stop recording
        tracing::info!(recording_id = %recording_id, "Stopping recording");

        // Return placeholder
        Ok(Recording {
            id: recording_id,
            conference_id: Uuid::nil(),
            recording_type: RecordingType::Video,
            state: RecordingState::Processing,
            storage_url: Some(format!("{}/{}.mp4", self.storage_path, recording_id)),
            size_bytes: 0,
            duration_seconds: 0,
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
            has_transcription: false,
            transcription_url: None,
        })
    }

    /// Get recording status
    pub async fn get_recording(&self, recording_id: Uuid) -> Result<Recording, RecordingError> {
        // TODO: Query LumaDB for recording
        Err(RecordingError::NotFound)
    }

    /// Request transcription for a recording
    pub async fn request_transcription(&self, recording_id: Uuid) -> Result<(), RecordingError> {
        tracing::info!(recording_id = %recording_id, "Requesting transcription");
        Ok(())
    }
}

impl Default for RecordingManager {
    fn default() -> Self {
        Self::new("/var/recordings")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("Recording not found")]
    NotFound,
    #[error("Recording already in progress")]
    AlreadyRecording,
    #[error("Storage error: {0}")]
    StorageError(String),
}
