//! SIP Video Calls
//!
//! Handles SIP-based video calls for traditional endpoints.

use uuid::Uuid;

/// SIP Video call handler
pub struct SipVideoHandler {
    /// SIP server address
    sip_server: String,
}

impl SipVideoHandler {
    pub fn new(sip_server: &str) -> Self {
        Self {
            sip_server: sip_server.to_string(),
        }
    }

    /// Initiate a SIP video call
    pub async fn initiate_call(
        &self,
        from: &str,
        to: &str,
        with_video: bool,
    ) -> Result<SipVideoCall, SipVideoError> {
        let call_id = Uuid::new_v4();
        
        // TODO: Send SIP INVITE with video SDP
        tracing::info!(
            call_id = %call_id,
            from = %from,
            to = %to,
            video = %with_video,
            server = %self.sip_server,
            "Initiating SIP video call"
        );

        Ok(SipVideoCall {
            id: call_id,
            from: from.to_string(),
            to: to.to_string(),
            state: CallState::Initiating,
            has_video: with_video,
        })
    }

    /// Answer an incoming SIP video call
    pub async fn answer_call(
        &self,
        call_id: Uuid,
        _accept_video: bool,
    ) -> Result<(), SipVideoError> {
        // TODO: Send SIP 200 OK with video SDP
        tracing::info!(call_id = %call_id, "Answering SIP video call");
        Ok(())
    }

    /// Hang up a SIP video call
    pub async fn hangup(&self, call_id: Uuid) -> Result<(), SipVideoError> {
        // TODO: Send SIP BYE
        tracing::info!(call_id = %call_id, "Hanging up SIP video call");
        Ok(())
    }

    /// Toggle video on/off during call
    pub async fn toggle_video(&self, call_id: Uuid, enabled: bool) -> Result<(), SipVideoError> {
        // TODO: Send re-INVITE with updated SDP
        tracing::info!(call_id = %call_id, video_enabled = %enabled, "Toggling video");
        Ok(())
    }
}

pub struct SipVideoCall {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub state: CallState,
    pub has_video: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum CallState {
    Initiating,
    Ringing,
    Connected,
    OnHold,
    Terminated,
}

#[derive(Debug, thiserror::Error)]
pub enum SipVideoError {
    #[error("Call not found")]
    CallNotFound,
    #[error("SIP error: {0}")]
    SipError(String),
    #[error("Media error: {0}")]
    MediaError(String),
}
