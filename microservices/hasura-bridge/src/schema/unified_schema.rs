//! Unified GraphQL Schema

use async_graphql::{Object, ID, SimpleObject};
use chrono::{DateTime, Utc};

/// Root query type
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get all conversations (IM)
    async fn im_conversations(&self, limit: Option<i32>) -> Vec<ImConversation> {
        vec![]
    }

    /// Get all RCS agents
    async fn rcs_agents(&self) -> Vec<RcsAgentGql> {
        vec![]
    }

    /// Get all campaigns
    async fn campaigns(&self, status: Option<String>) -> Vec<CampaignGql> {
        vec![]
    }

    /// Analytics query
    async fn analytics(&self, metric: String, from: String, to: String) -> AnalyticsResult {
        AnalyticsResult {
            metric,
            value: 0.0,
            samples: vec![],
        }
    }
}

/// Root mutation type  
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Send an instant message (Hasura Action)
    async fn send_instant_message(
        &self,
        conversation_id: ID,
        content: String,
    ) -> SendMessageResult {
        SendMessageResult {
            message_id: ID::from(uuid::Uuid::new_v4().to_string()),
            sent_at: Utc::now(),
        }
    }

    /// Send RCS rich card (Hasura Action)
    async fn send_rcs_rich_card(
        &self,
        agent_id: ID,
        recipient: String,
        card: serde_json::Value,
    ) -> SendRcsResult {
        SendRcsResult {
            message_id: ID::from(uuid::Uuid::new_v4().to_string()),
            channel: "rcs".to_string(),
            sent_at: Utc::now(),
        }
    }

    /// Initiate voice call (Hasura Action)
    async fn initiate_voice_call(
        &self,
        from: String,
        to: String,
        ivr_flow_id: Option<ID>,
    ) -> InitiateCallResult {
        InitiateCallResult {
            call_id: ID::from(uuid::Uuid::new_v4().to_string()),
            status: "initiated".to_string(),
        }
    }
}

// GraphQL Types
#[derive(SimpleObject)]
pub struct ImConversation {
    pub id: ID,
    pub name: Option<String>,
    pub conversation_type: String,
    pub participant_count: i32,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(SimpleObject)]
pub struct RcsAgentGql {
    pub id: ID,
    pub name: String,
    pub display_name: String,
    pub verification_status: String,
}

#[derive(SimpleObject)]
pub struct CampaignGql {
    pub id: ID,
    pub name: String,
    pub status: String,
    pub channel: String,
    pub sent_count: i32,
    pub delivered_count: i32,
}

#[derive(SimpleObject)]
pub struct AnalyticsResult {
    pub metric: String,
    pub value: f64,
    pub samples: Vec<AnalyticsSample>,
}

#[derive(SimpleObject)]
pub struct AnalyticsSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(SimpleObject)]
pub struct SendMessageResult {
    pub message_id: ID,
    pub sent_at: DateTime<Utc>,
}

#[derive(SimpleObject)]
pub struct SendRcsResult {
    pub message_id: ID,
    pub channel: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(SimpleObject)]
pub struct InitiateCallResult {
    pub call_id: ID,
    pub status: String,
}
