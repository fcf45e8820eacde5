//! AIOps Tools for MCP
//!
//! Tools for AI/LLM agents to interact with AIOps capabilities

use async_trait::async_trait;
use brivas_mcp_sdk::tool::{Tool, ToolDefinition, ToolError, ToolResult};
use serde_json::{json, Value};

/// Diagnose issue tool
pub struct DiagnoseIssueTool;

#[async_trait]
impl Tool for DiagnoseIssueTool {
    fn name(&self) -> &str {
        "brivas_diagnose_issue"
    }

    fn description(&self) -> &str {
        "Diagnose a platform issue by analyzing metrics, logs, and service health"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "service": {
                    "type": "string",
                    "description": "Service name to diagnose (e.g., smsc, billing, ussd)"
                },
                "symptom": {
                    "type": "string",
                    "description": "Symptom description (e.g., 'high latency', 'connection failures')"
                },
                "timeframe": {
                    "type": "string",
                    "description": "Timeframe to analyze (e.g., '5m', '1h', '24h')"
                }
            },
            "required": ["symptom"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let service = args.get("service").and_then(|v| v.as_str()).unwrap_or("all");
        let symptom = args
            .get("symptom")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("symptom required".into()))?;
        let timeframe = args.get("timeframe").and_then(|v| v.as_str()).unwrap_or("5m");

        // In production, query AIOps engine
        let diagnosis = json!({
            "service": service,
            "symptom": symptom,
            "timeframe": timeframe,
            "analysis": {
                "status": "analyzing",
                "probable_causes": [
                    "Network connectivity issues",
                    "Resource exhaustion",
                    "Configuration drift"
                ],
                "recommended_actions": [
                    "Check service health endpoints",
                    "Review recent configuration changes",
                    "Check network connectivity"
                ]
            }
        });

        Ok(ToolResult::json(diagnosis))
    }
}

/// Auto-remediate tool
pub struct AutoRemediateTool;

#[async_trait]
impl Tool for AutoRemediateTool {
    fn name(&self) -> &str {
        "brivas_auto_remediate"
    }

    fn description(&self) -> &str {
        "Trigger automatic remediation for a detected issue using playbooks"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "issue_type": {
                    "type": "string",
                    "enum": ["smpp_disconnect", "high_latency", "resource_exhaustion", "service_down"],
                    "description": "Type of issue to remediate"
                },
                "service": {
                    "type": "string",
                    "description": "Target service"
                },
                "dry_run": {
                    "type": "boolean",
                    "description": "Preview remediation steps without executing"
                }
            },
            "required": ["issue_type"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let issue_type = args
            .get("issue_type")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("issue_type required".into()))?;
        let service = args.get("service").and_then(|v| v.as_str()).unwrap_or("unknown");
        let dry_run = args.get("dry_run").and_then(|v| v.as_bool()).unwrap_or(false);

        let playbook = match issue_type {
            "smpp_disconnect" => "smpp_recovery",
            "high_latency" => "service_restart",
            "resource_exhaustion" => "scale_out",
            "service_down" => "service_restart",
            _ => "generic_remediation",
        };

        if dry_run {
            Ok(ToolResult::text(format!(
                "Dry run: Would execute playbook '{}' for service '{}'",
                playbook, service
            )))
        } else {
            Ok(ToolResult::text(format!(
                "Remediation triggered: Executing playbook '{}' for service '{}'",
                playbook, service
            )))
        }
    }
}

/// Get service health tool
pub struct GetServiceHealthTool;

#[async_trait]
impl Tool for GetServiceHealthTool {
    fn name(&self) -> &str {
        "brivas_get_service_health"
    }

    fn description(&self) -> &str {
        "Get health status and metrics for platform services"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "service": {
                    "type": "string",
                    "description": "Service name (or 'all' for all services)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let service = args.get("service").and_then(|v| v.as_str()).unwrap_or("all");

        let health = json!({
            "query": service,
            "services": [
                {"name": "api-gateway", "status": "healthy", "uptime": "99.99%"},
                {"name": "smsc", "status": "healthy", "uptime": "99.95%"},
                {"name": "ussd-gateway", "status": "healthy", "uptime": "99.99%"},
                {"name": "billing", "status": "healthy", "uptime": "99.99%"},
                {"name": "hasura-bridge", "status": "healthy", "uptime": "100%"},
                {"name": "mcp-gateway", "status": "healthy", "uptime": "100%"}
            ],
            "overall_health": "healthy"
        });

        Ok(ToolResult::json(health))
    }
}

/// List tables tool for schema discovery
pub struct ListTablesTool;

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &str {
        "brivas_list_tables"
    }

    fn description(&self) -> &str {
        "List all available database tables and their schemas"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "namespace": {
                    "type": "string",
                    "description": "Database namespace/schema (default: public)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("public");

        // In production, call Hasura bridge schema discovery
        let tables = json!({
            "namespace": namespace,
            "tables": [
                "accounts", "user_buckets", "sms_history", "flash_call_history",
                "sender_ids", "user_apps", "apps", "services", "ussd_menus",
                "ussd_sessions", "number_pool", "contacts", "default_sms_rates",
                "tenant_billing_config", "billing_transactions", "invoices",
                "rate_cards", "sms_templates", "campaigns", "service_errors", "resellers"
            ],
            "count": 21
        });

        Ok(ToolResult::json(tables))
    }
}

/// Describe table tool
pub struct DescribeTableTool;

#[async_trait]
impl Tool for DescribeTableTool {
    fn name(&self) -> &str {
        "brivas_describe_table"
    }

    fn description(&self) -> &str {
        "Get detailed schema information for a specific table"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "table": {
                    "type": "string",
                    "description": "Table name to describe"
                }
            },
            "required": ["table"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let table = args
            .get("table")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("table required".into()))?;

        // In production, call Hasura bridge
        let schema = json!({
            "table": table,
            "namespace": "public",
            "columns": [
                {"name": "id", "type": "serial", "primary_key": true},
                {"name": "created_at", "type": "timestamp"},
                {"name": "updated_at", "type": "timestamp"}
            ],
            "indexes": [],
            "graphql_query": format!("{}(limit: Int, where: {}WhereInput): [{}!]!", table, table, table),
            "rest_endpoint": format!("/v1/rest/{}", table)
        });

        Ok(ToolResult::json(schema))
    }
}

/// Trigger playbook tool
pub struct TriggerPlaybookTool;

#[async_trait]
impl Tool for TriggerPlaybookTool {
    fn name(&self) -> &str {
        "brivas_trigger_playbook"
    }

    fn description(&self) -> &str {
        "Trigger a specific remediation playbook by name"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "playbook": {
                    "type": "string",
                    "enum": ["smpp_recovery", "service_restart", "scale_out", "database_failover"],
                    "description": "Playbook name to execute"
                },
                "parameters": {
                    "type": "object",
                    "description": "Parameters to pass to the playbook"
                }
            },
            "required": ["playbook"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let playbook = args
            .get("playbook")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("playbook required".into()))?;

        Ok(ToolResult::text(format!(
            "Playbook '{}' execution initiated. Check AIOps dashboard for status.",
            playbook
        )))
    }
}

// ============== Dify AI Integration Tools ==============

/// Chat with Dify AI agent
pub struct DifyAgentChatTool;

#[async_trait]
impl Tool for DifyAgentChatTool {
    fn name(&self) -> &str {
        "brivas_dify_chat"
    }

    fn description(&self) -> &str {
        "Chat with a Dify AI agent (customer support, AIOps analyst, developer assistant)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": {
                    "type": "string",
                    "enum": ["customer_support", "aiops_analyst", "developer_assistant", "billing_specialist", "campaign_advisor"],
                    "description": "Agent to chat with"
                },
                "message": {
                    "type": "string",
                    "description": "Message to send to the agent"
                },
                "conversation_id": {
                    "type": "string",
                    "description": "Optional conversation ID to continue a conversation"
                }
            },
            "required": ["agent_id", "message"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let agent_id = args
            .get("agent_id")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("agent_id required".into()))?;
        let message = args
            .get("message")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("message required".into()))?;
        let conversation_id = args.get("conversation_id").and_then(|v| v.as_str());

        // In production, call dify-orchestrator service
        let response = json!({
            "agent_id": agent_id,
            "message": message,
            "conversation_id": conversation_id.unwrap_or("new"),
            "response": format!("Agent '{}' is processing your request: '{}'", agent_id, message),
            "status": "success",
            "endpoint": "http://dify-orchestrator:8080/api/v1/agents/{}/chat"
        });

        Ok(ToolResult::json(response))
    }
}

/// Run Dify workflow
pub struct DifyWorkflowTool;

#[async_trait]
impl Tool for DifyWorkflowTool {
    fn name(&self) -> &str {
        "brivas_dify_workflow"
    }

    fn description(&self) -> &str {
        "Execute a Dify AI workflow (campaign builder, billing dispute, incident triage)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workflow_id": {
                    "type": "string",
                    "enum": ["campaign_builder", "billing_dispute", "incident_triage", "sender_id_approval"],
                    "description": "Workflow to execute"
                },
                "inputs": {
                    "type": "object",
                    "description": "Workflow input parameters"
                }
            },
            "required": ["workflow_id", "inputs"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let workflow_id = args
            .get("workflow_id")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("workflow_id required".into()))?;
        let inputs = args.get("inputs").cloned().unwrap_or(json!({}));

        // In production, call dify-orchestrator service
        let result = json!({
            "workflow_id": workflow_id,
            "inputs": inputs,
            "run_id": format!("run_{}", uuid::Uuid::new_v4()),
            "status": "queued",
            "message": format!("Workflow '{}' has been queued for execution", workflow_id),
            "endpoint": "http://dify-orchestrator:8080/api/v1/workflows/{}/run"
        });

        Ok(ToolResult::json(result))
    }
}

/// Search Dify RAG knowledge base
pub struct DifyKnowledgeTool;

#[async_trait]
impl Tool for DifyKnowledgeTool {
    fn name(&self) -> &str {
        "brivas_dify_knowledge"
    }

    fn description(&self) -> &str {
        "Search the Dify RAG knowledge base for platform documentation and FAQs"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "category": {
                    "type": "string",
                    "enum": ["api", "billing", "troubleshooting", "general"],
                    "description": "Category to search"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Number of results to return (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("query required".into()))?;
        let category = args.get("category").and_then(|v| v.as_str());
        let top_k = args.get("top_k").and_then(|v| v.as_u64()).unwrap_or(5);

        // In production, call dify-orchestrator RAG service
        let results = json!({
            "query": query,
            "category": category,
            "top_k": top_k,
            "results": [
                {
                    "title": "API Authentication Guide",
                    "content": "Use Bearer token in Authorization header...",
                    "score": 0.95,
                    "category": "api"
                },
                {
                    "title": "Billing FAQ",
                    "content": "Invoices are generated on the 1st of each month...",
                    "score": 0.82,
                    "category": "billing"
                }
            ],
            "count": 2
        });

        Ok(ToolResult::json(results))
    }
}

/// Create AI-powered campaign
pub struct DifyCampaignBuilderTool;

#[async_trait]
impl Tool for DifyCampaignBuilderTool {
    fn name(&self) -> &str {
        "brivas_ai_campaign"
    }

    fn description(&self) -> &str {
        "Create an SMS/RCS campaign using natural language description"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Natural language description of the campaign"
                },
                "target_audience": {
                    "type": "string",
                    "description": "Target audience segment"
                },
                "channel": {
                    "type": "string",
                    "enum": ["sms", "rcs", "whatsapp"],
                    "description": "Messaging channel"
                },
                "budget": {
                    "type": "number",
                    "description": "Campaign budget in USD"
                }
            },
            "required": ["description"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let description = args
            .get("description")
            .and_then(|v| v.as_str())
            .ok_or(ToolError::InvalidInput("description required".into()))?;
        let target = args.get("target_audience").and_then(|v| v.as_str()).unwrap_or("all_users");
        let channel = args.get("channel").and_then(|v| v.as_str()).unwrap_or("sms");
        let budget = args.get("budget").and_then(|v| v.as_f64()).unwrap_or(500.0);

        // In production, call dify-orchestrator campaign builder workflow
        let campaign = json!({
            "campaign": {
                "name": format!("AI Campaign: {}", &description[..description.len().min(30)]),
                "description": description,
                "channel": channel,
                "target_audience": target,
                "budget": budget,
                "estimated_reach": 10000,
                "message_template": "AI-generated message template based on your description..."
            },
            "status": "draft",
            "next_steps": ["Review template", "Approve audience", "Schedule send"]
        });

        Ok(ToolResult::json(campaign))
    }
}

/// Get all AIOps tools
pub fn get_aiops_tools() -> Vec<Box<dyn Tool>> {
    vec![
        // Core AIOps tools
        Box::new(DiagnoseIssueTool),
        Box::new(AutoRemediateTool),
        Box::new(GetServiceHealthTool),
        Box::new(ListTablesTool),
        Box::new(DescribeTableTool),
        Box::new(TriggerPlaybookTool),
        // Dify AI integration tools
        Box::new(DifyAgentChatTool),
        Box::new(DifyWorkflowTool),
        Box::new(DifyKnowledgeTool),
        Box::new(DifyCampaignBuilderTool),
    ]
}

