//! Outbound demo call trigger (mocked).

use std::time::Duration;

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    tracing::info,
};

use crate::{ServiceError, ServiceResult};

pub const DEFAULT_AGENT_TYPE: &str = "claims";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(default)]
    pub phone_number: String,
    pub agent_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReceipt {
    pub success: bool,
    pub message: String,
    pub call_id: String,
    pub phone_number: String,
    pub agent_type: String,
    pub estimated_call_time: String,
}

#[async_trait]
pub trait CallTrigger: Send + Sync {
    async fn trigger(&self, request: CallRequest) -> ServiceResult<CallReceipt>;
}

/// Queues nothing; answers with a receipt after a fixed delay.
pub struct MockCallTrigger {
    delay: Duration,
}

impl MockCallTrigger {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CallTrigger for MockCallTrigger {
    async fn trigger(&self, request: CallRequest) -> ServiceResult<CallReceipt> {
        let phone_number = request.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(ServiceError::validation("Phone number is required"));
        }
        tokio::time::sleep(self.delay).await;

        let agent_type = request
            .agent_type
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_TYPE.to_string());
        let call_id = format!("call_{}", chrono::Utc::now().timestamp_millis());
        info!(%call_id, %agent_type, "demo call queued");

        Ok(CallReceipt {
            success: true,
            message: "Call request queued successfully".into(),
            call_id,
            phone_number,
            agent_type,
            estimated_call_time: "30-60 seconds".into(),
        })
    }
}
