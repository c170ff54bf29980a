//! Calendar and email provider connects (simulated OAuth).

use std::time::Duration;

use {async_trait::async_trait, tracing::info};

use crate::{ServiceError, ServiceResult};

#[async_trait]
pub trait IntegrationConnector: Send + Sync {
    /// Connect `provider` (an id such as `google` or `gmail`).
    async fn connect(&self, provider: &str) -> ServiceResult<()>;
}

/// Succeeds for any non-empty provider after a fixed delay.
pub struct MockConnector {
    delay: Duration,
}

impl MockConnector {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl IntegrationConnector for MockConnector {
    async fn connect(&self, provider: &str) -> ServiceResult<()> {
        if provider.trim().is_empty() {
            return Err(ServiceError::validation("provider is required"));
        }
        tokio::time::sleep(self.delay).await;
        info!(provider, "integration connected");
        Ok(())
    }
}
