//! Phone number allocation (mocked).

use std::time::Duration;

use {
    async_trait::async_trait,
    rand::Rng,
    serde::{Deserialize, Serialize},
    tracing::info,
    voira_common::PhoneNumbers,
};

use crate::ServiceResult;

pub const DEFAULT_AREA_CODE: &str = "555";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRequest {
    /// Falls back to the allocator's default country.
    pub country: Option<String>,
    pub area_code: Option<String>,
}

/// Line features reported with every allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfiguration {
    pub voicemail: &'static str,
    pub call_forwarding: &'static str,
    pub recording: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneAllocation {
    pub success: bool,
    #[serde(flatten)]
    pub numbers: PhoneNumbers,
    pub country: String,
    pub message: String,
    pub configuration: LineConfiguration,
}

#[async_trait]
pub trait PhoneAllocator: Send + Sync {
    async fn allocate(&self, request: PhoneRequest) -> ServiceResult<PhoneAllocation>;
}

/// Hands out random `+1 (AAA) PPP-SSSS` numbers after a fixed delay.
pub struct MockPhoneAllocator {
    delay: Duration,
    default_country: String,
}

impl MockPhoneAllocator {
    pub fn new(delay: Duration, default_country: impl Into<String>) -> Self {
        Self {
            delay,
            default_country: default_country.into(),
        }
    }
}

#[async_trait]
impl PhoneAllocator for MockPhoneAllocator {
    async fn allocate(&self, request: PhoneRequest) -> ServiceResult<PhoneAllocation> {
        tokio::time::sleep(self.delay).await;

        let country = request
            .country
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.default_country.clone());
        let area = request
            .area_code
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AREA_CODE.to_string());

        let numbers = {
            let mut rng = rand::rng();
            PhoneNumbers {
                inbound_number: mock_number(&mut rng, &area),
                outbound_number: mock_number(&mut rng, &area),
            }
        };
        info!(%country, inbound = %numbers.inbound_number, "allocated phone numbers");

        Ok(PhoneAllocation {
            success: true,
            numbers,
            country,
            message: "Phone numbers allocated successfully".into(),
            configuration: LineConfiguration {
                voicemail: "enabled",
                call_forwarding: "enabled",
                recording: "enabled",
            },
        })
    }
}

fn mock_number(rng: &mut impl Rng, area: &str) -> String {
    let prefix = rng.random_range(100..=999);
    let suffix = rng.random_range(1000..=9999);
    format!("+1 ({area}) {prefix}-{suffix}")
}
