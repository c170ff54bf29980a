//! Website scraping (mocked).

use std::time::Duration;

use {async_trait::async_trait, tracing::info, voira_common::ScrapedData};

use crate::{ServiceError, ServiceResult};

#[async_trait]
pub trait WebsiteScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> ServiceResult<ScrapedData>;
}

/// Reject empty and unparsable URLs before doing any work.
pub fn validate_url(url: &str) -> ServiceResult<url::Url> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ServiceError::validation("URL is required"));
    }
    url::Url::parse(url).map_err(|_| ServiceError::validation("Invalid URL format"))
}

/// Returns a fixed dental-practice profile for any valid URL.
pub struct MockWebsiteScraper {
    delay: Duration,
}

impl MockWebsiteScraper {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WebsiteScraper for MockWebsiteScraper {
    async fn scrape(&self, url: &str) -> ServiceResult<ScrapedData> {
        let parsed = validate_url(url)?;
        tokio::time::sleep(self.delay).await;
        info!(host = parsed.host_str().unwrap_or_default(), "scraped website");
        Ok(sample_profile())
    }
}

fn sample_profile() -> ScrapedData {
    ScrapedData {
        practice_name: Some("Medco".into()),
        business_type: Some("Dental Practice".into()),
        location: Some("Berlin, Germany".into()),
        description: Some(
            "Premier dental care services including cleanings, whitening, and cosmetic dentistry"
                .into(),
        ),
        services: ["Teeth Cleaning", "Whitening", "Fillings", "Root Canals", "Cosmetic Dentistry"]
            .map(String::from)
            .to_vec(),
        hours: Some("Mon-Fri 8AM-6PM, Sat 9AM-2PM".into()),
        phone: Some("+49 (555) 123-4567".into()),
        email: Some("contact@brightsmile.com".into()),
    }
}
