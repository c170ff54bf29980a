//! Collaborator services behind the onboarding flow and the demo page.
//!
//! Phone allocation, website scraping, call triggering and OAuth-style
//! integration connects are mocked with artificial delays. Document
//! ingestion validates and forwards to a [`vector_store::VectorStore`].

pub mod call;
pub mod error;
pub mod ingest;
pub mod integrations;
pub mod phone;
pub mod scrape;
pub mod vector_store;
pub mod weaviate;

use std::{sync::Arc, time::Duration};

pub use error::{ServiceError, ServiceResult};

use voira_config::VoiraConfig;

/// The collaborator set used by the gateway and the terminal wizard.
#[derive(Clone)]
pub struct Services {
    pub phone: Arc<dyn phone::PhoneAllocator>,
    pub scraper: Arc<dyn scrape::WebsiteScraper>,
    pub calls: Arc<dyn call::CallTrigger>,
    pub integrations: Arc<dyn integrations::IntegrationConnector>,
    pub ingest: Arc<ingest::IngestService>,
}

impl Services {
    /// Mocks with the configured delays; ingestion goes to Weaviate when
    /// configured and is refused otherwise.
    pub fn from_config(config: &VoiraConfig) -> Self {
        let delays = &config.services;
        Self {
            phone: Arc::new(phone::MockPhoneAllocator::new(
                Duration::from_millis(delays.allocate_delay_ms),
                delays.default_country.clone(),
            )),
            scraper: Arc::new(scrape::MockWebsiteScraper::new(Duration::from_millis(
                delays.scrape_delay_ms,
            ))),
            calls: Arc::new(call::MockCallTrigger::new(Duration::from_millis(
                delays.trigger_delay_ms,
            ))),
            integrations: Arc::new(integrations::MockConnector::default()),
            ingest: Arc::new(ingest::IngestService::from_config(&config.ingest)),
        }
    }

    /// Instant mocks and an in-memory vector store.
    pub fn in_memory() -> Self {
        Self {
            phone: Arc::new(phone::MockPhoneAllocator::new(Duration::ZERO, "US")),
            scraper: Arc::new(scrape::MockWebsiteScraper::new(Duration::ZERO)),
            calls: Arc::new(call::MockCallTrigger::new(Duration::ZERO)),
            integrations: Arc::new(integrations::MockConnector::new(Duration::ZERO)),
            ingest: Arc::new(ingest::IngestService::new(
                Arc::new(vector_store::InMemoryVectorStore::default()),
                "text-embedding-3-small",
            )),
        }
    }
}
