use std::sync::Arc;

use {
    voira_config::VoiraConfig,
    voira_onboarding::{LiveOnboardingService, SessionStore, store_file::FileSessionStore},
    voira_services::Services,
};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct GatewayState {
    pub services: Services,
    pub onboarding: Arc<LiveOnboardingService>,
    pub version: &'static str,
}

impl GatewayState {
    pub fn new(services: Services, onboarding: LiveOnboardingService) -> Self {
        Self {
            services,
            onboarding: Arc::new(onboarding),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Services and a file-backed session store built from `config`.
    pub async fn from_config(config: &VoiraConfig) -> Self {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::default_path());
        let onboarding =
            LiveOnboardingService::open(store, config.onboarding.storage_key.clone()).await;
        Self::new(Services::from_config(config), onboarding)
    }
}
