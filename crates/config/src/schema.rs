/// Config schema types (server, onboarding, mocked services, ingestion).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiraConfig {
    pub server: ServerConfig,
    pub onboarding: OnboardingConfig,
    pub services: ServicesConfig,
    pub ingest: IngestConfig,
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Where and under which key the onboarding session is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Storage key of the single session entry.
    pub storage_key: String,
}

pub const DEFAULT_STORAGE_KEY: &str = "voira_onboarding_data";

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
        }
    }
}

/// Artificial latencies and defaults for the mocked collaborator endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub allocate_delay_ms: u64,
    pub scrape_delay_ms: u64,
    pub trigger_delay_ms: u64,
    /// Country used when a phone allocation request omits one.
    pub default_country: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            allocate_delay_ms: 500,
            scrape_delay_ms: 2000,
            trigger_delay_ms: 500,
            default_country: "US".into(),
        }
    }
}

/// Vector database used by document ingestion.
///
/// Ingestion is refused at request time when any of the three connection
/// values is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub weaviate_url: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub weaviate_api_key: Option<Secret<String>>,
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub openai_api_key: Option<Secret<String>>,
    /// Vectorizer model configured on newly created tenant collections.
    pub embedding_model: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            weaviate_url: None,
            weaviate_api_key: None,
            openai_api_key: None,
            embedding_model: "text-embedding-3-small".into(),
        }
    }
}

impl IngestConfig {
    /// True when url and both keys are present.
    pub fn is_configured(&self) -> bool {
        self.weaviate_url.as_deref().is_some_and(|u| !u.is_empty())
            && self
                .weaviate_api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty())
            && self
                .openai_api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty())
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mocked_endpoints() {
        let cfg = VoiraConfig::default();
        assert_eq!(cfg.onboarding.storage_key, "voira_onboarding_data");
        assert_eq!(cfg.services.scrape_delay_ms, 2000);
        assert_eq!(cfg.services.allocate_delay_ms, 500);
        assert_eq!(cfg.services.default_country, "US");
        assert!(!cfg.ingest.is_configured());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: VoiraConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [ingest]
            weaviate_url = "https://cluster.weaviate.network"
            weaviate_api_key = "wv"
            openai_api_key = "sk"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert!(cfg.ingest.is_configured());
        assert_eq!(cfg.ingest.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn empty_key_is_not_configured() {
        let cfg: VoiraConfig = toml::from_str(
            r#"
            [ingest]
            weaviate_url = "https://cluster.weaviate.network"
            weaviate_api_key = ""
            openai_api_key = "sk"
            "#,
        )
        .unwrap();
        assert!(!cfg.ingest.is_configured());
    }
}
