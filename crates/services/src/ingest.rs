//! Document ingestion into per-tenant vector collections.

use std::{collections::BTreeMap, sync::Arc};

use {
    serde::{Deserialize, Serialize},
    serde_json::json,
    tracing::{info, warn},
    voira_config::IngestConfig,
};

use crate::{
    ServiceError, ServiceResult,
    vector_store::{DocumentObject, VectorStore},
    weaviate::WeaviateStore,
};

const SUPPORTED_EXTENSIONS: [&str; 2] = [".txt", ".md"];

const NOT_CONFIGURED: &str = "Server configuration error. Please contact administrator.";

const INVALID_REQUEST: &str = "Invalid request. Required: tenantId (string) and documents (array)";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub documents: Option<Vec<Document>>,
}

/// Outcome of one ingest call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub inserted: usize,
    pub total: usize,
    /// Documents dropped for an unsupported file type.
    pub skipped: usize,
    pub collection: String,
    /// Failures keyed by position among the accepted documents.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<usize, String>,
}

impl IngestReport {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Stem of `filename` when it ends in a supported extension (any case).
fn supported_stem(filename: &str) -> Option<&str> {
    SUPPORTED_EXTENSIONS.iter().find_map(|ext| {
        let split = filename.len().checked_sub(ext.len())?;
        let tail = filename.get(split..)?;
        tail.eq_ignore_ascii_case(ext).then(|| &filename[..split])
    })
}

pub fn is_supported_file(filename: &str) -> bool {
    supported_stem(filename).is_some()
}

/// Tenant ids become part of a class name and of Weaviate URL paths.
fn is_valid_tenant_id(tenant_id: &str) -> bool {
    !tenant_id.is_empty()
        && tenant_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

pub fn collection_name(tenant_id: &str) -> String {
    format!("Documents_{tenant_id}")
}

/// Filename without its `.txt`/`.md` extension.
fn title_of(filename: &str) -> &str {
    supported_stem(filename).unwrap_or(filename)
}

pub struct IngestService {
    store: Option<Arc<dyn VectorStore>>,
    model: String,
}

impl IngestService {
    pub fn new(store: Arc<dyn VectorStore>, model: impl Into<String>) -> Self {
        Self {
            store: Some(store),
            model: model.into(),
        }
    }

    /// Weaviate-backed when url and both keys are set; otherwise every
    /// ingest fails with [`ServiceError::NotConfigured`].
    pub fn from_config(config: &IngestConfig) -> Self {
        let store = match (
            config.weaviate_url.as_deref(),
            config.weaviate_api_key.clone(),
            config.openai_api_key.clone(),
        ) {
            (Some(url), Some(api_key), Some(openai_key)) if config.is_configured() => {
                Some(Arc::new(WeaviateStore::new(url, api_key, openai_key)) as Arc<dyn VectorStore>)
            },
            _ => None,
        };
        if store.is_none() {
            warn!("document ingestion not configured; set WEAVIATE_URL, WEAVIATE_API_KEY and OPENAI_API_KEY");
        }
        Self {
            store,
            model: config.embedding_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub async fn ingest(&self, request: IngestRequest) -> ServiceResult<IngestReport> {
        let tenant_id = request.tenant_id.trim();
        let (false, Some(documents)) = (tenant_id.is_empty(), request.documents) else {
            return Err(ServiceError::validation(INVALID_REQUEST));
        };
        if !is_valid_tenant_id(tenant_id) {
            return Err(ServiceError::validation(
                "Invalid tenantId. Use only letters, digits and underscores.",
            ));
        }
        let Some(store) = self.store.as_ref() else {
            return Err(ServiceError::not_configured(NOT_CONFIGURED));
        };

        let received = documents.len();
        let accepted: Vec<Document> = documents
            .into_iter()
            .filter(|doc| {
                let ok = is_supported_file(&doc.filename);
                if !ok {
                    warn!(filename = %doc.filename, "skipping unsupported file type");
                }
                ok
            })
            .collect();
        if accepted.is_empty() {
            return Err(ServiceError::validation(
                "No valid documents to ingest. Only .txt and .md files are supported.",
            ));
        }

        let collection = collection_name(tenant_id);
        store.ensure_collection(&collection, &self.model).await?;

        let uploaded_at = chrono::Utc::now().to_rfc3339();
        let objects: Vec<DocumentObject> = accepted
            .into_iter()
            .map(|doc| DocumentObject {
                title: title_of(&doc.filename).to_string(),
                metadata: doc
                    .metadata
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| json!({ "uploadedAt": uploaded_at }).to_string()),
                content: doc.content,
                filename: doc.filename,
            })
            .collect();
        let total = objects.len();
        let errors = store.insert_many(&collection, objects).await?;

        let report = IngestReport {
            inserted: total - errors.len(),
            total,
            skipped: received - total,
            collection,
            errors,
        };
        if report.is_partial() {
            warn!(collection = %report.collection, failed = report.errors.len(), "documents ingested with errors");
        } else {
            info!(collection = %report.collection, inserted = report.inserted, "documents ingested");
        }
        Ok(report)
    }
}
