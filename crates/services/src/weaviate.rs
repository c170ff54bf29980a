//! Weaviate REST client for tenant document collections.
//!
//! Collections are vectorized server-side with `text2vec-openai`; the
//! OpenAI key travels in the `X-OpenAI-Api-Key` header.

use std::collections::BTreeMap;

use {
    async_trait::async_trait,
    reqwest::{Client, RequestBuilder, StatusCode},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::json,
    tracing::{debug, info},
};

use crate::{
    ServiceError, ServiceResult,
    vector_store::{DocumentObject, VectorStore},
};

pub struct WeaviateStore {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
    openai_api_key: Secret<String>,
}

impl WeaviateStore {
    /// `url` may omit the scheme, as Weaviate Cloud cluster hosts usually do.
    pub fn new(url: &str, api_key: Secret<String>, openai_api_key: Secret<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(url),
            api_key,
            openai_api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .header("X-OpenAI-Api-Key", self.openai_api_key.expose_secret())
            .header("Accept", "application/json")
    }

    async fn collection_exists(&self, collection: &str) -> ServiceResult<bool> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/v1/schema/{collection}"))
            .send()
            .await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(ServiceError::upstream(
                    "schema lookup failed",
                    format!("HTTP {status}: {body}"),
                ))
            },
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn collection_schema(collection: &str, model: &str) -> serde_json::Value {
    let text = |name: &str, description: &str| {
        json!({ "name": name, "dataType": ["text"], "description": description })
    };
    json!({
        "class": collection,
        "vectorizer": "text2vec-openai",
        "moduleConfig": { "text2vec-openai": { "model": model } },
        "properties": [
            text("content", "Document content"),
            text("title", "Document title or heading"),
            text("filename", "Original filename"),
            text("metadata", "Additional metadata as JSON string"),
        ],
    })
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(default)]
    result: Option<BatchResult>,
}

#[derive(Deserialize)]
struct BatchResult {
    #[serde(default)]
    errors: Option<BatchErrors>,
}

#[derive(Deserialize)]
struct BatchErrors {
    #[serde(default)]
    error: Vec<BatchErrorMessage>,
}

#[derive(Deserialize)]
struct BatchErrorMessage {
    message: String,
}

#[async_trait]
impl VectorStore for WeaviateStore {
    async fn ensure_collection(&self, collection: &str, model: &str) -> ServiceResult<()> {
        if self.collection_exists(collection).await? {
            return Ok(());
        }
        let resp = self
            .request(reqwest::Method::POST, "/v1/schema")
            .json(&collection_schema(collection, model))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::upstream(
                "collection create failed",
                format!("HTTP {status}: {body}"),
            ));
        }
        info!(collection, model, "created vector collection");
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        objects: Vec<DocumentObject>,
    ) -> ServiceResult<BTreeMap<usize, String>> {
        let objects: Vec<_> = objects
            .into_iter()
            .map(|properties| json!({ "class": collection, "properties": properties }))
            .collect();
        debug!(collection, count = objects.len(), "batch inserting documents");

        let resp = self
            .request(reqwest::Method::POST, "/v1/batch/objects")
            .json(&json!({ "objects": objects }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::upstream(
                "batch insert failed",
                format!("HTTP {status}: {body}"),
            ));
        }

        let items: Vec<BatchItem> = resp.json().await?;
        let errors = items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let messages = item.result?.errors?.error;
                if messages.is_empty() {
                    return None;
                }
                let joined = messages
                    .into_iter()
                    .map(|m| m.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                Some((i, joined))
            })
            .collect();
        Ok(errors)
    }
}
