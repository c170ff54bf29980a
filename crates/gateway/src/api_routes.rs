//! Collaborator endpoints used by the wizard views and the demo page.

use {
    axum::{
        Json,
        body::Bytes,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::json,
    voira_services::{call::CallRequest, ingest::IngestRequest, phone::PhoneRequest},
};

use crate::{error::ApiError, state::GatewayState};

/// Parse a JSON body; an empty body reads as the type's default.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}")))
}

pub async fn allocate_phone(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: PhoneRequest = parse_body(&body)?;
    let allocation = state
        .services
        .phone
        .allocate(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to allocate phone numbers"))?;
    Ok(Json(allocation).into_response())
}

#[derive(Default, Deserialize)]
struct ScrapeRequest {
    #[serde(default)]
    url: String,
}

pub async fn scrape_website(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ScrapeRequest = parse_body(&body)?;
    let data = state
        .services
        .scraper
        .scrape(&request.url)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to scrape website"))?;
    Ok(Json(json!({
        "success": true,
        "data": data,
        "message": "Website scraped successfully",
    }))
    .into_response())
}

pub async fn trigger_call(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: CallRequest = parse_body(&body)?;
    let receipt = state
        .services
        .calls
        .trigger(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to trigger call"))?;
    Ok(Json(receipt).into_response())
}

/// 200 when every document landed, 207 when some failed.
pub async fn ingest(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: IngestRequest = parse_body(&body)?;
    let report = state
        .services
        .ingest
        .ingest(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to ingest documents"))?;

    if report.is_partial() {
        return Ok((
            StatusCode::MULTI_STATUS,
            Json(json!({
                "success": true,
                "message": "Documents ingested with some errors",
                "inserted": report.inserted,
                "total": report.total,
                "errors": report.errors,
            })),
        )
            .into_response());
    }
    Ok(Json(json!({
        "success": true,
        "message": "Documents ingested successfully",
        "inserted": report.inserted,
        "skipped": report.skipped,
        "collectionName": report.collection,
    }))
    .into_response())
}
