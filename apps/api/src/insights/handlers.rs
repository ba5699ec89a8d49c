//! Axum route handlers for the Insights API.

use std::collections::BTreeMap;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::gateway::{FailurePolicy, Operation};
use crate::insights::coverage_gaps::{analyze_coverage_gaps, CoverageGapReport};
use crate::insights::landing::{generate_landing_copy, LandingCopy, LandingPageRequest};
use crate::insights::legacy::{project_legacy, LegacyProfile, LegacyProjection};
use crate::insights::market::{discover_market_entities, MarketEntity};
use crate::insights::policy::{analyze_policy_document, PolicyAnalysis};
use crate::insights::premium::{estimate_premium, PremiumEstimate, PremiumProfile};
use crate::insights::property_risk::{check_property_risk, PropertyRiskReport};
use crate::insights::providers::{search_providers_by_location, ProviderMatch};
use crate::llm_client::DocumentPayload;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProviderSearchRequest {
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct PropertyRiskRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketDiscoveryRequest {
    pub niche: String,
    pub region: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverageGapsRequest {
    pub answers: BTreeMap<String, bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub operation: Operation,
    pub failure_policy: FailurePolicy,
}

fn require_field(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(())
}

fn require_amount_input(name: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{name} must be a non-negative number"
        )));
    }
    Ok(())
}

fn require_age(name: &str, value: u32) -> Result<(), AppError> {
    if !(18..=120).contains(&value) {
        return Err(AppError::Validation(format!(
            "{name} must be between 18 and 120"
        )));
    }
    Ok(())
}

/// Body-limit rejections surface from whichever multipart read hits the cap.
fn upload_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        err.into()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/insights/operations
///
/// Lists every operation with what it does on upstream failure.
pub async fn handle_list_operations() -> Json<Vec<OperationInfo>> {
    Json(
        Operation::ALL
            .iter()
            .map(|&operation| OperationInfo {
                operation,
                failure_policy: operation.failure_policy(),
            })
            .collect(),
    )
}

/// POST /api/v1/insights/providers
pub async fn handle_search_providers(
    State(state): State<AppState>,
    Json(request): Json<ProviderSearchRequest>,
) -> Result<Json<Vec<ProviderMatch>>, AppError> {
    require_field("location", &request.location)?;
    let providers = search_providers_by_location(&state.gateway, request.location.trim()).await?;
    Ok(Json(providers))
}

/// POST /api/v1/insights/property-risk
pub async fn handle_property_risk(
    State(state): State<AppState>,
    Json(request): Json<PropertyRiskRequest>,
) -> Result<Json<PropertyRiskReport>, AppError> {
    require_field("address", &request.address)?;
    let report = check_property_risk(&state.gateway, request.address.trim()).await?;
    Ok(Json(report))
}

/// POST /api/v1/insights/market-entities
pub async fn handle_market_entities(
    State(state): State<AppState>,
    Json(request): Json<MarketDiscoveryRequest>,
) -> Result<Json<Vec<MarketEntity>>, AppError> {
    require_field("niche", &request.niche)?;
    require_field("region", &request.region)?;
    let entities =
        discover_market_entities(&state.gateway, request.niche.trim(), request.region.trim())
            .await?;
    Ok(Json(entities))
}

/// POST /api/v1/insights/landing-copy
pub async fn handle_landing_copy(
    State(state): State<AppState>,
    Json(request): Json<LandingPageRequest>,
) -> Result<Json<LandingCopy>, AppError> {
    require_field("niche", &request.niche)?;
    require_field("city", &request.city)?;
    require_field("locale", &request.locale)?;
    let copy = generate_landing_copy(&state.gateway, &request).await?;
    Ok(Json(copy))
}

/// POST /api/v1/insights/policy-analysis
///
/// Multipart upload. Accepts either a `file` part (raw bytes with a content type)
/// or a `dataUrl` text part (`data:<mime>;base64,...`) as produced by a browser
/// FileReader.
pub async fn handle_policy_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PolicyAnalysis>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(e, limit))?;
                document = Some(DocumentPayload::from_bytes(&mime_type, &bytes)?);
            }
            Some("dataUrl") => {
                let text = field.text().await.map_err(|e| upload_error(e, limit))?;
                document = Some(DocumentPayload::from_data_url(&text)?);
            }
            _ => {}
        }
    }

    let document = document.ok_or_else(|| {
        AppError::Validation("Upload a policy document in the 'file' field".to_string())
    })?;

    tracing::info!("Analyzing uploaded {} document", document.mime_type());
    let analysis = analyze_policy_document(&state.gateway, document).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/insights/coverage-gaps
pub async fn handle_coverage_gaps(
    State(state): State<AppState>,
    Json(request): Json<CoverageGapsRequest>,
) -> Result<Json<CoverageGapReport>, AppError> {
    if request.answers.is_empty() {
        return Err(AppError::Validation("answers cannot be empty".to_string()));
    }
    for question in request.answers.keys() {
        require_field("answers question", question)?;
    }
    let report = analyze_coverage_gaps(&state.gateway, &request.answers).await?;
    Ok(Json(report))
}

/// POST /api/v1/insights/premium-estimate
pub async fn handle_premium_estimate(
    State(state): State<AppState>,
    Json(profile): Json<PremiumProfile>,
) -> Result<Json<PremiumEstimate>, AppError> {
    require_age("age", profile.age)?;
    require_field("zipCode", &profile.zip_code)?;
    require_amount_input("homeValue", profile.home_value)?;
    let estimate = estimate_premium(&state.gateway, &profile).await?;
    Ok(Json(estimate))
}

/// POST /api/v1/insights/legacy-projection
pub async fn handle_legacy_projection(
    State(state): State<AppState>,
    Json(profile): Json<LegacyProfile>,
) -> Result<Json<LegacyProjection>, AppError> {
    require_age("age", profile.age)?;
    require_age("retirementAge", profile.retirement_age)?;
    if profile.retirement_age < profile.age {
        return Err(AppError::Validation(
            "retirementAge cannot be before age".to_string(),
        ));
    }
    require_amount_input("currentAssets", profile.current_assets)?;
    require_amount_input("annualContribution", profile.annual_contribution)?;
    require_amount_input("lifeCoverage", profile.life_coverage)?;
    let projection = project_legacy(&state.gateway, &profile).await?;
    Ok(Json(projection))
}
