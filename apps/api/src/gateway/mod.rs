//! Content Generation Gateway: prompt in, validated record out.
//!
//! Every insight operation funnels through `Gateway::execute`:
//! generate → strip fences → parse JSON → decode into `T` → `Validate` →
//! on any failure, apply the caller's `OnFailure` policy.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::llm_client::{strip_json_fences, GenerationRequest, GenerativeBackend, LlmError};

pub mod schema;

pub use schema::{SchemaError, Validate};

// ────────────────────────────────────────────────────────────────────────────
// Operation catalog
// ────────────────────────────────────────────────────────────────────────────

/// What happens to a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Serve a static record shaped like the success schema.
    Fallback,
    /// Return the error to the caller.
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ProviderSearch,
    PropertyRisk,
    MarketDiscovery,
    LandingCopy,
    PolicyAnalysis,
    CoverageGaps,
    PremiumEstimate,
    LegacyProjection,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ProviderSearch,
        Operation::PropertyRisk,
        Operation::MarketDiscovery,
        Operation::LandingCopy,
        Operation::PolicyAnalysis,
        Operation::CoverageGaps,
        Operation::PremiumEstimate,
        Operation::LegacyProjection,
    ];

    /// Discovery-class operations degrade to static content; everything that
    /// describes the caller's own document or numbers must fail loudly.
    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            Operation::ProviderSearch
            | Operation::PropertyRisk
            | Operation::MarketDiscovery
            | Operation::LandingCopy => FailurePolicy::Fallback,
            Operation::PolicyAnalysis
            | Operation::CoverageGaps
            | Operation::PremiumEstimate
            | Operation::LegacyProjection => FailurePolicy::Propagate,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::ProviderSearch => "provider_search",
            Operation::PropertyRisk => "property_risk",
            Operation::MarketDiscovery => "market_discovery",
            Operation::LandingCopy => "landing_copy",
            Operation::PolicyAnalysis => "policy_analysis",
            Operation::CoverageGaps => "coverage_gaps",
            Operation::PremiumEstimate => "premium_estimate",
            Operation::LegacyProjection => "legacy_projection",
        }
    }
}

/// The failure policy for one call, carrying the fallback record when there is one.
#[derive(Debug)]
pub enum OnFailure<T> {
    Fallback(T),
    Propagate,
}

impl<T> OnFailure<T> {
    pub fn policy(&self) -> FailurePolicy {
        match self {
            OnFailure::Fallback(_) => FailurePolicy::Fallback,
            OnFailure::Propagate => FailurePolicy::Propagate,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream model call failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("model response is not valid JSON: {0}")]
    Format(#[source] serde_json::Error),

    #[error("model response has the wrong shape: {0}")]
    Schema(#[from] SchemaError),
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway
// ────────────────────────────────────────────────────────────────────────────

/// Built once at startup around the injected backend and shared via `AppState`.
#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn GenerativeBackend>,
}

impl Gateway {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Runs one operation end to end.
    ///
    /// `on_failure` must agree with `operation.failure_policy()`; the catalog is
    /// the single documented source of each operation's behavior.
    pub async fn execute<T>(
        &self,
        operation: Operation,
        request: GenerationRequest,
        on_failure: OnFailure<T>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Validate + Send,
    {
        debug_assert_eq!(
            on_failure.policy(),
            operation.failure_policy(),
            "call site disagrees with the catalog for {}",
            operation.name()
        );

        let span = info_span!(
            "gateway",
            operation = operation.name(),
            call_id = %Uuid::new_v4()
        );

        async move {
            let outcome = match self.backend.generate(&request).await {
                Ok(text) => decode::<T>(&text),
                Err(e) => Err(GatewayError::from(e)),
            };

            match (outcome, on_failure) {
                (Ok(record), _) => {
                    info!("model response decoded");
                    Ok(record)
                }
                (Err(e), OnFailure::Fallback(record)) => {
                    warn!(error = %e, "serving fallback record");
                    Ok(record)
                }
                (Err(e), OnFailure::Propagate) => {
                    warn!(error = %e, "propagating gateway failure");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Strips fences, parses JSON, decodes into `T` and validates it.
///
/// Unparseable text is a `Format` error; JSON that does not fit `T` is a
/// `Schema` error rooted at `$`.
pub fn decode<T>(raw: &str) -> Result<T, GatewayError>
where
    T: DeserializeOwned + Validate,
{
    let value: Value = serde_json::from_str(strip_json_fences(raw)).map_err(GatewayError::Format)?;
    let record: T =
        serde_json::from_value(value).map_err(|e| SchemaError::new("$", e.to_string()))?;
    record.validate()?;
    Ok(record)
}
