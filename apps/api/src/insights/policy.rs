//! Policy-document analysis.
//!
//! There is no generic answer to "what does this uploaded document say", so
//! every failure propagates and the caller asks for a clearer PDF or image.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_amount, require_finite, require_text, validate_each, validate_nested};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::POLICY_ANALYSIS_PROMPT;
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::{DocumentPayload, GenerationRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPolicy {
    pub carrier: String,
    pub deductible: f64,
    /// Annual premium in USD.
    pub premium: f64,
}

impl Validate for CurrentPolicy {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("carrier", &self.carrier)?;
        require_amount("deductible", self.deductible)?;
        require_amount("premium", self.premium)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionFinding {
    pub clause: String,
    pub meaning: String,
    pub impact: String,
}

impl Validate for ExclusionFinding {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("clause", &self.clause)?;
        require_text("meaning", &self.meaning)?;
        require_text("impact", &self.impact)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAlternative {
    pub carrier: String,
    pub premium: f64,
    /// May be negative when the alternative costs more but covers more.
    pub savings: f64,
}

impl Validate for RecommendedAlternative {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("carrier", &self.carrier)?;
        require_amount("premium", self.premium)?;
        require_finite("savings", self.savings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAnalysis {
    pub current_policy: CurrentPolicy,
    #[serde(default)]
    pub exclusions: Vec<ExclusionFinding>,
    pub recommendation: RecommendedAlternative,
    pub negotiation_script: String,
}

impl Validate for PolicyAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        validate_nested("currentPolicy", &self.current_policy)?;
        validate_each("exclusions", &self.exclusions)?;
        validate_nested("recommendation", &self.recommendation)?;
        require_text("negotiationScript", &self.negotiation_script)
    }
}

pub async fn analyze_policy_document(
    gateway: &Gateway,
    document: DocumentPayload,
) -> Result<PolicyAnalysis, GatewayError> {
    let request =
        GenerationRequest::text(with_output_rules(POLICY_ANALYSIS_PROMPT)).with_document(document);
    gateway
        .execute(Operation::PolicyAnalysis, request, OnFailure::Propagate)
        .await
}
