//! Property risk summary for a street address.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_non_empty, require_score, require_text, validate_each};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, PROPERTY_RISK_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM", alias = "moderate", alias = "Moderate")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Critical", alias = "CRITICAL", alias = "severe", alias = "Severe")]
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Validate for RiskZone {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRiskReport {
    pub risk_score: f64,
    pub zones: Vec<RiskZone>,
    pub recommendation: String,
}

impl Validate for PropertyRiskReport {
    fn validate(&self) -> Result<(), SchemaError> {
        require_score("riskScore", self.risk_score)?;
        require_non_empty("zones", &self.zones)?;
        validate_each("zones", &self.zones)?;
        require_text("recommendation", &self.recommendation)
    }
}

pub async fn check_property_risk(
    gateway: &Gateway,
    address: &str,
) -> Result<PropertyRiskReport, GatewayError> {
    let prompt =
        with_output_rules(&fill_template(PROPERTY_RISK_PROMPT, &[("address", address)]));
    gateway
        .execute(
            Operation::PropertyRisk,
            GenerationRequest::text(prompt),
            OnFailure::Fallback(fallback_property_risk()),
        )
        .await
}

/// Generic mid-range report that applies to most US addresses.
pub fn fallback_property_risk() -> PropertyRiskReport {
    PropertyRiskReport {
        risk_score: 50.0,
        zones: vec![
            RiskZone {
                title: "Severe Weather".to_string(),
                description: "Wind and hail claims are the most common homeowners losses \
                              nationwide."
                    .to_string(),
                severity: Severity::Medium,
            },
            RiskZone {
                title: "Water Damage".to_string(),
                description: "Burst pipes and appliance leaks are covered by most policies, \
                              but flood is not."
                    .to_string(),
                severity: Severity::Medium,
            },
            RiskZone {
                title: "Liability".to_string(),
                description: "Guest injuries on the property can exceed standard liability \
                              limits."
                    .to_string(),
                severity: Severity::Low,
            },
        ],
        recommendation: "Confirm your dwelling limit matches current rebuild costs, check \
                         whether flood insurance is required or advisable, and consider an \
                         umbrella policy for extra liability protection."
            .to_string(),
    }
}
