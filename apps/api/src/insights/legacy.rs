//! Legacy (estate) projection from a numeric profile.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_amount, require_text, validate_each};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, LEGACY_PROJECTION_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

/// Caller-supplied profile for an estate projection. Amounts in USD.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProfile {
    pub age: u32,
    pub retirement_age: u32,
    pub current_assets: f64,
    pub annual_contribution: f64,
    #[serde(default)]
    pub life_coverage: f64,
    #[serde(default = "default_beneficiaries")]
    pub beneficiaries: u32,
}

fn default_beneficiaries() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub age: u32,
    pub value: f64,
}

impl Validate for Milestone {
    fn validate(&self) -> Result<(), SchemaError> {
        require_amount("value", self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProjection {
    pub projected_estate_value: f64,
    pub coverage_shortfall: f64,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub summary: String,
}

impl Validate for LegacyProjection {
    fn validate(&self) -> Result<(), SchemaError> {
        require_amount("projectedEstateValue", self.projected_estate_value)?;
        require_amount("coverageShortfall", self.coverage_shortfall)?;
        validate_each("milestones", &self.milestones)?;
        if let Some(i) = self
            .milestones
            .windows(2)
            .position(|pair| pair[1].age < pair[0].age)
        {
            return Err(SchemaError::new(
                format!("milestones[{}].age", i + 1),
                "must not be lower than the previous milestone",
            ));
        }
        require_text("summary", &self.summary)
    }
}

pub async fn project_legacy(
    gateway: &Gateway,
    profile: &LegacyProfile,
) -> Result<LegacyProjection, GatewayError> {
    let prompt = with_output_rules(
        &fill_template(
            LEGACY_PROJECTION_PROMPT,
            &[
                ("age", profile.age.to_string().as_str()),
                ("retirement_age", profile.retirement_age.to_string().as_str()),
                ("assets", format!("{:.0}", profile.current_assets).as_str()),
                ("contribution", format!("{:.0}", profile.annual_contribution).as_str()),
                ("life_coverage", format!("{:.0}", profile.life_coverage).as_str()),
                ("beneficiaries", profile.beneficiaries.to_string().as_str()),
            ],
        ),
    );
    gateway
        .execute(
            Operation::LegacyProjection,
            GenerationRequest::text(prompt),
            OnFailure::Propagate,
        )
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::LlmError;

    fn profile() -> LegacyProfile {
        LegacyProfile {
            age: 45,
            retirement_age: 65,
            current_assets: 310_000.0,
            annual_contribution: 18_000.0,
            life_coverage: 500_000.0,
            beneficiaries: 2,
        }
    }

    #[tokio::test]
    async fn test_decodes_projection() {
        let backend = Arc::new(ScriptedBackend::replying(
            r#"{"projectedEstateValue": 1480000, "coverageShortfall": 0,
                "milestones": [{"age": 55, "value": 720000}, {"age": 65, "value": 1210000}],
                "summary": "Existing coverage is sufficient."}"#,
        ));
        let gateway = Gateway::new(backend.clone());

        let projection = project_legacy(&gateway, &profile()).await.unwrap();

        assert_eq!(projection.milestones.len(), 2);
        assert_eq!(projection.coverage_shortfall, 0.0);
        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains("Current investable assets: $310000"));
        assert!(prompt.contains("Number of beneficiaries: 2"));
    }

    #[tokio::test]
    async fn test_out_of_order_milestones_are_rejected() {
        let backend = Arc::new(ScriptedBackend::replying(
            r#"{"projectedEstateValue": 1, "coverageShortfall": 0,
                "milestones": [{"age": 65, "value": 10}, {"age": 55, "value": 5}],
                "summary": "x"}"#,
        ));
        let err = project_legacy(&Gateway::new(backend), &profile())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Schema(ref e) if e.field == "milestones[1].age"));
    }

    #[tokio::test]
    async fn test_forced_failure_is_detectable_error() {
        let backend = Arc::new(ScriptedBackend::failing(LlmError::EmptyContent));
        let result = project_legacy(&Gateway::new(backend), &profile()).await;
        assert!(matches!(
            result,
            Err(GatewayError::Upstream(LlmError::EmptyContent))
        ));
    }

    #[test]
    fn test_profile_defaults() {
        let profile: LegacyProfile = serde_json::from_str(
            r#"{"age": 50, "retirementAge": 67, "currentAssets": 1000, "annualContribution": 0}"#,
        )
        .unwrap();
        assert_eq!(profile.beneficiaries, 1);
        assert_eq!(profile.life_coverage, 0.0);
    }
}
