//! Premium estimate from a numeric home profile.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_amount, require_finite, require_range, require_text, validate_each};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, PREMIUM_ESTIMATE_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    Basic,
    Standard,
    Premium,
}

impl CoverageLevel {
    fn as_str(self) -> &'static str {
        match self {
            CoverageLevel::Basic => "basic",
            CoverageLevel::Standard => "standard",
            CoverageLevel::Premium => "premium",
        }
    }
}

/// Caller-supplied profile for a homeowners estimate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumProfile {
    pub age: u32,
    pub zip_code: String,
    pub home_value: f64,
    pub coverage_level: CoverageLevel,
    #[serde(default)]
    pub claims_last_five_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumFactor {
    pub name: String,
    /// Signed adjustment to the base premium, USD.
    pub amount: f64,
}

impl Validate for PremiumFactor {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("name", &self.name)?;
        require_finite("amount", self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumEstimate {
    pub total: f64,
    pub base: f64,
    /// Expected year-over-year change, percent.
    pub market_trend: f64,
    #[serde(default)]
    pub factors: Vec<PremiumFactor>,
}

impl Validate for PremiumEstimate {
    fn validate(&self) -> Result<(), SchemaError> {
        require_amount("total", self.total)?;
        require_amount("base", self.base)?;
        require_range("marketTrend", self.market_trend, -100.0, 100.0)?;
        validate_each("factors", &self.factors)
    }
}

pub async fn estimate_premium(
    gateway: &Gateway,
    profile: &PremiumProfile,
) -> Result<PremiumEstimate, GatewayError> {
    let prompt = with_output_rules(
        &fill_template(
            PREMIUM_ESTIMATE_PROMPT,
            &[
                ("age", profile.age.to_string().as_str()),
                ("zip_code", profile.zip_code.as_str()),
                ("home_value", format!("{:.0}", profile.home_value).as_str()),
                ("coverage_level", profile.coverage_level.as_str()),
                ("claims", profile.claims_last_five_years.to_string().as_str()),
            ],
        ),
    );
    gateway
        .execute(
            Operation::PremiumEstimate,
            GenerationRequest::text(prompt),
            OnFailure::Propagate,
        )
        .await
}
