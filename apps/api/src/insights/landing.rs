//! Localized landing-page copy.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_non_empty, require_text, validate_each};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, LANDING_COPY_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl Validate for FaqEntry {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("question", &self.question)?;
        require_text("answer", &self.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingCopy {
    pub headline: String,
    pub subheadline: String,
    pub body_paragraphs: Vec<String>,
    pub call_to_action: String,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

impl Validate for LandingCopy {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("headline", &self.headline)?;
        require_text("subheadline", &self.subheadline)?;
        require_non_empty("bodyParagraphs", &self.body_paragraphs)?;
        for (i, paragraph) in self.body_paragraphs.iter().enumerate() {
            require_text(&format!("bodyParagraphs[{i}]"), paragraph)?;
        }
        require_text("callToAction", &self.call_to_action)?;
        validate_each("faq", &self.faq)
    }
}

/// Parameters for one landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct LandingPageRequest {
    pub niche: String,
    pub city: String,
    /// BCP 47 tag such as "en-US" or "es-MX".
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en-US".to_string()
}

pub async fn generate_landing_copy(
    gateway: &Gateway,
    request: &LandingPageRequest,
) -> Result<LandingCopy, GatewayError> {
    let prompt = with_output_rules(
        &fill_template(
            LANDING_COPY_PROMPT,
            &[
                ("niche", request.niche.as_str()),
                ("city", request.city.as_str()),
                ("locale", request.locale.as_str()),
            ],
        ),
    );
    gateway
        .execute(
            Operation::LandingCopy,
            GenerationRequest::text(prompt),
            OnFailure::Fallback(fallback_landing_copy(&request.niche, &request.city)),
        )
        .await
}

/// English copy templated on niche and city. Untranslated: the locale is ignored.
pub fn fallback_landing_copy(niche: &str, city: &str) -> LandingCopy {
    LandingCopy {
        headline: format!("Compare {niche} insurance in {city}"),
        subheadline: format!(
            "See rates from top-rated carriers serving {city} and find coverage that fits \
             your budget."
        ),
        body_paragraphs: vec![
            format!(
                "Prices for {niche} insurance in {city} can vary by hundreds of dollars for \
                 the same coverage. Comparing several quotes is the fastest way to save."
            ),
            "Check each carrier's financial-strength rating and complaint record before you \
             buy, not just the price."
                .to_string(),
        ],
        call_to_action: "Compare quotes".to_string(),
        faq: vec![
            FaqEntry {
                question: format!("How much is {niche} insurance in {city}?"),
                answer: "It depends on your coverage limits, deductible and history. Compare \
                         at least three quotes to see the local range."
                    .to_string(),
            },
            FaqEntry {
                question: "Can I switch insurers mid-policy?".to_string(),
                answer: "Yes. Most carriers refund the unused premium when you cancel."
                    .to_string(),
            },
        ],
    }
}
