//! Location-based provider search.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_range, require_score, require_text};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, PROVIDER_SEARCH_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

/// Distance label the fallback uses for carriers with no physical office.
pub const DIGITAL_DISTANCE: &str = "Online";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMatch {
    pub name: String,
    pub address: String,
    pub distance: String,
    /// 0 – 5
    pub rating: f64,
    /// 0 – 100
    pub trust_score: f64,
    pub review_summary: String,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub badges: BTreeSet<String>,
}

impl ProviderMatch {
    #[cfg(test)]
    pub fn is_digital(&self) -> bool {
        self.distance == DIGITAL_DISTANCE
    }
}

impl Validate for ProviderMatch {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)?;
        require_text("distance", &self.distance)?;
        require_range("rating", self.rating, 0.0, 5.0)?;
        require_score("trustScore", self.trust_score)?;
        require_text("reviewSummary", &self.review_summary)
    }
}

pub async fn search_providers_by_location(
    gateway: &Gateway,
    location: &str,
) -> Result<Vec<ProviderMatch>, GatewayError> {
    let prompt =
        with_output_rules(&fill_template(PROVIDER_SEARCH_PROMPT, &[("location", location)]));
    gateway
        .execute(
            Operation::ProviderSearch,
            GenerationRequest::text(prompt),
            OnFailure::Fallback(fallback_providers(location)),
        )
        .await
}

/// Static stand-in list. Local entries are placed "Near {location}".
pub fn fallback_providers(location: &str) -> Vec<ProviderMatch> {
    let near = format!("Near {location}");
    vec![
        ProviderMatch {
            name: "State Farm Neighborhood Agent".to_string(),
            address: near.clone(),
            distance: "1.4 mi".to_string(),
            rating: 4.6,
            trust_score: 94.0,
            review_summary: "Customers praise the responsive local office and quick claim \
                             follow-up after storms."
                .to_string(),
            advice: vec![
                "Ask about bundling home and auto.".to_string(),
                "Request a claims-free discount review.".to_string(),
            ],
            badges: badges(&["Local Agent", "Bundle Discounts"]),
        },
        ProviderMatch {
            name: "Lemonade".to_string(),
            address: "Online / Mobile App".to_string(),
            distance: DIGITAL_DISTANCE.to_string(),
            rating: 4.8,
            trust_score: 89.0,
            review_summary: "Fast app-based quotes and instant payouts for simple claims."
                .to_string(),
            advice: vec!["Compare the deductible options before binding.".to_string()],
            badges: badges(&["Digital", "Instant Quotes"]),
        },
        ProviderMatch {
            name: "Allstate Exclusive Agency".to_string(),
            address: near,
            distance: "2.9 mi".to_string(),
            rating: 4.3,
            trust_score: 88.0,
            review_summary: "Broad coverage options; some reviewers note premium increases at \
                             renewal."
                .to_string(),
            advice: vec![
                "Ask for the new-roof and safety-device credits.".to_string(),
                "Re-shop at renewal if the premium jumps.".to_string(),
            ],
            badges: badges(&["Local Agent", "24/7 Claims"]),
        },
        ProviderMatch {
            name: "Root Insurance".to_string(),
            address: "Online / Mobile App".to_string(),
            distance: DIGITAL_DISTANCE.to_string(),
            rating: 4.2,
            trust_score: 81.0,
            review_summary: "Usage-based pricing rewards safe drivers; home coverage is \
                             available in fewer states."
                .to_string(),
            advice: vec!["Check state availability for home policies.".to_string()],
            badges: badges(&["Digital", "Usage-Based"]),
        },
    ]
}

fn badges(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|l| l.to_string()).collect()
}
