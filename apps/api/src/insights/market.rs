//! Market-entity discovery for a niche and region.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_score, require_text};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, MARKET_DISCOVERY_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntity {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    pub relevance_score: f64,
}

impl Validate for MarketEntity {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        if let Some(site) = &self.website {
            if !(site.starts_with("https://") || site.starts_with("http://")) {
                return Err(SchemaError::new("website", "must be an http(s) URL"));
            }
        }
        require_score("relevanceScore", self.relevance_score)
    }
}

pub async fn discover_market_entities(
    gateway: &Gateway,
    niche: &str,
    region: &str,
) -> Result<Vec<MarketEntity>, GatewayError> {
    let prompt = with_output_rules(
        &fill_template(MARKET_DISCOVERY_PROMPT, &[("niche", niche), ("region", region)]),
    );
    gateway
        .execute(
            Operation::MarketDiscovery,
            GenerationRequest::text(prompt),
            OnFailure::Fallback(fallback_market_entities(niche)),
        )
        .await
}

pub fn fallback_market_entities(niche: &str) -> Vec<MarketEntity> {
    vec![
        MarketEntity {
            name: "National Association of Insurance Commissioners".to_string(),
            category: "regulator".to_string(),
            description: format!(
                "Publishes complaint data you can use to vet {niche} insurers."
            ),
            website: Some("https://content.naic.org".to_string()),
            relevance_score: 90.0,
        },
        MarketEntity {
            name: "Insurance Information Institute".to_string(),
            category: "association".to_string(),
            description: format!("Plain-language guides to {niche} coverage and pricing."),
            website: Some("https://www.iii.org".to_string()),
            relevance_score: 85.0,
        },
        MarketEntity {
            name: "AM Best".to_string(),
            category: "rating agency".to_string(),
            description: "Financial-strength ratings that show whether a carrier can pay \
                          claims."
                .to_string(),
            website: Some("https://web.ambest.com".to_string()),
            relevance_score: 80.0,
        },
        MarketEntity {
            name: "Independent Insurance Agents & Brokers of America".to_string(),
            category: "association".to_string(),
            description: format!(
                "Directory of independent agents who can quote {niche} policies from \
                 several carriers."
            ),
            website: Some("https://www.independentagent.com".to_string()),
            relevance_score: 75.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::LlmError;

    #[tokio::test]
    async fn test_decodes_entities_with_null_website() {
        let backend = Arc::new(ScriptedBackend::replying(
            r#"[
                {"name": "Pet Shield", "category": "carrier", "description": "Accident and illness plans.",
                 "website": null, "relevanceScore": 88},
                {"name": "Paws Compare", "category": "comparison site", "description": "Side-by-side quotes.",
                 "website": "https://example.com", "relevanceScore": 70, "rank": 2}
            ]"#,
        ));
        let gateway = Gateway::new(backend.clone());

        let entities = discover_market_entities(&gateway, "pet", "Texas")
            .await
            .unwrap();

        assert_eq!(entities.len(), 2);
        assert!(entities[0].website.is_none());
        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains("pet insurance market in Texas"));
    }

    #[tokio::test]
    async fn test_empty_list_serves_fallback() {
        let backend = Arc::new(ScriptedBackend::replying("[]"));
        let entities = discover_market_entities(&Gateway::new(backend), "flood", "Louisiana")
            .await
            .unwrap();
        assert_eq!(entities, fallback_market_entities("flood"));
    }

    #[tokio::test]
    async fn test_failure_serves_fallback_mentioning_niche() {
        let backend = Arc::new(ScriptedBackend::failing(LlmError::MissingApiKey));
        let entities = discover_market_entities(&Gateway::new(backend), "boat", "Florida")
            .await
            .unwrap();
        assert!(entities.iter().any(|e| e.description.contains("boat")));
        assert!(entities.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_url_website() {
        let mut entity = fallback_market_entities("home").remove(0);
        entity.website = Some("naic.org".to_string());
        let err = entity.validate().unwrap_err();
        assert_eq!(err.field, "website");
    }
}
