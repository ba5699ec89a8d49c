//! Coverage-gap analysis from a yes/no questionnaire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{require_score, require_text, validate_each};
use crate::gateway::{Gateway, GatewayError, OnFailure, Operation, SchemaError, Validate};
use crate::insights::prompts::{fill_template, COVERAGE_GAPS_PROMPT};
use crate::llm_client::prompts::with_output_rules;
use crate::llm_client::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub title: String,
    pub description: String,
    pub remedy: String,
}

impl Validate for CoverageGap {
    fn validate(&self) -> Result<(), SchemaError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("remedy", &self.remedy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGapReport {
    pub risk_score: f64,
    pub gap_count: u32,
    pub gaps: Vec<CoverageGap>,
}

impl Validate for CoverageGapReport {
    fn validate(&self) -> Result<(), SchemaError> {
        require_score("riskScore", self.risk_score)?;
        if self.gap_count as usize != self.gaps.len() {
            return Err(SchemaError::new(
                "gapCount",
                format!(
                    "is {} but {} gaps were listed",
                    self.gap_count,
                    self.gaps.len()
                ),
            ));
        }
        validate_each("gaps", &self.gaps)
    }
}

pub async fn analyze_coverage_gaps(
    gateway: &Gateway,
    answers: &BTreeMap<String, bool>,
) -> Result<CoverageGapReport, GatewayError> {
    let prompt = with_output_rules(
        &fill_template(
            COVERAGE_GAPS_PROMPT,
            &[("answers", format_answers(answers).as_str())],
        ),
    );
    gateway
        .execute(
            Operation::CoverageGaps,
            GenerationRequest::text(prompt),
            OnFailure::Propagate,
        )
        .await
}

/// One "- question: yes/no" line per answer, in question order.
fn format_answers(answers: &BTreeMap<String, bool>) -> String {
    answers
        .iter()
        .map(|(question, yes)| format!("- {question}: {}", if *yes { "yes" } else { "no" }))
        .collect::<Vec<_>>()
        .join("\n")
}
