// Insight operations: one prompt template, one record type and one failure
// policy each. All model calls go through gateway::Gateway, never
// llm_client directly.

pub mod coverage_gaps;
pub mod handlers;
pub mod landing;
pub mod legacy;
pub mod market;
pub mod policy;
pub mod premium;
pub mod prompts;
pub mod property_risk;
pub mod providers;
