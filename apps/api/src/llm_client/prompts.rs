// Shared prompt fragments.
// Each insight operation defines its own template in insights/prompts.rs;
// this file holds the instructions every template ends with.

/// Appended to every prompt. The gateway still strips fences defensively.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts whose output is shown to shoppers as factual guidance.
pub const CONSUMER_SAFETY_INSTRUCTION: &str = "\
    Write for a US insurance shopper in plain language. \
    Never promise coverage, approval, or a binding price. \
    Use realistic figures and omit anything you cannot estimate.";

/// Joins a task-specific body with the shared output rules.
pub fn with_output_rules(body: &str) -> String {
    format!("{body}\n\n{CONSUMER_SAFETY_INSTRUCTION}\n{JSON_ONLY_INSTRUCTION}")
}
