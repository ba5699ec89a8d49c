// Prompt templates for every insight operation.
// Placeholders in `{braces}` are filled by `fill_template` before sending; the
// shared output rules from llm_client::prompts are appended by `with_output_rules`.

/// Fills `{name}` placeholders in a single pass. Inserted values are never
/// rescanned, and braces that don't name a known placeholder are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let filled = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match filled {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Replace `{location}`.
pub const PROVIDER_SEARCH_PROMPT: &str = r#"Find 4 reputable home and auto insurance providers serving {location}.
Mix local agencies with digital-only carriers.

Return a JSON array with this EXACT item schema:
[
  {
    "name": "string",
    "address": "street address, or \"Online / Mobile App\" for digital-only carriers",
    "distance": "distance label such as \"1.2 mi\", or \"Online\" for digital-only carriers",
    "rating": 4.6,
    "trustScore": 92,
    "reviewSummary": "one or two sentences summarizing customer reviews",
    "advice": ["ordered tips for contacting this provider"],
    "badges": ["short labels such as \"Local Agent\" or \"Fast Claims\""]
  }
]

rating is 0 to 5. trustScore is an integer 0 to 100."#;

/// Replace `{address}`.
pub const PROPERTY_RISK_PROMPT: &str = r#"Assess the natural-hazard and liability risk for the property at {address}.

Return a JSON object with this EXACT schema:
{
  "riskScore": 0-100,
  "zones": [
    {"title": "Flood Zone", "description": "what the exposure is and why", "severity": "low" | "medium" | "high" | "critical"}
  ],
  "recommendation": "one paragraph of coverage advice for this property"
}

List between 2 and 5 zones, most severe first."#;

/// Replace `{niche}` and `{region}`.
pub const MARKET_DISCOVERY_PROMPT: &str = r#"List 5 notable companies or organizations in the {niche} insurance market in {region}.

Return a JSON array with this EXACT item schema:
[
  {
    "name": "string",
    "category": "carrier | broker | comparison site | regulator | association",
    "description": "one sentence on what they do for shoppers",
    "website": "https://..." or null,
    "relevanceScore": 0-100
  }
]

Order by relevanceScore, highest first."#;

/// Replace `{niche}`, `{city}` and `{locale}`.
pub const LANDING_COPY_PROMPT: &str = r#"Write landing-page copy for a page comparing {niche} insurance quotes for shoppers in {city}.
Write every string in the language of locale "{locale}".

Return a JSON object with this EXACT schema:
{
  "headline": "under 70 characters",
  "subheadline": "under 160 characters",
  "bodyParagraphs": ["2 or 3 short paragraphs"],
  "callToAction": "button label under 30 characters",
  "faq": [{"question": "string", "answer": "string"}]
}

Include 3 FAQ entries specific to {city}."#;

/// No placeholders: the policy document is attached inline.
pub const POLICY_ANALYSIS_PROMPT: &str = r#"The attached document is an insurance policy or declarations page.
Read it and explain it to the policyholder.

Return a JSON object with this EXACT schema:
{
  "currentPolicy": {"carrier": "string", "deductible": 1000, "premium": 1850},
  "exclusions": [
    {"clause": "quoted or paraphrased exclusion", "meaning": "plain-language meaning", "impact": "what it could cost the policyholder"}
  ],
  "recommendation": {"carrier": "a better-value alternative carrier", "premium": 1600, "savings": 250},
  "negotiationScript": "a short script the policyholder can read to their agent"
}

deductible, premium and savings are annual US dollar amounts as plain numbers.
If the document is not an insurance policy, still return the schema with your best reading."#;

/// Replace `{answers}` with one "- question: yes/no" line per answer.
pub const COVERAGE_GAPS_PROMPT: &str = r#"A homeowner answered a coverage checkup questionnaire:
{answers}

Identify the coverage gaps these answers reveal.

Return a JSON object with this EXACT schema:
{
  "riskScore": 0-100,
  "gapCount": number of items in "gaps",
  "gaps": [
    {"title": "string", "description": "why this is a gap", "remedy": "the endorsement or policy that closes it"}
  ]
}"#;

/// Replace `{age}`, `{zip_code}`, `{home_value}`, `{coverage_level}` and `{claims}`.
pub const PREMIUM_ESTIMATE_PROMPT: &str = r#"Estimate an annual homeowners insurance premium for:
- Homeowner age: {age}
- ZIP code: {zip_code}
- Home replacement value: ${home_value}
- Coverage level: {coverage_level}
- Claims in the last 5 years: {claims}

Return a JSON object with this EXACT schema:
{
  "total": 1850,
  "base": 1500,
  "marketTrend": 6.5,
  "factors": [
    {"name": "Coastal wind exposure", "amount": 320},
    {"name": "Claims-free discount", "amount": -90}
  ]
}

Amounts are annual US dollars. Factor amounts are signed adjustments to base.
marketTrend is the expected year-over-year premium change in percent."#;

/// Replace `{age}`, `{retirement_age}`, `{assets}`, `{contribution}`,
/// `{life_coverage}` and `{beneficiaries}`.
pub const LEGACY_PROJECTION_PROMPT: &str = r#"Project the estate a person will leave behind:
- Current age: {age}
- Planned retirement age: {retirement_age}
- Current investable assets: ${assets}
- Annual contribution until retirement: ${contribution}
- Existing life insurance coverage: ${life_coverage}
- Number of beneficiaries: {beneficiaries}

Assume moderate growth and typical end-of-life costs.

Return a JSON object with this EXACT schema:
{
  "projectedEstateValue": 1250000,
  "coverageShortfall": 150000,
  "milestones": [{"age": 65, "value": 900000}],
  "summary": "two or three sentences on the projection and how life insurance closes the shortfall"
}

coverageShortfall is 0 when no additional coverage is needed. List milestones in ascending age."#;
