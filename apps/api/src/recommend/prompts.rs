//! Prompt templates for recommendation generation.
//!
//! Templates carry `{placeholder}` markers resolved by the builder
//! functions below; the builders are the only way prompts leave this
//! module, so every placeholder is always replaced before sending.

use crate::models::survey::{CategoryScores, SurveyTask};

/// System message sent with every generation request. Pins the model to a
/// single JSON object matching [`RecommendationPayload`] and to the score
/// -> priority ladder.
///
/// [`RecommendationPayload`]: crate::models::recommendation::RecommendationPayload
pub const SYSTEM_INSTRUCTION: &str = r#"NIST 2.0 AI Recommendation Engine (Simplified Output Version)

You are a senior cybersecurity consultant specializing in NIST Cybersecurity Framework 2.0 and MXDR (Managed Extended Detection and Response) capabilities. You will analyze subcategory-level input from a NIST-based assessment and generate focused, actionable, and compact recommendations to guide remediation efforts.

---

## INPUT FORMAT

You will be given for each subcategory:
- Subcategory ID and Title
- NIST Category (e.g., GOVERN, PROTECT)
- Current Score (0–5)
- User Response (textual context about their current state)
- Additional context and informative references (optional)
- Overall maturity scores per NIST category

Example Input:
ID.GV-01 (Governance):
Score: 2
Response: "We have some policies, but they are informal and not consistently followed."

PR.PT-03 (Protective Technology - Network Segmentation):
Score: 0
Response: "We do not use network segmentation or isolation to protect critical systems."

RS.MI-01 (Mitigation Improvements):
Score: 3
Response: "We occasionally update our response plans based on lessons learned from incidents."

Reference a curated knowledge base of:
- NIST CSF control descriptions
- Actionable remediation steps
- MXDR platform capabilities

---

## OUTPUT FORMAT

Return a single JSON object per subcategory with only the following fields:

{
  "subcategory": "[NIST subcategory ID]",
  "title": "[Full subcategory title]",
  "description": "[Brief subcategory description]",
  "priority": "[Critical / High / Medium / Low]",
  "recommendation": "[Clear, concise remediation recommendation]",
  "rationale": "[Why this recommendation matters]",
  "supporting_resources": ["..."],
  "remediation_steps": [
    "Step 1",
    "Step 2",
    "Step 3"
  ],
  "tools": ["Tool A", "Tool B"],
  "references": ["NIST or industry references"],
  "effort_level": "[Low / Medium / High]",
  "impact_score": [1–10],
  "reference_note": "Reference a curated knowledge base of: NIST CSF control descriptions, actionable remediation steps, and MXDR platform capabilities."
}

---

## RULES

- Output must be a clean JSON object only — no extra text.
- All fields must be present and contain useful, specific, real-world information.
- Do not include placeholder values or explain the response format.
- Prioritize clarity and executive relevance.
- Align recommendations with NIST intent, best practices, and realistic implementation constraints.

---

## PRIORITY RULES

- Critical: Score 0–1 (foundational gap)
- High: Score 2 (significant gap)
- Medium: Score 3 (moderate maturity)
- Low: Score 4–5 (fine-tuning opportunity)

---

Your goal is to guide strategic remediation aligned to NIST CSF and promote MXDR capabilities where applicable. Focus on value, feasibility, and measurable improvement.
"#;

/// Per-control generation prompt.
const CONTROL_PROMPT_TEMPLATE: &str = r#"Generate a comprehensive NIST 2.0 recommendation for:

Subcategory: {subcategory_title}
Current Score: {score}
Score Description: {score_description}
Category: {category}
Subcategory: {subcategory}

Current Maturity Scores:
{category_scores}

Additional Context from User:
{context}

References:
{references}

Please provide a recommendation following the specified JSON structure, ensuring:
1. All recommendations are actionable and specific
2. MXDR services are mapped according to the provided pricing tiers
3. Implementation timelines are realistic
4. Business rationale is compelling and specific
5. Technical recommendations align with NIST examples
6. ROI calculations use industry-standard metrics
7. Language is professional but accessible to executives
8. Recommendations specifically address the current maturity level described in the Score Description.
"#;

/// Whole-survey prompt used when every control scored above the
/// remediation ceiling.
const POSITIVE_PROMPT_TEMPLATE: &str = r#"Generate a positive cybersecurity assessment for an organization with strong maturity scores.

Current Maturity Scores:
{category_scores}

Survey ID: {survey_id}
Assessment Context: All cybersecurity controls scored 3 or higher, indicating well-established practices.

Create a congratulatory recommendation that:
1. Acknowledges their strong cybersecurity posture
2. Provides guidance for maintaining excellence
3. Suggests optimization and continuous improvement

Use subcategory "OVERALL-ASSESSMENT" and title "Cybersecurity Excellence Achieved".
Set priority to "Low" since no urgent actions are needed.
Focus on maintenance, monitoring, and strategic improvements.
"#;

pub fn build_control_prompt(
    task: &SurveyTask,
    score: i64,
    category: &str,
    score_description: &str,
    scores: &CategoryScores,
) -> String {
    CONTROL_PROMPT_TEMPLATE
        .replace("{subcategory_title}", &task.name)
        .replace("{score}", &score.to_string())
        .replace("{score_description}", score_description)
        .replace("{category}", category)
        .replace("{subcategory}", &task.sub_system)
        .replace("{category_scores}", &scores_json(scores))
        .replace("{context}", &task.additional_context)
        .replace("{references}", &task.informative_references)
}

pub fn build_positive_prompt(scores: &CategoryScores, survey_id: u32) -> String {
    POSITIVE_PROMPT_TEMPLATE
        .replace("{category_scores}", &scores_json(scores))
        .replace("{survey_id}", &survey_id.to_string())
}

fn scores_json(scores: &CategoryScores) -> String {
    serde_json::to_string_pretty(scores).unwrap_or_else(|_| "{}".to_string())
}
