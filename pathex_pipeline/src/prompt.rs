//! Instruction prompt for single-field model queries.

use pathex_core::NOT_MENTIONED;

/// Build the fixed instruction prompt asking for one field's value.
#[must_use]
pub fn build_prompt(field_name: &str, report: &str) -> String {
    format!(
        "You are a medical summarizer. Extract the value for the field below from the pathology report.

Field: {field_name}

Rules:
- Return only the value.
- If not found, return: {NOT_MENTIONED}.
- DO NOT explain or justify.
- DO NOT include Based on the pathology reports provided or something similar.
- DO NOT include any extra text or context.
- Keep the response concise, ideally under 120 characters.

Report:
{report}
"
    )
}
