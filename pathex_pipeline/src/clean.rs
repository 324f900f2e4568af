//! Normalization of raw model replies.
//!
//! Models ignore instructions often enough that replies get scrubbed before
//! use: only the first line counts, leading explanations are stripped, and
//! anything that is left over filler becomes the sentinel.

use once_cell::sync::Lazy;
use regex::Regex;

use pathex_core::NOT_MENTIONED;

/// Leading phrases removed from a reply, applied repeatedly until none
/// matches.
#[expect(clippy::expect_used, reason = "literal patterns are covered by tests")]
static PREAMBLES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        // "Based on the report, ..." keeps what follows the separator;
        // with no separator the whole reply is explanation.
        Regex::new(r"(?i)^based on\b(?:[^,:]*[,:]\s*|.*$)").expect("valid preamble regex"),
        Regex::new(r"(?i)^the value for\b.*?\b(?:is|are)\b\s*[:\-]?\s*")
            .expect("valid preamble regex"),
    ]
});

/// Replies that carry no value once the preamble is gone.
const FILLER: &[&str] = &["is", "are", ":", "-", "the", "value"];

/// First line of a reply, after trimming the whole reply.
#[must_use]
pub fn first_line(content: &str) -> &str {
    content.trim().lines().next().unwrap_or("").trim()
}

/// Strip leading explanatory phrases.
#[must_use]
pub fn strip_preambles(line: &str) -> &str {
    let mut rest = line.trim();
    loop {
        let before = rest.len();
        for re in PREAMBLES.iter() {
            if let Some(m) = re.find(rest) {
                rest = rest[m.end()..].trim();
            }
        }
        if rest.len() == before {
            return rest;
        }
    }
}

/// Turn one line of model output into a field value or the sentinel.
#[must_use]
pub fn clean_model_output(raw: &str) -> String {
    let value = strip_preambles(raw);
    let lowered = value.to_lowercase();

    if value.is_empty()
        || FILLER.contains(&lowered.as_str())
        || lowered.trim_end_matches('.') == NOT_MENTIONED.to_lowercase()
    {
        return NOT_MENTIONED.to_string();
    }

    value.to_string()
}
