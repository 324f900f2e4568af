//! Deterministic pattern extractor.
//!
//! The extractor applies every field of a [`FieldTable`] to the report text
//! and always yields exactly one value per field.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use pathex_core::ExtractionResult;

use crate::patterns::{BuildError, CompiledField, FieldTable};

/// Why a field fell back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultReason {
    /// None of the field's patterns matched.
    NoMatch,

    /// A pattern matched but produced no first capture group.
    MissingCaptureGroup { pattern: usize },
}

/// Result of applying one field's patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatternOutcome {
    Matched { value: String, pattern: usize },
    Defaulted { value: String, reason: DefaultReason },
}

impl PatternOutcome {
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Matched { value, .. } | Self::Defaulted { value, .. } => value,
        }
    }

    #[must_use]
    pub fn into_value(self) -> String {
        match self {
            Self::Matched { value, .. } | Self::Defaulted { value, .. } => value,
        }
    }

    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Outcome for a single named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldExtraction {
    pub name: String,
    #[serde(flatten)]
    pub outcome: PatternOutcome,
}

/// Applies a field table to report text.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    table: Arc<FieldTable>,
}

impl PatternExtractor {
    #[must_use]
    pub const fn new(table: Arc<FieldTable>) -> Self {
        Self { table }
    }

    /// Extractor over the built-in pathology table.
    pub fn standard() -> Result<Self, BuildError> {
        FieldTable::standard().map(Self::new)
    }

    #[must_use]
    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    /// Extract every field, collapsing outcomes to plain values.
    #[must_use]
    pub fn extract(&self, text: &str) -> ExtractionResult {
        self.extract_detailed(text)
            .into_iter()
            .map(|f| (f.name, f.outcome.into_value()))
            .collect()
    }

    /// Extract every field, keeping the reason behind each value.
    #[must_use]
    pub fn extract_detailed(&self, text: &str) -> Vec<FieldExtraction> {
        let lowered = text.to_lowercase();

        let results: Vec<_> = self
            .table
            .iter()
            .map(|field| FieldExtraction {
                name: field.name().to_string(),
                outcome: Self::apply_field(field, text, &lowered),
            })
            .collect();

        debug!(
            fields = results.len(),
            matched = results.iter().filter(|f| f.outcome.is_match()).count(),
            "Pattern extraction complete"
        );

        results
    }

    /// Try a field's patterns in order; the first one yielding group 1 wins.
    fn apply_field(field: &CompiledField, text: &str, lowered: &str) -> PatternOutcome {
        let mut reason = DefaultReason::NoMatch;

        for (index, re) in field.patterns().iter().enumerate() {
            let Some(caps) = re.captures(text) else {
                continue;
            };

            if let Some(group) = caps.get(1) {
                return PatternOutcome::Matched {
                    value: group.as_str().trim().to_string(),
                    pattern: index,
                };
            }

            debug!(
                field = field.name(),
                pattern = index,
                "Pattern matched without a first capture group"
            );
            reason = DefaultReason::MissingCaptureGroup { pattern: index };
        }

        PatternOutcome::Defaulted {
            value: field.default_value().resolve(lowered),
            reason,
        }
    }
}
