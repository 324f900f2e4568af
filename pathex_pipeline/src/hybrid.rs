//! Hybrid merge orchestrator.
//!
//! Pattern extraction runs once; every field it leaves unresolved is handed
//! to a [`FieldResolver`] exactly once, in table order.

use serde::Serialize;
use tracing::{debug, info};

use pathex_core::{ExtractionResult, FieldResolver, is_unresolved};
use pathex_fields::{PatternExtractor, PatternOutcome};

/// Where a field's final value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Pattern match or the field's configured default.
    Pattern,
    /// Filled in by the model fallback.
    Model,
    /// Neither path produced a value.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub value: String,
    pub source: ValueSource,
    /// What the pattern pass produced before any fallback.
    pub pattern: PatternOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub fields: Vec<FieldReport>,
    pub fallback_calls: usize,
}

impl MergeReport {
    #[must_use]
    pub fn count(&self, source: ValueSource) -> usize {
        self.fields.iter().filter(|f| f.source == source).count()
    }

    #[must_use]
    pub fn into_result(self) -> ExtractionResult {
        self.fields.into_iter().map(|f| (f.name, f.value)).collect()
    }
}

/// Combines the pattern extractor with a per-field resolver.
pub struct HybridExtractor<R> {
    patterns: PatternExtractor,
    resolver: R,
}

impl<R: FieldResolver> HybridExtractor<R> {
    pub const fn new(patterns: PatternExtractor, resolver: R) -> Self {
        Self { patterns, resolver }
    }

    #[must_use]
    pub const fn patterns(&self) -> &PatternExtractor {
        &self.patterns
    }

    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Extract every field, consulting the resolver only for unresolved ones.
    pub async fn merge(&self, text: &str) -> ExtractionResult {
        self.merge_detailed(text).await.into_result()
    }

    pub async fn merge_detailed(&self, text: &str) -> MergeReport {
        let base = self.patterns.extract_detailed(text);
        let mut fields = Vec::with_capacity(base.len());
        let mut fallback_calls = 0;

        for extraction in base {
            let (value, source) = if is_unresolved(Some(extraction.outcome.value())) {
                fallback_calls += 1;
                let value = self.resolver.resolve(text, &extraction.name).await;
                let source = if is_unresolved(Some(&value)) {
                    ValueSource::Unresolved
                } else {
                    ValueSource::Model
                };
                debug!(field = %extraction.name, ?source, "Fallback consulted");
                (value, source)
            } else {
                (extraction.outcome.value().to_string(), ValueSource::Pattern)
            };

            fields.push(FieldReport {
                name: extraction.name,
                value,
                source,
                pattern: extraction.outcome,
            });
        }

        let report = MergeReport {
            fields,
            fallback_calls,
        };
        info!(
            fields = report.fields.len(),
            by_pattern = report.count(ValueSource::Pattern),
            by_model = report.count(ValueSource::Model),
            unresolved = report.count(ValueSource::Unresolved),
            fallback_calls,
            "Hybrid extraction complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pathex_core::NOT_MENTIONED;
    use pathex_fields::{FieldDef, FieldTable};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        value: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FieldResolver for Fixed {
        async fn resolve(&self, _text: &str, _field_name: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value.to_string()
        }
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn small_extractor() -> PatternExtractor {
        let table = FieldTable::compile(&[
            FieldDef::new("Size", r"size (\d+ cm)"),
            FieldDef::new("Grade", r"grade (\w+)"),
            FieldDef::new("Type", r"type (\w+)").default_to("Adenocarcinoma"),
        ])
        .expect("valid table should compile");
        PatternExtractor::new(Arc::new(table))
    }

    #[tokio::test]
    async fn reports_sources() {
        let resolver = Fixed {
            value: "high",
            calls: AtomicUsize::new(0),
        };
        let hybrid = HybridExtractor::new(small_extractor(), resolver);

        let report = hybrid.merge_detailed("size 4 cm").await;
        let sources: Vec<_> = report.fields.iter().map(|f| f.source).collect();
        assert_eq!(
            sources,
            [ValueSource::Pattern, ValueSource::Model, ValueSource::Pattern]
        );
        assert_eq!(report.fallback_calls, 1);
        assert_eq!(hybrid.resolver.calls.load(Ordering::SeqCst), 1);

        let result = report.into_result();
        assert_eq!(result.get("Size"), Some("4 cm"));
        assert_eq!(result.get("Grade"), Some("high"));
        assert_eq!(result.get("Type"), Some("Adenocarcinoma"));
    }

    #[tokio::test]
    async fn sentinel_from_resolver_is_unresolved() {
        let resolver = Fixed {
            value: NOT_MENTIONED,
            calls: AtomicUsize::new(0),
        };
        let hybrid = HybridExtractor::new(small_extractor(), resolver);

        let report = hybrid.merge_detailed("").await;
        assert_eq!(report.count(ValueSource::Unresolved), 2);
        assert_eq!(report.count(ValueSource::Pattern), 1);
        assert_eq!(report.fallback_calls, 2);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn report_serializes_with_pattern_outcome() {
        let resolver = Fixed {
            value: "low",
            calls: AtomicUsize::new(0),
        };
        let hybrid = HybridExtractor::new(small_extractor(), resolver);

        let report = hybrid.merge_detailed("size 2 cm").await;
        let json = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(json["fields"][0]["source"], "pattern");
        assert_eq!(json["fields"][0]["pattern"]["status"], "matched");
        assert_eq!(json["fields"][1]["source"], "model");
        assert_eq!(json["fields"][1]["pattern"]["reason"]["kind"], "no_match");
        assert_eq!(json["fallback_calls"], 1);
    }
}
