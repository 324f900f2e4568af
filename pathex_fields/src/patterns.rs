//! Field specification types and table compilation.
//!
//! A field is declared as data: a name, an ordered list of patterns with
//! their matching options, and a default used when nothing matches. The
//! declarations are compiled once into a [`FieldTable`].

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use pathex_core::NOT_MENTIONED;

/// Error type for table building.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A pattern failed to compile.
    #[error("invalid pattern #{index} for field '{field}': {source}")]
    Regex {
        field: String,
        index: usize,
        #[source]
        source: regex::Error,
    },

    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field was declared without any pattern.
    #[error("field '{0}' has no patterns")]
    NoPatterns(String),
}

const fn default_true() -> bool {
    true
}

/// Regex flags applied to a single pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(default = "default_true")]
    pub case_insensitive: bool,

    /// `.` also matches `\n`, so a value may run over line breaks.
    #[serde(default)]
    pub dot_matches_new_line: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            dot_matches_new_line: false,
        }
    }
}

/// Definition of a single extraction pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDef {
    /// Regex whose first capture group holds the value.
    pub pattern: String,

    #[serde(default)]
    pub options: MatchOptions,
}

impl PatternDef {
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: MatchOptions::default(),
        }
    }

    /// Let `.` run across line breaks.
    #[must_use]
    pub const fn spanning_lines(mut self) -> Self {
        self.options.dot_matches_new_line = true;
        self
    }

    /// Compile into a [`Regex`] honouring the options.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(self.options.case_insensitive)
            .dot_matches_new_line(self.options.dot_matches_new_line)
            .build()
    }
}

/// Value used for a field when no pattern yields one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDefault {
    /// The shared "Not Mentioned" marker.
    #[default]
    Sentinel,

    /// A fixed value.
    Literal { value: String },

    /// `present` if the lowercased text contains `needle`, else `absent`.
    Presence {
        needle: String,
        present: String,
        absent: String,
    },
}

impl FieldDefault {
    /// Compute the default against an already lowercased copy of the text.
    #[must_use]
    pub fn resolve(&self, lowered_text: &str) -> String {
        match self {
            Self::Sentinel => NOT_MENTIONED.to_string(),
            Self::Literal { value } => value.clone(),
            Self::Presence {
                needle,
                present,
                absent,
            } => {
                if lowered_text.contains(&needle.to_lowercase()) {
                    present.clone()
                } else {
                    absent.clone()
                }
            }
        }
    }

    /// Whether the default depends on the text rather than being fixed.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Presence { .. })
    }
}

impl std::fmt::Display for FieldDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentinel => write!(f, "{NOT_MENTIONED}"),
            Self::Literal { value } => write!(f, "{value:?}"),
            Self::Presence {
                needle,
                present,
                absent,
            } => write!(f, "{present} if text contains {needle:?}, else {absent}"),
        }
    }
}

/// Declaration of one output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Output key; unique within a table.
    pub name: String,

    /// Patterns tried in order.
    pub patterns: Vec<PatternDef>,

    #[serde(default)]
    pub default: FieldDefault,
}

impl FieldDef {
    /// A field with a single case-insensitive pattern and the sentinel default.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::with_pattern(name, PatternDef::new(pattern))
    }

    #[must_use]
    pub fn with_pattern(name: impl Into<String>, pattern: PatternDef) -> Self {
        Self {
            name: name.into(),
            patterns: vec![pattern],
            default: FieldDefault::Sentinel,
        }
    }

    /// Append a fallback pattern, tried after the existing ones.
    #[must_use]
    pub fn or_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(PatternDef::new(pattern));
        self
    }

    #[must_use]
    pub fn default_to(mut self, value: impl Into<String>) -> Self {
        self.default = FieldDefault::Literal {
            value: value.into(),
        };
        self
    }

    #[must_use]
    pub fn default_presence(
        mut self,
        needle: impl Into<String>,
        present: impl Into<String>,
        absent: impl Into<String>,
    ) -> Self {
        self.default = FieldDefault::Presence {
            needle: needle.into(),
            present: present.into(),
            absent: absent.into(),
        };
        self
    }
}

/// A field with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: String,
    patterns: Vec<Regex>,
    default: FieldDefault,
}

impl CompiledField {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    #[must_use]
    pub const fn default_value(&self) -> &FieldDefault {
        &self.default
    }
}

static STANDARD_TABLE: OnceCell<Arc<FieldTable>> = OnceCell::new();

/// Immutable, ordered set of compiled fields.
#[derive(Debug, Clone)]
pub struct FieldTable {
    fields: Vec<CompiledField>,
}

impl FieldTable {
    /// Compile field declarations, preserving their order.
    ///
    /// # Errors
    /// Returns an error on an invalid regex, a duplicate name, or a field
    /// without patterns.
    pub fn compile(defs: &[FieldDef]) -> Result<Self, BuildError> {
        let mut seen = HashSet::with_capacity(defs.len());
        let mut fields = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.name.as_str()) {
                return Err(BuildError::DuplicateField(def.name.clone()));
            }
            if def.patterns.is_empty() {
                return Err(BuildError::NoPatterns(def.name.clone()));
            }

            let patterns = def
                .patterns
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    p.compile().map_err(|source| BuildError::Regex {
                        field: def.name.clone(),
                        index,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            fields.push(CompiledField {
                name: def.name.clone(),
                patterns,
                default: def.default.clone(),
            });
        }

        Ok(Self { fields })
    }

    /// The built-in pathology report table, compiled on first use and
    /// shared for the life of the process.
    pub fn standard() -> Result<Arc<Self>, BuildError> {
        STANDARD_TABLE
            .get_or_try_init(|| {
                let table = Self::compile(&crate::table::standard_fields())?;
                info!("Compiled standard field table: {} fields", table.len());
                Ok(Arc::new(table))
            })
            .map(Arc::clone)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledField> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(CompiledField::name)
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a CompiledField;
    type IntoIter = std::slice::Iter<'a, CompiledField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn compile_preserves_order() {
        let defs = vec![
            FieldDef::new("b", r"b(\d)"),
            FieldDef::new("a", r"a(\d)"),
            FieldDef::new("c", r"c(\d)"),
        ];
        let table = FieldTable::compile(&defs).expect("valid table should compile");
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn compile_rejects_duplicate_names() {
        let defs = vec![FieldDef::new("x", r"(a)"), FieldDef::new("x", r"(b)")];
        assert!(matches!(
            FieldTable::compile(&defs),
            Err(BuildError::DuplicateField(name)) if name == "x"
        ));
    }

    #[test]
    fn compile_rejects_invalid_regex() {
        let defs = vec![FieldDef::new("ok", r"(a)").or_pattern(r"(unclosed")];
        let err = FieldTable::compile(&defs);
        assert!(matches!(
            err,
            Err(BuildError::Regex { ref field, index: 1, .. }) if field == "ok"
        ));
    }

    #[test]
    fn compile_rejects_field_without_patterns() {
        let defs = vec![FieldDef {
            name: "empty".to_string(),
            patterns: Vec::new(),
            default: FieldDefault::Sentinel,
        }];
        assert!(matches!(
            FieldTable::compile(&defs),
            Err(BuildError::NoPatterns(_))
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn options_change_matching() {
        let plain = PatternDef::new(r"(start.+end)")
            .compile()
            .expect("pattern should compile");
        let spanning = PatternDef::new(r"(start.+end)")
            .spanning_lines()
            .compile()
            .expect("pattern should compile");

        let text = "START\nEND";
        assert!(plain.captures(text).is_none());
        assert_eq!(
            spanning
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
            Some("START\nEND")
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn case_sensitive_when_disabled() {
        let mut def = PatternDef::new(r"(pT\d)");
        def.options.case_insensitive = false;
        let re = def.compile().expect("pattern should compile");
        assert!(re.is_match("pT3"));
        assert!(!re.is_match("PT3"));
    }

    #[test]
    fn presence_default_checks_lowercased_text() {
        let default = FieldDefault::Presence {
            needle: "Extranodal Extension".to_string(),
            present: "Yes".to_string(),
            absent: "No".to_string(),
        };
        assert_eq!(default.resolve("no extranodal extension seen"), "Yes");
        assert_eq!(default.resolve("nodes negative"), "No");
        assert!(default.is_computed());
        assert!(!FieldDefault::Sentinel.is_computed());
    }

    #[test]
    fn literal_and_sentinel_defaults() {
        assert_eq!(FieldDefault::Sentinel.resolve("anything"), NOT_MENTIONED);
        let literal = FieldDefault::Literal {
            value: "Adenocarcinoma".to_string(),
        };
        assert_eq!(literal.resolve(""), "Adenocarcinoma");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn field_def_serialization() {
        let def = FieldDef::with_pattern(
            "Report Conclusion",
            PatternDef::new(r"(Final diagnosis[:\s].+)").spanning_lines(),
        )
        .default_to("");

        let json = serde_json::to_string(&def).expect("field should serialize");
        let back: FieldDef = serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(back, def);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn pattern_options_default_when_omitted() {
        let def: FieldDef = serde_json::from_str(r#"{"name":"n","patterns":[{"pattern":"(x)"}]}"#)
            .expect("minimal field should deserialize");
        assert!(def.patterns[0].options.case_insensitive);
        assert!(!def.patterns[0].options.dot_matches_new_line);
        assert_eq!(def.default, FieldDefault::Sentinel);
    }
}
