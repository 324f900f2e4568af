#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Declarative field table and deterministic pattern extraction for
//! pathology reports.

pub mod extractor;
pub mod patterns;
pub mod table;

pub use extractor::{DefaultReason, FieldExtraction, PatternExtractor, PatternOutcome};
pub use patterns::{
    BuildError, CompiledField, FieldDef, FieldDefault, FieldTable, MatchOptions, PatternDef,
};
pub use table::standard_fields;
