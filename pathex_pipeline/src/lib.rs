#![deny(
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

//! Hybrid pathology field extraction: pattern pass plus model fallback.

pub mod clean;
pub mod fallback;
pub mod hybrid;
pub mod prompt;

pub use clean::clean_model_output;
pub use fallback::{DEFAULT_TIMEOUT, FallbackError, ModelFallbackExtractor};
pub use hybrid::{FieldReport, HybridExtractor, MergeReport, ValueSource};
pub use prompt::build_prompt;
