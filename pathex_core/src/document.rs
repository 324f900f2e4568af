//! Plain-text document loading.
//!
//! The extraction pipeline only ever sees a normalized text string: every
//! paragraph trimmed, empty paragraphs dropped, joined with `\n`. Binary
//! report formats have to be converted before they reach this crate.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File extensions read as plain text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    #[error("unsupported document format '.{extension}': convert it to plain text first")]
    UnsupportedFormat { extension: String },
}

/// Trim each paragraph, drop the empty ones and join the rest with newlines.
#[must_use]
pub fn normalize_paragraphs(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a plain-text report from disk and normalize it.
pub fn load_document(path: impl AsRef<Path>) -> Result<String, DocumentError> {
    let path = path.as_ref();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(DocumentError::UnsupportedFormat { extension: ext });
        }
    }

    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = String::from_utf8(bytes).map_err(|_| DocumentError::Encoding {
        path: path.to_path_buf(),
    })?;

    let text = normalize_paragraphs(&raw);
    debug!(
        path = %path.display(),
        chars = text.len(),
        "Loaded document"
    );
    Ok(text)
}
