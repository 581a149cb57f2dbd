use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InvoiceRowsError {
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("PDF conversion failed: {0}")]
    Extraction(String),

    #[error("pdftohtml not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftohtmlNotFound,

    #[error("pdftohtml failed with exit code {code}: {stderr}")]
    PdftohtmlFailed { code: i32, stderr: String },

    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("text element on page {page} has no '{attribute}' attribute")]
    MalformedFragment { page: usize, attribute: &'static str },

    #[error("failed to load marker config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
