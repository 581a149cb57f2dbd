pub mod pdftohtml;
pub mod xml;

use crate::error::InvoiceRowsError;

/// A `<text>` element found inside a page of the converted XML.
///
/// Attributes are kept as found; deciding what a missing `font` or `top`
/// means is left to row assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub page: usize,
    pub top: Option<String>,
    pub font: Option<String>,
    pub content: String,
}

/// Text nodes of a converted document, in document order.
#[derive(Debug, Clone, Default)]
pub struct ConvertedDocument {
    /// Number of top-level elements under the root, i.e. pages.
    pub page_count: usize,
    pub nodes: Vec<TextNode>,
}

/// Trait for PDF-to-XML conversion backends.
pub trait XmlConverter: Send + Sync {
    /// Convert PDF bytes into an XML document shaped `root > page* > text*`.
    fn to_xml(&self, pdf_bytes: &[u8]) -> Result<String, InvoiceRowsError>;

    /// Name of this conversion backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
