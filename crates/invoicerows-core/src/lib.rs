pub mod config;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod rows;

use error::InvoiceRowsError;
use extraction::XmlConverter;
use rows::{ExtractOptions, RowSet};
use std::path::Path;

pub use filter::{filter_rows, select_ranges, RangeMarkers};

/// Main API entry point: rebuild the text rows of a PDF invoice.
///
/// The converter turns the PDF into positioned text runs; runs in the body
/// font are grouped by page and vertical position, in document order.
pub fn extract_rows(
    pdf_bytes: &[u8],
    converter: &dyn XmlConverter,
    options: &ExtractOptions,
) -> Result<RowSet, InvoiceRowsError> {
    tracing::debug!(backend = converter.backend_name(), "converting PDF to XML");
    let xml = converter.to_xml(pdf_bytes)?;
    extract_rows_from_xml(&xml, options)
}

/// Rebuild rows from already converted XML.
pub fn extract_rows_from_xml(xml: &str, options: &ExtractOptions) -> Result<RowSet, InvoiceRowsError> {
    let doc = extraction::xml::parse_text_nodes(xml)?;
    rows::assemble_rows(doc, options)
}

/// Read an input PDF, reporting a missing file as [`InvoiceRowsError::FileNotFound`].
pub fn read_pdf(path: &Path) -> Result<Vec<u8>, InvoiceRowsError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InvoiceRowsError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InvoiceRowsError::Io(e)
        }
    })
}
