use invoicerows_core::config::load_marker_pairs;
use invoicerows_core::error::InvoiceRowsError;
use invoicerows_core::extraction::pdftohtml::PdftohtmlConverter;
use invoicerows_core::rows::ExtractOptions;
use invoicerows_core::{extract_rows, select_ranges, RangeMarkers};
use std::path::{Path, PathBuf};

use crate::output;

/// Settings resolved once from the command line.
pub struct RunOptions {
    pub start: String,
    pub end: String,
    pub config_path: PathBuf,
    pub body_font: String,
}

pub fn run(input_file: &Path, options: &RunOptions) -> Result<(), InvoiceRowsError> {
    let pdf_bytes = invoicerows_core::read_pdf(input_file)?;
    let passes = range_passes(options)?;

    let converter = PdftohtmlConverter::new();
    let extract = ExtractOptions {
        body_font: options.body_font.clone(),
    };
    let rows = extract_rows(&pdf_bytes, &converter, &extract)?;

    let texts: Vec<&str> = rows.texts().collect();
    let selected = select_ranges(&texts, &passes);
    tracing::debug!(
        rows = texts.len(),
        passes = passes.len(),
        selected = selected.len(),
        "printing rows"
    );
    output::plain::print_rows(&selected)?;

    Ok(())
}

/// Marker pairs to run: the command-line pair when a start marker is given,
/// otherwise the config file's pairs. Without a config file, a single pass
/// bounded only by the command-line end marker. A config file with no usable
/// entries runs no passes.
fn range_passes(options: &RunOptions) -> Result<Vec<RangeMarkers>, InvoiceRowsError> {
    if !options.start.is_empty() {
        return Ok(vec![RangeMarkers::new(
            options.start.as_str(),
            options.end.as_str(),
        )]);
    }

    let Some(pairs) = load_marker_pairs(&options.config_path)? else {
        return Ok(vec![RangeMarkers::new("", options.end.as_str())]);
    };
    tracing::debug!(
        path = %options.config_path.display(),
        pairs = pairs.len(),
        "using marker pairs from config"
    );
    Ok(pairs)
}
