use crate::error::InvoiceRowsError;
use crate::filter::RangeMarkers;
use std::path::Path;

/// Load the marker pairs for multi-range mode from a JSON file.
///
/// A missing file is not an error and yields `None`. A file that exists but
/// has no usable entries yields `Some` of an empty list.
pub fn load_marker_pairs(path: &Path) -> Result<Option<Vec<RangeMarkers>>, InvoiceRowsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no marker config, skipping range passes");
            return Ok(None);
        }
        Err(e) => {
            return Err(InvoiceRowsError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    parse_marker_pairs(&content, path).map(Some)
}

/// Parse marker pairs from a JSON string read from `source`.
pub fn parse_marker_pairs(json: &str, source: &Path) -> Result<Vec<RangeMarkers>, InvoiceRowsError> {
    let entries: Vec<RangeMarkers> =
        serde_json::from_str(json).map_err(|e| InvoiceRowsError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(usable_pairs(entries))
}

/// Parse marker pairs from a JSON string (no file path context).
pub fn parse_marker_pairs_str(json: &str) -> Result<Vec<RangeMarkers>, InvoiceRowsError> {
    let entries: Vec<RangeMarkers> = serde_json::from_str(json).map_err(InvoiceRowsError::Json)?;
    Ok(usable_pairs(entries))
}

/// Entries without a start marker are dropped; empty strings count as absent.
fn usable_pairs(entries: Vec<RangeMarkers>) -> Vec<RangeMarkers> {
    let total = entries.len();
    let pairs: Vec<RangeMarkers> = entries
        .into_iter()
        .map(|e| RangeMarkers::new(e.start.unwrap_or_default(), e.end.unwrap_or_default()))
        .filter(|m| m.start.is_some())
        .collect();
    if pairs.len() < total {
        tracing::debug!(
            ignored = total - pairs.len(),
            "ignoring marker entries without a start marker"
        );
    }
    pairs
}
