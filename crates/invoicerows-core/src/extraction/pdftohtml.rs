use crate::error::InvoiceRowsError;
use crate::extraction::XmlConverter;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF conversion backend using pdftohtml (from poppler-utils).
///
/// Runs `pdftohtml -xml`, which emits one `<page>` per PDF page holding
/// positioned `<text>` runs tagged with a font id.
pub struct PdftohtmlConverter;

impl PdftohtmlConverter {
    pub fn new() -> Self {
        PdftohtmlConverter
    }
}

impl Default for PdftohtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlConverter for PdftohtmlConverter {
    fn to_xml(&self, pdf_bytes: &[u8]) -> Result<String, InvoiceRowsError> {
        let workdir = tempfile::tempdir().map_err(|e| InvoiceRowsError::Extraction(e.to_string()))?;

        let input_path = workdir.path().join("input.pdf");
        let mut input = std::fs::File::create(&input_path)
            .map_err(|e| InvoiceRowsError::Extraction(e.to_string()))?;
        input
            .write_all(pdf_bytes)
            .map_err(|e| InvoiceRowsError::Extraction(e.to_string()))?;
        drop(input);

        // pdftohtml appends ".xml" to the output stem itself.
        let output_stem = workdir.path().join("output");
        tracing::debug!(bytes = pdf_bytes.len(), "running pdftohtml -xml");

        let output = Command::new("pdftohtml")
            .args(["-xml", "-nodrm", "-zoom", "1.5", "-enc", "UTF-8", "-noframes", "-q"])
            .arg(&input_path)
            .arg(&output_stem)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    InvoiceRowsError::PdftohtmlNotFound
                } else {
                    InvoiceRowsError::Extraction(format!("pdftohtml failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(InvoiceRowsError::PdftohtmlFailed { code, stderr });
        }

        read_xml_output(&output_stem.with_extension("xml"))
    }

    fn backend_name(&self) -> &str {
        "pdftohtml"
    }
}

fn read_xml_output(path: &Path) -> Result<String, InvoiceRowsError> {
    let bytes = std::fs::read(path).map_err(|e| {
        InvoiceRowsError::Extraction(format!(
            "pdftohtml produced no readable output at {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_xml_output_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_xml_output(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, InvoiceRowsError::Extraction(_)));
    }

    #[test]
    fn test_read_xml_output_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        std::fs::write(&path, b"<pdf2xml>\xff</pdf2xml>").unwrap();
        let xml = read_xml_output(&path).unwrap();
        assert!(xml.starts_with("<pdf2xml>"));
        assert!(xml.contains('\u{FFFD}'));
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(PdftohtmlConverter::new().backend_name(), "pdftohtml");
    }
}
