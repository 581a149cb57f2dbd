use invoicerows_core::error::InvoiceRowsError;
use invoicerows_core::extraction::pdftohtml::PdftohtmlConverter;
use invoicerows_core::extraction::XmlConverter;
use std::path::Path;

/// Print the converter's XML for a PDF, for inspecting font ids and positions.
pub fn run(input_file: &Path) -> Result<(), InvoiceRowsError> {
    let pdf_bytes = invoicerows_core::read_pdf(input_file)?;
    let converter = PdftohtmlConverter::new();
    let xml = converter.to_xml(&pdf_bytes)?;
    println!("{xml}");
    Ok(())
}
