use crate::error::InvoiceRowsError;
use crate::extraction::{ConvertedDocument, TextNode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element name of a positioned glyph run.
const TEXT_ELEMENT: &[u8] = b"text";

/// Walk a converted document and collect its `<text>` nodes in document order.
///
/// Every top-level child of the root counts as a page and gets the next
/// 1-based index; any `number` attribute on it is ignored. `<text>` elements
/// are found at any depth below a page. A node's content is all character
/// data inside it, inline children (`<b>`, `<i>`, `<a>`) included.
pub fn parse_text_nodes(xml: &str) -> Result<ConvertedDocument, InvoiceRowsError> {
    let mut reader = Reader::from_str(xml);

    let mut doc = ConvertedDocument::default();
    let mut depth = 0usize;
    let mut root_seen = false;
    // (depth of an open <text>, index of its node in doc.nodes)
    let mut open: Vec<(usize, usize)> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| InvoiceRowsError::Xml {
            position: reader.error_position() as u64,
            source,
        })?;

        match event {
            Event::Start(ref e) => {
                enter_element(&mut doc, depth, &mut root_seen)?;
                depth += 1;
                if depth >= 3 && e.name().as_ref() == TEXT_ELEMENT {
                    open.push((depth, doc.nodes.len()));
                    doc.nodes.push(text_node(e, doc.page_count, &reader)?);
                }
            }
            Event::Empty(ref e) => {
                enter_element(&mut doc, depth, &mut root_seen)?;
                if depth >= 2 && e.name().as_ref() == TEXT_ELEMENT {
                    doc.nodes.push(text_node(e, doc.page_count, &reader)?);
                }
            }
            Event::End(_) => {
                if open.last().is_some_and(|&(d, _)| d == depth) {
                    open.pop();
                }
                depth = depth.checked_sub(1).ok_or_else(|| {
                    InvoiceRowsError::MalformedXml("closing tag without a matching opening tag".into())
                })?;
            }
            Event::Text(ref t) => {
                if depth == 0 {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(InvoiceRowsError::MalformedXml(
                            "text outside the root element".into(),
                        ));
                    }
                } else if !open.is_empty() {
                    let text = t.unescape().map_err(|source| InvoiceRowsError::Xml {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    append_content(&mut doc, &open, &text);
                }
            }
            Event::CData(ref c) => {
                if !open.is_empty() {
                    append_content(&mut doc, &open, &String::from_utf8_lossy(c));
                }
            }
            Event::Eof => break,
            // declarations, doctype, comments, processing instructions
            _ => {}
        }
    }

    if !root_seen {
        return Err(InvoiceRowsError::MalformedXml(
            "document has no root element".into(),
        ));
    }
    if depth != 0 {
        return Err(InvoiceRowsError::MalformedXml(format!(
            "{depth} unclosed element(s) at end of input"
        )));
    }

    tracing::debug!(
        pages = doc.page_count,
        text_nodes = doc.nodes.len(),
        "parsed converted XML"
    );
    Ok(doc)
}

/// Character data belongs to every `<text>` it sits in.
fn append_content(doc: &mut ConvertedDocument, open: &[(usize, usize)], text: &str) {
    for &(_, index) in open {
        doc.nodes[index].content.push_str(text);
    }
}

/// Bookkeeping for an element opening at `depth` (number of open ancestors).
fn enter_element(
    doc: &mut ConvertedDocument,
    depth: usize,
    root_seen: &mut bool,
) -> Result<(), InvoiceRowsError> {
    match depth {
        0 if *root_seen => Err(InvoiceRowsError::MalformedXml(
            "more than one root element".into(),
        )),
        0 => {
            *root_seen = true;
            Ok(())
        }
        1 => {
            doc.page_count += 1;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn text_node(
    e: &BytesStart<'_>,
    page: usize,
    reader: &Reader<&[u8]>,
) -> Result<TextNode, InvoiceRowsError> {
    let to_err = |source: quick_xml::Error| InvoiceRowsError::Xml {
        position: reader.buffer_position() as u64,
        source,
    };
    Ok(TextNode {
        page,
        top: attribute(e, b"top").map_err(to_err)?,
        font: attribute(e, b"font").map_err(to_err)?,
        content: String::new(),
    })
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE pdf2xml SYSTEM "pdf2xml.dtd">
<pdf2xml producer="poppler" version="22.02.0">
<page number="7" position="absolute" top="0" left="0" height="1263" width="892">
	<fontspec id="3" size="13" family="Times" color="#000000"/>
<text top="120" left="80" width="200" height="15" font="3">Invoice &amp; receipt</text>
<text top="120" left="500" width="60" height="15" font="3"><b>Total</b> due</text>
</page>
<page number="8" position="absolute" top="0" left="0" height="1263" width="892">
<text top="140" left="80" width="200" height="15" font="1"/>
</page>
</pdf2xml>
"##;

    #[test]
    fn test_pages_are_counted_not_read() {
        let doc = parse_text_nodes(SAMPLE).unwrap();
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.nodes[0].page, 1);
        assert_eq!(doc.nodes[2].page, 2);
    }

    #[test]
    fn test_content_is_unescaped_and_includes_inline_children() {
        let doc = parse_text_nodes(SAMPLE).unwrap();
        assert_eq!(doc.nodes[0].content, "Invoice & receipt");
        assert_eq!(doc.nodes[1].content, "Total due");
        assert_eq!(doc.nodes[1].top.as_deref(), Some("120"));
        assert_eq!(doc.nodes[1].font.as_deref(), Some("3"));
    }

    #[test]
    fn test_self_closing_text_has_empty_content() {
        let doc = parse_text_nodes(SAMPLE).unwrap();
        assert_eq!(doc.nodes[2].content, "");
        assert_eq!(doc.nodes[2].font.as_deref(), Some("1"));
    }

    #[test]
    fn test_nested_text_elements_are_found() {
        let xml = r#"<doc><page><group><text top="1" font="3">deep</text></group></page></doc>"#;
        let doc = parse_text_nodes(xml).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].content, "deep");
    }

    #[test]
    fn test_text_inside_text_is_its_own_node() {
        let xml = r#"<doc><page><text top="1" font="3">a<text top="2" font="3">b</text>c</text></page></doc>"#;
        let doc = parse_text_nodes(xml).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].top.as_deref(), Some("1"));
        assert_eq!(doc.nodes[0].content, "abc");
        assert_eq!(doc.nodes[1].top.as_deref(), Some("2"));
        assert_eq!(doc.nodes[1].content, "b");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let xml = r#"<doc><page><text top="1" font="3">  a  b </text></page></doc>"#;
        let doc = parse_text_nodes(xml).unwrap();
        assert_eq!(doc.nodes[0].content, "  a  b ");
    }

    #[test]
    fn test_missing_attributes_are_reported_as_none() {
        let xml = r#"<doc><page><text>bare</text></page></doc>"#;
        let doc = parse_text_nodes(xml).unwrap();
        assert_eq!(doc.nodes[0].top, None);
        assert_eq!(doc.nodes[0].font, None);
    }

    #[test]
    fn test_empty_root_has_no_pages() {
        let doc = parse_text_nodes("<pdf2xml/>").unwrap();
        assert_eq!(doc.page_count, 0);
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn test_mismatched_end_tag_is_parser_error() {
        let err = parse_text_nodes("<doc><page></doc>").unwrap_err();
        assert!(matches!(err, InvoiceRowsError::Xml { .. }), "got: {err:?}");
    }

    #[test]
    fn test_unclosed_document_is_rejected() {
        assert!(parse_text_nodes("<doc><page>").is_err());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(parse_text_nodes("").is_err());
    }

    #[test]
    fn test_second_root_is_rejected() {
        let err = parse_text_nodes("<a/><b/>").unwrap_err();
        assert!(matches!(err, InvoiceRowsError::MalformedXml(_)), "got: {err:?}");
    }
}
