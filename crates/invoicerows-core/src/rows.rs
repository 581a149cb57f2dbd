use crate::error::InvoiceRowsError;
use crate::extraction::{ConvertedDocument, TextNode};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Font id of body text in the invoices this tool reads. Headers and
/// footnotes use other fonts and are dropped.
pub const BODY_FONT: &str = "3";

/// Column at which a second fragment on the same row starts, so two-column
/// invoice layouts line up.
pub const COLUMN_WIDTH: usize = 60;

/// Identifies a row: 1-based page index plus the verbatim `top` attribute.
///
/// `top` is an opaque token; "120" and "120.0" are different rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub page: usize,
    pub top: String,
}

/// A font-matched text run with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub page: usize,
    pub top: String,
    pub font: String,
    pub content: String,
}

impl TextFragment {
    /// Accept a text node if it is in `body_font`.
    ///
    /// Returns `Ok(None)` for nodes in any other font. A node without a
    /// `font` attribute, or a body-font node without `top`, fails the
    /// document rather than being keyed on a guess.
    pub fn from_node(node: TextNode, body_font: &str) -> Result<Option<Self>, InvoiceRowsError> {
        let font = node.font.ok_or(InvoiceRowsError::MalformedFragment {
            page: node.page,
            attribute: "font",
        })?;
        if font != body_font {
            tracing::trace!(page = node.page, font = %font, "skipping fragment in non-body font");
            return Ok(None);
        }
        let top = node.top.ok_or(InvoiceRowsError::MalformedFragment {
            page: node.page,
            attribute: "top",
        })?;
        Ok(Some(TextFragment {
            page: node.page,
            top,
            font,
            content: node.content,
        }))
    }

    pub fn key(&self) -> RowKey {
        RowKey {
            page: self.page,
            top: self.top.clone(),
        }
    }
}

/// Options for row extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Only fragments in this font become rows. Default: [`BODY_FONT`].
    pub body_font: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            body_font: BODY_FONT.to_string(),
        }
    }
}

/// Reconstructed rows in the order they were first created.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    rows: IndexMap<RowKey, String>,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to its row, creating the row if it is new.
    ///
    /// A row that already exists and is shorter than [`COLUMN_WIDTH`]
    /// characters is padded with spaces to that width first.
    pub fn push(&mut self, fragment: TextFragment) {
        match self.rows.entry(fragment.key()) {
            Entry::Occupied(mut entry) => {
                let text = entry.get_mut();
                let len = text.chars().count();
                if len < COLUMN_WIDTH {
                    text.extend(std::iter::repeat(' ').take(COLUMN_WIDTH - len));
                }
                text.push_str(&fragment.content);
            }
            Entry::Vacant(entry) => {
                entry.insert(fragment.content);
            }
        }
    }

    pub fn get(&self, key: &RowKey) -> Option<&str> {
        self.rows.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &str)> {
        self.rows.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Row texts in order, without keys.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.rows.values().map(String::as_str)
    }

    /// Distinct page indices that hold at least one row.
    pub fn pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> = Vec::new();
        for key in self.rows.keys() {
            if !pages.contains(&key.page) {
                pages.push(key.page);
            }
        }
        pages
    }
}

/// Fold a converted document into rows.
pub fn assemble_rows(
    doc: ConvertedDocument,
    options: &ExtractOptions,
) -> Result<RowSet, InvoiceRowsError> {
    let mut rows = RowSet::new();
    let mut kept = 0usize;
    for node in doc.nodes {
        if let Some(fragment) = TextFragment::from_node(node, &options.body_font)? {
            rows.push(fragment);
            kept += 1;
        }
    }
    tracing::debug!(
        pages = doc.page_count,
        fragments = kept,
        rows = rows.len(),
        font = %options.body_font,
        "assembled rows"
    );
    Ok(rows)
}
