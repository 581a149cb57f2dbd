use serde::Deserialize;

/// A start/end marker pair bounding one range pass.
///
/// `None` means "from the first row" for `start` and "to the last row" for
/// `end`. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RangeMarkers {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl RangeMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: non_empty(start.into()),
            end: non_empty(end.into()),
        }
    }

    /// Both markers absent: every row is selected.
    pub fn is_unbounded(&self) -> bool {
        self.start_marker().is_none() && self.end_marker().is_none()
    }

    pub fn start_marker(&self) -> Option<&str> {
        self.start.as_deref().filter(|s| !s.is_empty())
    }

    pub fn end_marker(&self) -> Option<&str> {
        self.end.as_deref().filter(|s| !s.is_empty())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Lazily select the rows from the first one containing the start marker
/// through the first later-or-same row containing the end marker.
///
/// Matching is a plain case-sensitive substring test. If the start marker
/// never matches nothing is yielded; if the end marker never matches every
/// row after the start is yielded. Call again to restart.
pub fn filter_rows<'m, I>(rows: I, markers: &'m RangeMarkers) -> RowRange<'m, I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    RowRange {
        rows: rows.into_iter(),
        start: markers.start_marker(),
        end: markers.end_marker(),
        start_found: markers.start_marker().is_none(),
        end_found: false,
    }
}

/// Iterator returned by [`filter_rows`].
#[derive(Debug, Clone)]
pub struct RowRange<'m, I> {
    rows: I,
    start: Option<&'m str>,
    end: Option<&'m str>,
    start_found: bool,
    end_found: bool,
}

impl<I> Iterator for RowRange<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end_found {
            return None;
        }
        for row in self.rows.by_ref() {
            let text = row.as_ref();
            if !self.start_found {
                self.start_found = self.start.is_some_and(|s| text.contains(s));
            }
            if !self.start_found {
                continue;
            }
            if let Some(end) = self.end {
                self.end_found = text.contains(end);
            }
            return Some(row);
        }
        None
    }
}

impl<I> std::iter::FusedIterator for RowRange<'_, I>
where
    I: std::iter::FusedIterator,
    I::Item: AsRef<str>,
{
}

/// Run one range pass per marker pair over the same rows and concatenate
/// the selections in pass order.
pub fn select_ranges<'r, R>(rows: &'r [R], passes: &[RangeMarkers]) -> Vec<&'r str>
where
    R: AsRef<str>,
{
    let mut selected = Vec::new();
    for markers in passes {
        let before = selected.len();
        selected.extend(filter_rows(rows.iter().map(|r| r.as_ref()), markers));
        tracing::debug!(
            start = markers.start_marker().unwrap_or(""),
            end = markers.end_marker().unwrap_or(""),
            rows = selected.len() - before,
            "range pass"
        );
    }
    selected
}
