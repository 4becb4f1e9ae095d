/// A table as scraped from the page, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names the page claims. Not trusted: the real header is `rows[0]`.
    pub headers: Vec<String>,
    /// Every body row as text, including the duplicate header (first) and
    /// the summary footer (last).
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}
