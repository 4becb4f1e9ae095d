use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Token the source uses for an absent measurement.
pub const MISSING_TOKEN: &str = "-";

/// Trim, collapse inner whitespace runs, strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    let trimmed: &str = &collapsed;
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// `true` for cells that stand for "no value": the `-` token or nothing at all.
pub fn is_missing(cell: &str) -> bool {
    let c = cell.trim();
    c.is_empty() || c == MISSING_TOKEN
}

/// Parse a finite float, `None` on anything else.
pub fn parse_f64(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"12.3%"` → `0.123`. Every `%` is stripped before parsing.
pub fn parse_percent(cell: &str) -> Option<f64> {
    parse_f64(&cell.replace('%', "")).map(|v| v * 0.01)
}
