use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts seen on the source page over the years. Two-digit years
/// go before four-digit ones: `%Y` would happily read `07` as year 7.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parse a calendar date from any of the accepted layouts. A trailing time
/// component is accepted and discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let year_first = starts_with_full_year(s);
    DATE_FORMATS
        .iter()
        .filter(|fmt| year_first || !fmt.starts_with("%Y"))
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            if !year_first {
                return None;
            }
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        })
}

/// Year-first layouts only apply to strings opening with exactly four digits.
fn starts_with_full_year(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 4 && b[..4].iter().all(u8::is_ascii_digit) && !b[4].is_ascii_digit()
}
