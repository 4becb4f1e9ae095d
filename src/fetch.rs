// src/fetch.rs

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{ContangoError, ContangoResult, SchemaError};
use crate::process::{utils::clean_str, RawTable};

/// Historical contango page; `days=100000` asks for the full history.
pub const DEFAULT_URL: &str = "http://vixcentral.com/historical/?days=100000";

/// Build the HTTP client. `None` means no request timeout.
pub fn build_client(timeout: Option<Duration>) -> ContangoResult<Client> {
    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    Ok(builder.build()?)
}

async fn get_text(client: &Client, url: &Url) -> ContangoResult<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ContangoError::fetch(url, e))?
        .error_for_status()
        .map_err(|e| ContangoError::fetch(url, e))?
        .text()
        .await
        .map_err(|e| ContangoError::fetch(url, e))
}

/// GET `url` and scrape the first `<table>` on the page.
#[instrument(level = "info", skip(client))]
pub async fn fetch_raw_table(client: &Client, url: &Url) -> ContangoResult<RawTable> {
    let html = get_text(client, url).await?;
    let table = parse_html_table(&html)?;
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "scraped table"
    );
    Ok(table)
}

fn cells(row: ElementRef<'_>, cell_sel: &Selector) -> Vec<String> {
    row.select(cell_sel)
        .map(|c| clean_str(&c.text().collect::<String>()))
        .collect()
}

/// Extract the first `<table>` of `html` as text.
///
/// The header comes from the first `<thead>` row (later `<thead>` rows are
/// discarded), or failing that from a leading row made only of `<th>`
/// cells. Everything else (`<tbody>` then `<tfoot>`) is a body row. Rows
/// without cells are skipped.
pub fn parse_html_table(html: &str) -> Result<RawTable, SchemaError> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("selector should parse");
    let thead_sel = Selector::parse("thead tr").expect("selector should parse");
    let body_sel = Selector::parse("tbody tr, tfoot tr").expect("selector should parse");
    let cell_sel = Selector::parse("th, td").expect("selector should parse");
    let td_sel = Selector::parse("td").expect("selector should parse");

    let table = doc.select(&table_sel).next().ok_or(SchemaError::NoTable)?;

    let mut head_rows = table.select(&thead_sel);
    let mut headers = head_rows
        .next()
        .map(|tr| cells(tr, &cell_sel))
        .unwrap_or_default();
    let extra_head_rows = head_rows.count();
    if extra_head_rows > 0 {
        debug!(
            discarded = extra_head_rows,
            "table has a multi-row <thead>; keeping only the first row"
        );
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for tr in table.select(&body_sel) {
        let is_th_only = tr.select(&td_sel).next().is_none();
        let row = cells(tr, &cell_sel);
        if row.is_empty() {
            continue;
        }
        if headers.is_empty() && rows.is_empty() && is_th_only {
            headers = row;
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<h1>Historical prices</h1>
<table class="historical">
  <thead><tr><th>0</th><th>1</th><th>2</th></tr></thead>
  <tbody>
    <tr><td>Date</td><td>F1</td><td>Contango 2/1</td></tr>
    <tr><td>2020-01-02</td><td> 13.1 </td><td>8.4%</td></tr>
    <tr></tr>
  </tbody>
  <tfoot><tr><td>Average</td><td>13.1</td><td>8.4%</td></tr></tfoot>
</table>
<table><tr><td>second table</td></tr></table>
</body></html>
"#;

    #[test]
    fn test_first_table_with_thead() {
        let t = parse_html_table(PAGE).unwrap();
        assert_eq!(t.headers, vec!["0", "1", "2"]);
        assert_eq!(
            t.rows,
            vec![
                vec!["Date", "F1", "Contango 2/1"],
                vec!["2020-01-02", "13.1", "8.4%"],
                vec!["Average", "13.1", "8.4%"],
            ]
        );
    }

    #[test]
    fn test_leading_th_row_is_header_without_thead() {
        let html = r#"<table>
            <tr><th>A</th><th>B</th></tr>
            <tr><td>Date</td><td>F1</td></tr>
            <tr><td>x</td><td>y</td></tr>
        </table>"#;
        let t = parse_html_table(html).unwrap();
        assert_eq!(t.headers, vec!["A", "B"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["Date", "F1"]);
    }

    #[test]
    fn test_td_first_row_stays_in_body() {
        let html = "<table><tr><td>Date</td><td>F1</td></tr><tr><td>x</td><td>y</td></tr></table>";
        let t = parse_html_table(html).unwrap();
        assert!(t.headers.is_empty());
        assert_eq!(t.rows.len(), 2);
    }

    #[test]
    fn test_nested_markup_text_is_flattened() {
        let html = "<table><tr><td><b>Contango</b>\n 2/1</td></tr></table>";
        let t = parse_html_table(html).unwrap();
        assert_eq!(t.rows, vec![vec!["Contango 2/1"]]);
    }

    #[test]
    fn test_only_first_thead_row_becomes_header() {
        let html = r#"<table>
            <thead>
              <tr><th>A</th><th>B</th></tr>
              <tr><th>a2</th><th>b2</th></tr>
            </thead>
            <tbody><tr><td>Date</td><td>F1</td></tr></tbody>
        </table>"#;
        let t = parse_html_table(html).unwrap();
        assert_eq!(t.headers, vec!["A", "B"]);
        assert_eq!(t.rows, vec![vec!["Date", "F1"]]);
    }

    #[test]
    fn test_no_table() {
        assert_eq!(
            parse_html_table("<html><body><p>maintenance</p></body></html>"),
            Err(SchemaError::NoTable)
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_fetch_error() {
        let client = build_client(Some(Duration::from_secs(2))).unwrap();
        // port 1 on loopback: connection refused
        let url = Url::parse("http://127.0.0.1:1/historical/").unwrap();
        let err = fetch_raw_table(&client, &url).await.unwrap_err();
        match &err {
            ContangoError::Fetch { url: u, .. } => assert!(u.contains("127.0.0.1:1")),
            other => panic!("unexpected error: {other:?}"),
        }
        // the reqwest error stays reachable as the source
        assert!(std::error::Error::source(&err).is_some());
    }
}
