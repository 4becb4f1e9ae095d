pub mod error;
pub mod fetch;
pub mod process;
pub mod write;

use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

pub use error::{ContangoError, ContangoResult, ParseError, SchemaError};
pub use process::{normalize, ContangoTable, RawTable};

/// Download the contango history from `url`, clean it, and save it as
/// `<destination>/vix_contago.csv`. Returns the written path.
///
/// Nothing is written unless every step succeeds.
#[tracing::instrument(level = "info", skip(client, destination), fields(dest = %destination.as_ref().display()))]
pub async fn get_and_save_vix_contango<P: AsRef<Path>>(
    client: &Client,
    url: &Url,
    destination: P,
) -> ContangoResult<PathBuf> {
    info!("Downloading data from VIX central");
    let raw = fetch::fetch_raw_table(client, url).await?;
    let table = normalize(raw)?;

    info!(rows = table.len(), "Saving data");
    let path = write::write_contango_csv(&table, destination)?;
    info!(path = %path.display(), "Data has successfully been saved");
    Ok(path)
}
