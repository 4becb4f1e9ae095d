// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type for the fetch → normalize → write pipeline.
pub type ContangoResult<T> = Result<T, ContangoError>;

/// Everything that can make a run fail. Any variant means nothing was written.
#[derive(Error, Debug)]
pub enum ContangoError {
    /// Network, HTTP status or body decoding failure.
    #[error("fetch error for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The scraped table does not have the expected shape.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A cell could not be coerced to its target type.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Writing (or reading back) the CSV failed.
    #[error("write error at {path:?}: {message}")]
    Write { path: PathBuf, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no <table> element found in page")]
    NoTable,

    #[error("table has {0} rows, need at least 2 (header duplicate and footer)")]
    TooFewRows(usize),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row {row} has {found} cells, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unparseable date '{0}'")]
    Date(String),

    #[error("date {0} appears more than once")]
    DuplicateDate(String),

    #[error("column '{column}' on {date}: '{value}' is not a number")]
    Number {
        column: String,
        date: String,
        value: String,
    },
}

impl From<reqwest::Error> for ContangoError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<no url>".to_string());
        ContangoError::Fetch { url, source: err }
    }
}

impl ContangoError {
    pub(crate) fn fetch(url: impl std::fmt::Display, source: reqwest::Error) -> Self {
        ContangoError::Fetch {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ContangoError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
