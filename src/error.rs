use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    #[error("line {line}: expected 5 fields, found {found}")]
    MalformedRow { line: u64, found: usize },

    #[error("line {line}: {field} is not an integer: {value:?}")]
    InvalidInteger {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("invalid chart type '{0}'. Supported types are: pie, bar")]
    UnsupportedChart(String),

    #[error("invalid format '{0}'. Supported formats: TXT, CSV, JSON")]
    UnsupportedFormat(String),

    #[error("chart '{title}' has {labels} labels but {other} {what}")]
    MisalignedChart {
        title: String,
        labels: usize,
        other: usize,
        what: &'static str,
    },

    #[error("options list is too long ({count})! Maximum allowed is: {max}")]
    TooManyOptions { count: usize, max: usize },

    #[error("unknown review field: {0}")]
    UnknownField(String),

    #[error("unknown branch: {0}")]
    UnknownBranch(String),

    #[error("malformed export: {0}")]
    MalformedExport(String),

    #[error("input closed")]
    InputClosed,
}
