use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading solver output files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file is empty: {}", .0.display())]
    Empty(PathBuf),

    #[error("{}: missing '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: row {row}: {source}", .path.display())]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row}: operation ends at {end} before it starts at {start}", .path.display())]
    InvalidInterval {
        path: PathBuf,
        row: usize,
        start: f64,
        end: f64,
    },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
