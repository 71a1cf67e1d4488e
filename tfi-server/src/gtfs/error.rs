//! GTFS loading errors.

use std::path::PathBuf;

/// Errors that can occur while loading a GTFS directory.
#[derive(Debug, thiserror::Error)]
pub enum GtfsError {
    /// A required feed file is absent
    #[error("missing GTFS file: {}", .0.display())]
    MissingFile(PathBuf),

    /// The CSV reader failed (I/O, bad quoting, wrong column type)
    #[error("failed to read {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A row parsed but its values are unusable
    #[error("{file} line {line}: {message}")]
    InvalidRow {
        file: &'static str,
        line: u64,
        message: String,
    },
}
