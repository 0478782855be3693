use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading customer data.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input has a header but no usable data rows.
    #[error("no data rows in input")]
    EmptyInput,

    /// The input is blank, so there is no header row.
    #[error("missing header row")]
    MissingHeader,
}
