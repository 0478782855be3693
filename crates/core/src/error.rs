use thiserror::Error;

/// Errors raised while building core record types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A segment tag was not one of `VIP`, `STANDARD`, `OTHER`.
    #[error("unknown segment: {0}")]
    UnknownSegment(String),
}
