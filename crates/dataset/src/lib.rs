//! Customer data for retention simulations: CSV ingestion, the built-in
//! sample, and derivation of `segment` and `churn_score`.

pub mod csv;
pub mod error;
pub mod fallback;
pub mod features;
pub mod source;

pub use csv::{load_csv, parse_csv};
pub use error::DatasetError;
pub use fallback::fallback_records;
pub use features::{ChurnModel, derive_segment};
pub use source::{DataSource, Dataset, DatasetConfig};
