pub mod error;
pub mod label;
pub mod record;

pub use error::CoreError;
pub use label::{BIG, Label, MEDIUM, NO_OFFER, SMALL};
pub use record::{CustomerRecord, EnrichedRecord, Segment};
