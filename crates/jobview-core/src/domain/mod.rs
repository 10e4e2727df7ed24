//! Domain model (records, tables, counters, errors).

pub mod errors;
pub mod record;
pub mod stats;
pub mod table;

pub use self::errors::ViewError;
pub use self::record::{RecordStatus, StatusRecord};
pub use self::stats::Statistics;
pub use self::table::StatusTable;
