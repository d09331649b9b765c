pub mod csv;

pub use self::csv::{ENRICHED_COLUMNS, RECORD_COLUMNS, write_count, write_records};
