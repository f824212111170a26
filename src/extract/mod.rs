// Extraction module.
// Turns flat node sequences from detail containers into typed course records.

pub mod node;
pub mod sequence;
pub mod table;

pub use node::{Node, TableNode};
pub use sequence::extract_details;
pub use table::{parse_availability_table, parse_range, parse_schedule_table};
