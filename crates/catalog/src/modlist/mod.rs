//! Wabbajack modlist flattening
//!
//! Parses the `Archives` section of a modlist document and projects each
//! archive into a `Name,Description,modID` CSV row.

pub mod extract;
pub mod parser;

pub use extract::{extract_rows, flatten_modlist, write_extracted_csv, ExtractedRow, EXTRACTED_HEADERS};
pub use parser::{parse_modlist, Archive, ArchiveState, Modlist};
