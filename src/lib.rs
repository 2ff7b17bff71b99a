//! Reads punch-card style mark sheets from scanned images.
//!
//! [`marksheet::read_sheet`] locates the row and column bands of the sheet and
//! extracts the punch pattern of every column; [`punch_decode::DefinitionTable`]
//! turns those patterns into text.

pub mod marksheet;
pub mod punch_decode;
pub mod sheet_gen;

pub use marksheet::{Band, SheetConfig, SheetError, SheetReading, read_sheet};
pub use punch_decode::{DecodeError, DefinitionTable, PunchPattern};
