//! Sheet storage the row lifecycle writes through.

mod csv;
mod sheet;

pub use self::csv::{detect_delimiter, CsvOptions};
pub use sheet::{Sheet, SheetStore};
