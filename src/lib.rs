pub mod cursor;
pub mod error;
pub mod scan;
pub mod schema;
pub mod value;

mod macros;

// Used by the expansion of `row_fields!`.
pub use once_cell;

pub use crate::cursor::{Cursor, MemCursor};
pub use crate::error::{ScanError, ScanResult};
pub use crate::scan::{CellDecoder, RowIter, ScanDest, ScanMode, ScanOptions, classify};
pub use crate::schema::{RowSchema, RowSchemaBuilder};
pub use crate::value::{FromValue, Value};
