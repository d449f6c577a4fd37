pub mod dest;
pub mod row_iter;

pub use dest::{CellDecoder, ScanDest, ScanMode, classify};
pub use row_iter::{RowIter, ScanOptions};
