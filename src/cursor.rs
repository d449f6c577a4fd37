use crate::error::{ScanError, ScanResult};
use crate::value::Value;

/// The `Cursor` trait is the boundary to the query-execution layer: an
/// ordered, possibly paged stream of result rows.
///
/// Column names are ordered and stay stable for the lifetime of one cursor.
/// `scan_row` fills one slot per column and returns false once the stream is
/// exhausted or a driver error occurred; the error is reported by `close`.
/// A cursor is closed exactly once.
pub trait Cursor {
    fn columns(&self) -> &[String];

    /// Estimated number of rows, used as a capacity hint when collecting.
    fn row_count_hint(&self) -> usize;

    fn scan_row(&mut self, slots: &mut [Value]) -> bool;

    fn close(&mut self) -> ScanResult<()>;
}

/// In-memory [`Cursor`] over pre-built rows.
///
/// Stands in for a wire driver in tests and benches. A staged driver failure
/// stops the stream after a number of rows and surfaces at close, the way a
/// real driver reports decode and connection errors.
pub struct MemCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    total: usize,
    delivered: usize,
    fail_after: Option<usize>,
    err: Option<String>,
}

impl MemCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let total = rows.len();
        MemCursor {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter(),
            total,
            delivered: 0,
            fail_after: None,
            err: None,
        }
    }

    /// Stage a driver error after `rows` delivered rows.
    pub fn fail_after(mut self, rows: usize, message: &str) -> Self {
        self.fail_after = Some(rows);
        self.err = Some(message.to_string());
        self
    }
}

impl Cursor for MemCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count_hint(&self) -> usize {
        self.total
    }

    fn scan_row(&mut self, slots: &mut [Value]) -> bool {
        if let Some(limit) = self.fail_after
            && self.delivered >= limit
        {
            return false;
        }
        let Some(row) = self.rows.next() else {
            return false;
        };
        debug_assert_eq!(row.len(), slots.len(), "row width mismatch");
        for (slot, cell) in slots.iter_mut().zip(row) {
            *slot = cell;
        }
        self.delivered += 1;
        true
    }

    fn close(&mut self) -> ScanResult<()> {
        match self.err.take() {
            Some(message) => Err(ScanError::Driver(message)),
            None => Ok(()),
        }
    }
}
