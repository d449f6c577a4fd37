use std::any::type_name;
use std::mem;

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{ScanError, ScanResult};
use crate::scan::dest::{ScanDest, ScanMode, classify};
use crate::value::Value;

/// Per-binder configuration, passed explicitly at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Ignore result columns with no matching destination field.
    pub unsafe_columns: bool,
    /// Force field-by-field scanning even for destination types with a
    /// single-value form.
    pub struct_only: bool,
}

/// A wrapper around a [`Cursor`] which adds record scanning.
///
/// The column-to-field resolution and the slot buffer are computed on the
/// first row and reused for every following row. Column names are assumed
/// stable across all rows of one cursor and are not re-validated per row,
/// and one `RowIter` must not be driven with two different record types.
pub struct RowIter<C: Cursor> {
    cursor: C,
    unsafe_columns: bool,
    struct_only: bool,
    started: bool,
    closed: bool,
    rows: usize,
    err: Option<ScanError>,
    plan: Vec<Option<usize>>,
    slots: Vec<Value>,
}

impl<C: Cursor> RowIter<C> {
    pub fn new(cursor: C) -> Self {
        Self::with_options(cursor, ScanOptions::default())
    }

    pub fn with_options(cursor: C, options: ScanOptions) -> Self {
        RowIter {
            cursor,
            unsafe_columns: options.unsafe_columns,
            struct_only: options.struct_only,
            started: false,
            closed: false,
            rows: 0,
            err: None,
            plan: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Ignores result columns that cannot be mapped to a destination field.
    /// By default such a column is an error.
    pub fn with_unsafe(mut self) -> Self {
        self.unsafe_columns = true;
        self
    }

    /// Treats a destination that has a single-value form as an ordinary
    /// record. Useful for records that also implement a whole-cell decoder.
    pub fn with_struct_only(mut self) -> Self {
        self.struct_only = true;
        self
    }

    /// Last error recorded by this binder, if any.
    pub fn error(&self) -> Option<&ScanError> {
        self.err.as_ref()
    }

    /// Scans the first row into `dest` and closes the cursor.
    ///
    /// Record destinations are scanned field-by-field; any other type
    /// requires a single-column result. Returns [`ScanError::NotFound`]
    /// when the result has no rows.
    pub fn get<T: ScanDest>(mut self, dest: &mut T) -> ScanResult<()> {
        self.scan_any(dest);
        self.close_cursor();
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        if self.rows == 0 {
            return Err(ScanError::NotFound);
        }
        Ok(())
    }

    /// Scans all rows into `dest` and closes the cursor.
    ///
    /// An empty result is not an error and leaves `dest` untouched; the
    /// accumulator is only allocated once the first row arrives, sized by
    /// the cursor's row-count hint.
    pub fn select<T: ScanDest>(mut self, dest: &mut Vec<T>) -> ScanResult<()> {
        self.scan_all(dest);
        self.close_cursor();
        match self.err.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Scans the current row into a record destination, field by field.
    ///
    /// Use this and iterate manually when collecting everything through
    /// [`select`](Self::select) would be prohibitive, then call
    /// [`close`](Self::close). Returns false once the stream is exhausted or
    /// an error occurred; the error is available from
    /// [`error`](Self::error) and [`close`](Self::close).
    pub fn scan_struct<T: ScanDest>(&mut self, dest: &mut T) -> bool {
        let Some(schema) = T::fields() else {
            self.err = Some(ScanError::InvalidDestination(format!(
                "{} has no mapped fields",
                type_name::<T>()
            )));
            return false;
        };

        if !self.started {
            let columns = self.cursor.columns().to_vec();
            let plan = schema.resolve_batch(&columns);
            if !self.unsafe_columns
                && let Some(missing) = plan.iter().position(Option::is_none)
            {
                self.err = Some(ScanError::MissingField {
                    column: columns[missing].clone(),
                    type_name: type_name::<T>(),
                });
                return false;
            }
            debug!(
                dest = type_name::<T>(),
                columns = columns.len(),
                mapped = plan.iter().filter(|p| p.is_some()).count(),
                "resolved scan plan"
            );
            self.slots = vec![Value::Null; columns.len()];
            self.plan = plan;
            self.started = true;
        }

        if !self.cursor.scan_row(&mut self.slots) {
            return false;
        }
        self.rows += 1;

        for (slot, entry) in self.slots.iter_mut().zip(&self.plan) {
            let value = mem::take(slot);
            // An unmapped entry is only reachable in unsafe mode; the cell
            // is discarded.
            if let Some(idx) = entry
                && let Err(err) = schema.write(*idx, dest, value)
            {
                self.err = Some(err);
                return false;
            }
        }
        true
    }

    /// Closes the underlying cursor once and returns any error that happened
    /// during iteration or at close. Scan errors win over close errors.
    pub fn close(&mut self) -> ScanResult<()> {
        self.close_cursor();
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn scan_any<T: ScanDest>(&mut self, dest: &mut T) -> bool {
        match self.classify_dest::<T>() {
            Some(ScanMode::Single) => self.scan_value(dest),
            Some(ScanMode::Mapped) => self.scan_struct(dest),
            None => false,
        }
    }

    fn scan_all<T: ScanDest>(&mut self, dest: &mut Vec<T>) -> bool {
        let Some(mode) = self.classify_dest::<T>() else {
            return false;
        };

        let mut out: Option<Vec<T>> = None;
        loop {
            let mut row = T::default();
            let ok = match mode {
                ScanMode::Single => self.scan_value(&mut row),
                ScanMode::Mapped => self.scan_struct(&mut row),
            };
            if !ok {
                break;
            }
            out.get_or_insert_with(|| Vec::with_capacity(self.cursor.row_count_hint()))
                .push(row);
        }

        if let Some(rows) = out {
            *dest = rows;
        }
        self.err.is_none()
    }

    /// Classification plus the single-column requirement for scannable
    /// destinations, which holds in safe and unsafe mode alike.
    fn classify_dest<T: ScanDest>(&mut self) -> Option<ScanMode> {
        let mode = match classify::<T>(self.struct_only) {
            Ok(mode) => mode,
            Err(err) => {
                self.err = Some(err);
                return None;
            }
        };
        if mode == ScanMode::Single {
            let count = self.cursor.columns().len();
            if count > 1 {
                self.err = Some(ScanError::ColumnCount {
                    type_name: type_name::<T>(),
                    got: count,
                });
                return None;
            }
        }
        Some(mode)
    }

    /// Raw single-cell scan; the column-count check already happened in
    /// `classify_dest`.
    fn scan_value<T: ScanDest>(&mut self, dest: &mut T) -> bool {
        let Some(decode) = T::cell_decoder() else {
            self.err = Some(ScanError::InvalidDestination(format!(
                "{} cannot be scanned as a single value",
                type_name::<T>()
            )));
            return false;
        };
        let width = self.cursor.columns().len();
        if self.slots.len() != width {
            self.slots = vec![Value::Null; width];
        }
        if !self.cursor.scan_row(&mut self.slots) {
            return false;
        }
        self.rows += 1;
        let value = match self.slots.first_mut() {
            Some(slot) => mem::take(slot),
            // A zero-column result is passed through; only more than one
            // column is rejected.
            None => Value::Null,
        };
        if let Err(err) = decode(dest, value) {
            self.err = Some(err);
            return false;
        }
        true
    }

    fn close_cursor(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let result = self.cursor.close();
        debug!(rows = self.rows, ok = result.is_ok(), "cursor closed");
        if let Err(err) = result
            && self.err.is_none()
        {
            self.err = Some(err);
        }
    }
}

impl<C: Cursor> Drop for RowIter<C> {
    fn drop(&mut self) {
        // A binder abandoned mid-iteration still closes its cursor.
        if !self.closed {
            self.closed = true;
            let _ = self.cursor.close();
        }
    }
}
