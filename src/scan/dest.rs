use std::any::type_name;

use crate::error::{ScanError, ScanResult};
use crate::schema::RowSchema;
use crate::value::{FromValue, Value};

/// Decode one result cell into an existing destination value.
pub type CellDecoder<T> = fn(&mut T, Value) -> ScanResult<()>;

/// Capability trait for scan destinations.
///
/// Record types return their column mapping from `fields`; types consumed as
/// one opaque cell return a decoder from `cell_decoder`. A record may supply
/// both, in which case the single-value form wins unless the binder is put
/// into struct-only mode.
///
/// Use the [`row_fields!`](crate::row_fields) macro to implement the record
/// side from a `"column" => field` list.
pub trait ScanDest: Default + 'static {
    fn fields() -> Option<&'static RowSchema<Self>> {
        None
    }

    fn cell_decoder() -> Option<CellDecoder<Self>> {
        None
    }
}

/// How a destination type is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// As one opaque cell.
    Single,
    /// Field-by-field through the record's mapping.
    Mapped,
}

/// Classifies a destination type.
///
/// A type is scanned as a single value if it has a cell decoder, is not a
/// record, or is a record with zero mapped fields. `struct_only` bypasses
/// the decoder for record types and rejects everything else.
pub fn classify<T: ScanDest>(struct_only: bool) -> ScanResult<ScanMode> {
    let single = T::cell_decoder().is_some() || T::fields().is_none_or(|f| f.is_empty());
    if struct_only && single {
        return if T::fields().is_some() {
            Ok(ScanMode::Mapped)
        } else {
            Err(ScanError::StructOnly(type_name::<T>()))
        };
    }
    Ok(if single {
        ScanMode::Single
    } else {
        ScanMode::Mapped
    })
}

macro_rules! single_value_dest {
    ($($ty:ty),+ $(,)?) => {$(
        impl ScanDest for $ty {
            fn cell_decoder() -> Option<CellDecoder<Self>> {
                Some(|dest, value| {
                    *dest = <$ty as FromValue>::from_value(value)?;
                    Ok(())
                })
            }
        }
    )+};
}

single_value_dest!(
    bool,
    i32,
    i64,
    f64,
    String,
    Vec<u8>,
    Vec<bool>,
    Vec<i32>,
    Vec<i64>,
    Vec<f64>,
    Vec<String>,
);

impl<V: FromValue + 'static> ScanDest for Option<V> {
    fn cell_decoder() -> Option<CellDecoder<Self>> {
        Some(|dest, value| {
            *dest = <Option<V> as FromValue>::from_value(value)?;
            Ok(())
        })
    }
}
