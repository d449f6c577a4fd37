use thiserror::Error;

/// Errors reported by the scanning engine. Clonable because the row binder
/// records an error mid-iteration and surfaces it again at close.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("expected 1 column in result while scanning scannable type {type_name} but got {got}")]
    ColumnCount { type_name: &'static str, got: usize },

    #[error("missing destination name {column:?} in {type_name}")]
    MissingField {
        column: String,
        type_name: &'static str,
    },

    #[error("struct-only scan requested for non-struct type {0}")]
    StructOnly(&'static str),

    #[error("{0}")]
    Driver(String),

    #[error("not found")]
    NotFound,
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
