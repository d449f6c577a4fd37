pub mod row_schema;

pub use row_schema::{RowSchema, RowSchemaBuilder};
