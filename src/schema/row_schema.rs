use std::collections::HashMap;

use crate::error::{ScanError, ScanResult};
use crate::scan::ScanDest;
use crate::value::{FromValue, Value};

type Setter<T> = Box<dyn Fn(&mut T, Value) -> ScanResult<()> + Send + Sync>;

struct Field<T> {
    name: String,
    set: Setter<T>,
}

/// The column-to-field mapping a record type declares once.
///
/// The scanning engine resolves result columns against the schema on the
/// first row of a result and reuses that resolution for every following row.
pub struct RowSchema<T> {
    fields: Vec<Field<T>>,
    by_name: HashMap<String, usize>,
}

impl<T: 'static> RowSchema<T> {
    pub fn builder() -> RowSchemaBuilder<T> {
        RowSchemaBuilder { fields: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column name mapped to field `idx`.
    pub fn name(&self, idx: usize) -> &str {
        &self.fields[idx].name
    }

    pub fn resolve(&self, column: &str) -> Option<usize> {
        self.by_name.get(column).copied()
    }

    /// One traversal entry per result column; `None` marks an unmapped column.
    pub fn resolve_batch(&self, columns: &[String]) -> Vec<Option<usize>> {
        columns.iter().map(|c| self.resolve(c)).collect()
    }

    /// Route one cell into the field at `idx`. An out-of-range index means
    /// the caller reused a binder across two different record types.
    pub fn write(&self, idx: usize, dest: &mut T, value: Value) -> ScanResult<()> {
        let field = self.fields.get(idx).ok_or_else(|| {
            ScanError::InvalidDestination(format!(
                "field index {idx} out of range for {}",
                std::any::type_name::<T>()
            ))
        })?;
        (field.set)(dest, value)
    }
}

pub struct RowSchemaBuilder<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> RowSchemaBuilder<T> {
    /// Map `column` onto a field through `set`.
    pub fn field<V: FromValue + 'static>(mut self, column: &str, set: fn(&mut T, V)) -> Self {
        self.fields.push(Field {
            name: column.to_string(),
            set: Box::new(move |dest, value| {
                set(dest, V::from_value(value)?);
                Ok(())
            }),
        });
        self
    }

    /// Flatten an embedded record's mapping under `prefix`, composing its
    /// setters behind the `get` accessor.
    pub fn embed<U: ScanDest>(mut self, prefix: &str, get: fn(&mut T) -> &mut U) -> Self {
        let inner = U::fields().unwrap_or_else(|| {
            panic!(
                "embedded type {} has no mapped fields",
                std::any::type_name::<U>()
            )
        });
        for idx in 0..inner.len() {
            self.fields.push(Field {
                name: format!("{prefix}{}", inner.name(idx)),
                set: Box::new(move |dest, value| inner.write(idx, get(dest), value)),
            });
        }
        self
    }

    pub fn build(self) -> RowSchema<T> {
        let mut by_name = HashMap::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), idx).is_some() {
                panic!(
                    "duplicate column {:?} in schema for {}",
                    field.name,
                    std::any::type_name::<T>()
                );
            }
        }
        RowSchema {
            fields: self.fields,
            by_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Account {
        id: i64,
        name: String,
    }

    fn account_schema() -> RowSchema<Account> {
        RowSchema::builder()
            .field("id", |a: &mut Account, v| a.id = v)
            .field("name", |a: &mut Account, v| a.name = v)
            .build()
    }

    #[test]
    fn test_resolve_batch_preserves_column_order() {
        let schema = account_schema();
        let columns = vec![
            "name".to_string(),
            "missing".to_string(),
            "id".to_string(),
        ];
        assert_eq!(schema.resolve_batch(&columns), vec![Some(1), None, Some(0)]);
    }

    #[test]
    fn test_write_routes_cell_into_field() -> ScanResult<()> {
        let schema = account_schema();
        let mut account = Account::default();
        schema.write(0, &mut account, Value::BigInt(42))?;
        schema.write(1, &mut account, Value::from("Ada"))?;
        assert_eq!(
            account,
            Account {
                id: 42,
                name: "Ada".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_write_out_of_range_is_invalid_destination() {
        let schema = account_schema();
        let mut account = Account::default();
        let err = schema.write(9, &mut account, Value::Null).unwrap_err();
        assert!(matches!(err, ScanError::InvalidDestination(_)));
    }

    #[test]
    #[should_panic(expected = "duplicate column")]
    fn test_duplicate_column_panics_at_build() {
        RowSchema::builder()
            .field("id", |a: &mut Account, v| a.id = v)
            .field("id", |a: &mut Account, v: i64| a.id = v)
            .build();
    }
}
