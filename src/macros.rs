/// Implements [`ScanDest`](crate::ScanDest) for a record type from a
/// `"column" => field` list. The schema is built on first use and cached for
/// the life of the process.
///
/// ```
/// #[derive(Default)]
/// struct Person {
///     first_name: String,
///     last_name: String,
/// }
///
/// rowscan::row_fields! {
///     Person {
///         "first_name" => first_name,
///         "last_name" => last_name,
///     }
/// }
/// ```
#[macro_export]
macro_rules! row_fields {
    ($ty:ty { $($column:literal => $field:ident),+ $(,)? }) => {
        impl $crate::ScanDest for $ty {
            fn fields() -> Option<&'static $crate::RowSchema<Self>> {
                static SCHEMA: $crate::once_cell::sync::Lazy<$crate::RowSchema<$ty>> =
                    $crate::once_cell::sync::Lazy::new(|| {
                        $crate::RowSchema::builder()
                            $(.field($column, |dest: &mut $ty, value| dest.$field = value))+
                            .build()
                    });
                Some(&SCHEMA)
            }
        }
    };
}
