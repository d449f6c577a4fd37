use rowscan::{MemCursor, RowIter, ScanError, ScanResult, Value};

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    id: i64,
    first_name: String,
    last_name: String,
    email: Vec<String>,
}

rowscan::row_fields! {
    User {
        "id" => id,
        "first_name" => first_name,
        "last_name" => last_name,
        "email" => email,
    }
}

const COLUMNS: &[&str] = &["id", "first_name", "last_name", "email"];

fn user_rows() -> Vec<Vec<Value>> {
    vec![
        vec![
            Value::BigInt(1),
            Value::from("Patricia"),
            Value::from("Citizen"),
            Value::List(vec![Value::from("a@example.com")]),
        ],
        vec![
            Value::BigInt(2),
            Value::from("Igy"),
            Value::from("Citizen"),
            Value::List(vec![Value::from("b@example.com"), Value::from("c@example.com")]),
        ],
    ]
}

#[test]
fn test_select_then_get_round_trip() -> ScanResult<()> {
    let cursor = MemCursor::new(COLUMNS, user_rows());
    let mut users: Vec<User> = Vec::new();
    RowIter::new(cursor).select(&mut users)?;
    assert_eq!(users.len(), 2);

    // Re-scan the first user alone and compare against the collected one.
    let cursor = MemCursor::new(COLUMNS, user_rows().into_iter().take(1).collect());
    let mut first = User::default();
    RowIter::new(cursor).get(&mut first)?;
    assert_eq!(first, users[0]);
    Ok(())
}

#[test]
fn test_get_distinguishes_empty_from_error() {
    let cursor = MemCursor::new(COLUMNS, Vec::new());
    let mut user = User::default();
    assert_eq!(
        RowIter::new(cursor).get(&mut user),
        Err(ScanError::NotFound)
    );

    let cursor = MemCursor::new(COLUMNS, Vec::new());
    let mut users: Vec<User> = Vec::new();
    assert_eq!(RowIter::new(cursor).select(&mut users), Ok(()));
    assert!(users.is_empty());
}

#[test]
fn test_unsafe_mode_end_to_end() -> ScanResult<()> {
    let columns = &["id", "first_name", "last_name", "email", "shard"];
    let rows = user_rows()
        .into_iter()
        .map(|mut row| {
            row.push(Value::Int(7));
            row
        })
        .collect();

    let cursor = MemCursor::new(columns, rows);
    let mut users: Vec<User> = Vec::new();

    // Safe mode rejects the extra column up front.
    let err = RowIter::new(cursor).select(&mut users).unwrap_err();
    assert!(matches!(err, ScanError::MissingField { ref column, .. } if column == "shard"));
    assert!(users.is_empty());

    let rows = user_rows()
        .into_iter()
        .map(|mut row| {
            row.push(Value::Int(7));
            row
        })
        .collect();
    let cursor = MemCursor::new(columns, rows);
    RowIter::new(cursor).with_unsafe().select(&mut users)?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].email.len(), 2);
    Ok(())
}

#[test]
fn test_aggregate_column_scans_into_primitive() -> ScanResult<()> {
    let cursor = MemCursor::new(&["count"], vec![vec![Value::BigInt(42)]]);
    let mut count = 0i64;
    RowIter::new(cursor).get(&mut count)?;
    assert_eq!(count, 42);
    Ok(())
}
