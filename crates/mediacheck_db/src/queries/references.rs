//! File-reference scans.

use futures::TryStreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::models::{RecordId, ReferenceRow, StoredValue};

/// Quote an SQL identifier, doubling any embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the scan statement for one table.
pub fn scan_query(table: &str, primary_key: &str, fields: &[String]) -> String {
    let pk = quote_identifier(primary_key);
    let mut columns = vec![pk.clone()];
    columns.extend(fields.iter().map(|f| quote_identifier(f)));
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        columns.join(", "),
        quote_identifier(table),
        pk
    )
}

/// Scan every row of `table`, reading the primary key and each of `fields`.
///
/// Rows come back ordered by primary key. Per-value decode failures do not
/// fail the scan; they surface as [`StoredValue::Unreadable`].
pub async fn scan_references(
    pool: &SqlitePool,
    table: &str,
    primary_key: &str,
    fields: &[String],
) -> DbResult<Vec<ReferenceRow>> {
    if fields.is_empty() {
        return Err(DbError::invalid_data(format!(
            "no file fields requested for table {}",
            table
        )));
    }

    let sql = scan_query(table, primary_key, fields);
    debug!("Scanning {}: {}", table, sql);

    let mut stream = sqlx::query(&sql).fetch(pool);
    let mut rows = Vec::new();
    while let Some(row) = stream.try_next().await? {
        rows.push(decode_row(&row, fields.len()));
    }

    debug!("Scanned {} rows from {}", rows.len(), table);
    Ok(rows)
}

fn decode_row(row: &SqliteRow, field_count: usize) -> ReferenceRow {
    ReferenceRow {
        id: decode_id(row),
        values: (1..=field_count).map(|idx| decode_value(row, idx)).collect(),
    }
}

fn decode_id(row: &SqliteRow) -> RecordId {
    if let Ok(id) = row.try_get::<i64, _>(0) {
        return RecordId::Int(id);
    }
    if let Ok(id) = row.try_get::<String, _>(0) {
        return RecordId::Text(id);
    }
    RecordId::Unknown
}

fn decode_value(row: &SqliteRow, idx: usize) -> StoredValue {
    match row.try_get::<Option<String>, _>(idx) {
        Ok(value) => StoredValue::from_text(value),
        Err(e) => StoredValue::Unreadable(e.to_string()),
    }
}
