//! Schema lookups used to validate configured models before scanning.

use sqlx::{Row, SqlitePool};

use crate::error::DbResult;
use crate::queries::quote_identifier;

/// Check whether a table (or view) exists.
pub async fn table_exists(pool: &SqlitePool, table: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// List the column names of a table, in declaration order.
///
/// Returns an empty list for a table that does not exist.
pub async fn table_columns(pool: &SqlitePool, table: &str) -> DbResult<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", quote_identifier(table));
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        columns.push(row.try_get::<String, _>("name")?);
    }
    Ok(columns)
}
