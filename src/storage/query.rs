//! Read access to persisted entries.

use futures::TryStreamExt;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::queue::Record;

/// A record as stored in the `entries` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    /// Row id, also reported as the write outcome id
    pub id: i64,
    /// Target label the record was stored under
    pub target: String,
    /// The record itself
    pub record: Record,
    /// Batch commit time (milliseconds since epoch)
    pub created_at_ms: i64,
}

/// Number of entries stored under `target`.
pub async fn count_entries(pool: &SqlitePool, target: &str) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE target = ?")
        .bind(target)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Entries stored under `target` in insertion order, optionally capped at `limit`.
pub async fn fetch_entries(
    pool: &SqlitePool,
    target: &str,
    limit: Option<i64>,
) -> Result<Vec<StoredEntry>, DatabaseError> {
    let mut query_builder = sqlx::QueryBuilder::new(
        "SELECT id, target, body, created_at_ms FROM entries WHERE target = ",
    );
    query_builder.push_bind(target);
    query_builder.push(" ORDER BY id");
    if let Some(limit) = limit {
        query_builder.push(" LIMIT ");
        query_builder.push_bind(limit);
    }

    let mut rows = query_builder.build().fetch(pool);
    let mut entries = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let body: String = row.get("body");
        let record: Record =
            serde_json::from_str(&body).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        entries.push(StoredEntry {
            id: row.get("id"),
            target: row.get("target"),
            record,
            created_at_ms: row.get("created_at_ms"),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init_memory_pool;

    #[tokio::test]
    async fn test_fetch_respects_limit_and_order() {
        let pool = init_memory_pool().await.unwrap();
        for i in 0..5 {
            sqlx::query("INSERT INTO entries (target, body, created_at_ms) VALUES (?, ?, 0)")
                .bind("sales")
                .bind(format!("{{\"row\":{i}}}"))
                .execute(&pool)
                .await
                .unwrap();
        }

        let entries = fetch_entries(&pool, "sales", Some(3)).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].record["row"], 0);
        assert_eq!(entries[2].record["row"], 2);
        assert!(entries.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_fetch_rejects_corrupt_body() {
        let pool = init_memory_pool().await.unwrap();
        sqlx::query("INSERT INTO entries (target, body, created_at_ms) VALUES ('sales', 'not json', 0)")
            .execute(&pool)
            .await
            .unwrap();

        let result = fetch_entries(&pool, "sales", None).await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));
    }
}
