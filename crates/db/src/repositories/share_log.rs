use sqlx::Row;

use affirmbot_core::domain::affirmation::{ContributorCount, ShareEvent};

use super::{decode_error, timestamp_to_text, RepositoryError, ShareLogRepository};
use crate::DbPool;

pub struct SqlShareLogRepository {
    pool: DbPool,
}

impl SqlShareLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ShareLogRepository for SqlShareLogRepository {
    async fn log_share(&self, collection: &str, event: ShareEvent) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO share_log (collection, user_id, shared_at) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&event.user_id)
            .bind(timestamp_to_text(event.shared_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM share_log WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn top_sharers(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<ContributorCount>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT user_id, COUNT(*) AS count
             FROM share_log WHERE collection = ?
             GROUP BY user_id
             ORDER BY count DESC, user_id ASC
             LIMIT ?",
        )
        .bind(collection)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ContributorCount {
                    user_id: row.try_get("user_id").map_err(decode_error)?,
                    count: row.try_get("count").map_err(decode_error)?,
                })
            })
            .collect()
    }
}
