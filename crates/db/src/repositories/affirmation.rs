use chrono::{DateTime, Utc};
use sqlx::Row;

use affirmbot_core::domain::affirmation::{Affirmation, AffirmationId, NewAffirmation};

use super::{
    decode_error, timestamp_from_text, timestamp_to_text, AffirmationRepository, RepositoryError,
};
use crate::DbPool;

pub struct SqlAffirmationRepository {
    pool: DbPool,
}

impl SqlAffirmationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_affirmation(row: &sqlx::sqlite::SqliteRow) -> Result<Affirmation, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_error)?;
    let text: String = row.try_get("text").map_err(decode_error)?;
    let author: Option<String> = row.try_get("author").map_err(decode_error)?;
    let added_by_id: String = row.try_get("added_by_id").map_err(decode_error)?;
    let added_at_str: String = row.try_get("added_at").map_err(decode_error)?;

    Ok(Affirmation {
        id: AffirmationId(id),
        text,
        author,
        added_by_id,
        added_at: timestamp_from_text(&added_at_str)?,
    })
}

#[async_trait::async_trait]
impl AffirmationRepository for SqlAffirmationRepository {
    async fn random(&self, collection: &str) -> Result<Option<Affirmation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, text, author, added_by_id, added_at
             FROM affirmation WHERE collection = ?
             ORDER BY RANDOM() LIMIT 1",
        )
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_affirmation).transpose()
    }

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM affirmation WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn recent(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<Affirmation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, text, author, added_by_id, added_at
             FROM affirmation WHERE collection = ?
             ORDER BY added_at DESC, id DESC LIMIT ?",
        )
        .bind(collection)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_affirmation).collect()
    }

    async fn insert(
        &self,
        collection: &str,
        affirmation: NewAffirmation,
        added_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO affirmation (collection, text, author, added_by_id, added_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(collection, text) DO NOTHING",
        )
        .bind(collection)
        .bind(&affirmation.text)
        .bind(&affirmation.author)
        .bind(&affirmation.added_by_id)
        .bind(timestamp_to_text(added_at))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use affirmbot_core::domain::affirmation::NewAffirmation;

    use super::SqlAffirmationRepository;
    use crate::repositories::AffirmationRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool
    }

    fn new_affirmation(text: &str, author: Option<&str>, user: &str) -> NewAffirmation {
        NewAffirmation {
            text: text.to_owned(),
            author: author.map(str::to_owned),
            added_by_id: user.to_owned(),
        }
    }

    #[tokio::test]
    async fn insert_then_count_and_random() {
        let pool = setup().await;
        let repo = SqlAffirmationRepository::new(pool.clone());
        let now = Utc::now();

        assert_eq!(repo.count("affirm").await.expect("count"), 0);
        assert!(repo.random("affirm").await.expect("random").is_none());

        let inserted = repo
            .insert("affirm", new_affirmation("TG is amazing!", Some("Jane Doe"), "U1"), now)
            .await
            .expect("insert");
        assert!(inserted);

        assert_eq!(repo.count("affirm").await.expect("count"), 1);
        let picked = repo.random("affirm").await.expect("random").expect("one row");
        assert_eq!(picked.text, "TG is amazing!");
        assert_eq!(picked.author.as_deref(), Some("Jane Doe"));
        assert_eq!(picked.added_by_id, "U1");

        pool.close().await;
    }

    #[tokio::test]
    async fn duplicate_text_in_same_collection_is_rejected() {
        let pool = setup().await;
        let repo = SqlAffirmationRepository::new(pool.clone());
        let now = Utc::now();

        assert!(repo.insert("affirm", new_affirmation("Same", None, "U1"), now).await.expect("1"));
        assert!(!repo.insert("affirm", new_affirmation("Same", None, "U2"), now).await.expect("2"));
        assert!(repo
            .insert("customer_affirm", new_affirmation("Same", None, "U2"), now)
            .await
            .expect("3"));

        assert_eq!(repo.count("affirm").await.expect("count"), 1);
        assert_eq!(repo.count("customer_affirm").await.expect("count"), 1);

        pool.close().await;
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let pool = setup().await;
        let repo = SqlAffirmationRepository::new(pool.clone());
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single().expect("valid date");

        for minute in 0..7 {
            repo.insert(
                "affirm",
                new_affirmation(&format!("entry {minute}"), None, "U1"),
                base + Duration::minutes(minute),
            )
            .await
            .expect("insert");
        }

        let recent = repo.recent("affirm", 5).await.expect("recent");
        let texts: Vec<&str> = recent.iter().map(|row| row.text.as_str()).collect();
        assert_eq!(texts, vec!["entry 6", "entry 5", "entry 4", "entry 3", "entry 2"]);
        assert_eq!(recent[0].added_at, base + Duration::minutes(6));
        assert!(repo.recent("customer_affirm", 5).await.expect("recent").is_empty());

        pool.close().await;
    }
}
