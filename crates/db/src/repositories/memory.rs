use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use affirmbot_core::domain::affirmation::{
    Affirmation, AffirmationId, ContributorCount, NewAffirmation, ShareEvent,
};

use super::{AffirmationRepository, RepositoryError, ShareLogRepository};

#[derive(Default)]
struct AffirmationTable {
    next_id: i64,
    rows: HashMap<String, Vec<Affirmation>>,
}

#[derive(Default)]
pub struct InMemoryAffirmationRepository {
    table: RwLock<AffirmationTable>,
}

#[async_trait::async_trait]
impl AffirmationRepository for InMemoryAffirmationRepository {
    async fn random(&self, collection: &str) -> Result<Option<Affirmation>, RepositoryError> {
        let table = self.table.read().await;
        let picked = table
            .rows
            .get(collection)
            .and_then(|rows| rows.choose(&mut rand::thread_rng()))
            .cloned();
        Ok(picked)
    }

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(collection).map_or(0, |rows| rows.len() as i64))
    }

    async fn recent(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<Affirmation>, RepositoryError> {
        let table = self.table.read().await;
        let mut rows = table.rows.get(collection).cloned().unwrap_or_default();
        rows.sort_by(|left, right| {
            right.added_at.cmp(&left.added_at).then_with(|| right.id.cmp(&left.id))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn insert(
        &self,
        collection: &str,
        affirmation: NewAffirmation,
        added_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = AffirmationId(table.next_id);

        let rows = table.rows.entry(collection.to_owned()).or_default();
        if rows.iter().any(|row| row.text == affirmation.text) {
            return Ok(false);
        }
        rows.push(Affirmation {
            id,
            text: affirmation.text,
            author: affirmation.author,
            added_by_id: affirmation.added_by_id,
            added_at,
        });
        Ok(true)
    }
}

#[derive(Default)]
pub struct InMemoryShareLogRepository {
    events: RwLock<HashMap<String, Vec<ShareEvent>>>,
}

#[async_trait::async_trait]
impl ShareLogRepository for InMemoryShareLogRepository {
    async fn log_share(&self, collection: &str, event: ShareEvent) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        events.entry(collection.to_owned()).or_default().push(event);
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError> {
        let events = self.events.read().await;
        Ok(events.get(collection).map_or(0, |events| events.len() as i64))
    }

    async fn top_sharers(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<ContributorCount>, RepositoryError> {
        let events = self.events.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for event in events.get(collection).into_iter().flatten() {
            *counts.entry(event.user_id.as_str()).or_default() += 1;
        }

        let mut ranked: Vec<ContributorCount> = counts
            .into_iter()
            .map(|(user_id, count)| ContributorCount { user_id: user_id.to_owned(), count })
            .collect();
        ranked.sort_by(|left, right| {
            right.count.cmp(&left.count).then_with(|| left.user_id.cmp(&right.user_id))
        });
        ranked.truncate(limit as usize);
        Ok(ranked)
    }
}
