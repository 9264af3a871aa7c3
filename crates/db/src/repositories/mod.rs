use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use affirmbot_core::domain::affirmation::{
    Affirmation, ContributorCount, NewAffirmation, ShareEvent,
};

pub mod affirmation;
pub mod memory;
pub mod share_log;

pub use affirmation::SqlAffirmationRepository;
pub use memory::{InMemoryAffirmationRepository, InMemoryShareLogRepository};
pub use share_log::SqlShareLogRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Stored affirmations, partitioned by collection key.
#[async_trait]
pub trait AffirmationRepository: Send + Sync {
    async fn random(&self, collection: &str) -> Result<Option<Affirmation>, RepositoryError>;

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError>;

    /// Newest first.
    async fn recent(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<Affirmation>, RepositoryError>;

    /// Returns `false` when the collection already holds the same text.
    async fn insert(
        &self,
        collection: &str,
        affirmation: NewAffirmation,
        added_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}

/// Append-only log of share-button presses.
#[async_trait]
pub trait ShareLogRepository: Send + Sync {
    async fn log_share(&self, collection: &str, event: ShareEvent) -> Result<(), RepositoryError>;

    async fn count(&self, collection: &str) -> Result<i64, RepositoryError>;

    /// Highest share count first; equal counts are ordered by user id.
    async fn top_sharers(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<ContributorCount>, RepositoryError>;
}

/// Fixed-width timestamps so that text ordering matches time ordering.
pub(crate) fn timestamp_to_text(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

pub(crate) fn timestamp_from_text(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("invalid timestamp `{value}`: {error}")))
}
