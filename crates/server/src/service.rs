//! Command and interaction handling over the storage traits.
//!
//! Storage failures never reach the user as errors: reads degrade to the
//! profile's fallback text, zero, or an empty list; a failed insert reads
//! as "not added"; a failed share log is logged and the share still posts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use affirmbot_core::{CommandProfile, NewAffirmation, ShareEvent, StatsSnapshot, Submission};
use affirmbot_db::repositories::{AffirmationRepository, ShareLogRepository};
use affirmbot_slack::blocks::{self, ResponseMessage, RECENT_SHOWN, TOP_SHARERS_SHOWN};
use affirmbot_slack::commands::{AffirmationCommandService, CommandEnvelope, CommandRouteError};
use affirmbot_slack::interactions::{Actor, AffirmationInteractionService, InteractionError};

#[derive(Clone)]
pub struct AffirmationService {
    profile: CommandProfile,
    affirmations: Arc<dyn AffirmationRepository>,
    share_log: Arc<dyn ShareLogRepository>,
}

impl AffirmationService {
    pub fn new(
        profile: CommandProfile,
        affirmations: Arc<dyn AffirmationRepository>,
        share_log: Arc<dyn ShareLogRepository>,
    ) -> Self {
        Self { profile, affirmations, share_log }
    }

    pub fn profile(&self) -> &CommandProfile {
        &self.profile
    }

    /// A stored affirmation and its author, or the fallback text.
    pub async fn random_affirmation(&self) -> (String, Option<String>) {
        match self.affirmations.random(self.profile.key).await {
            Ok(Some(affirmation)) => (affirmation.text, affirmation.author),
            Ok(None) => (self.profile.fallback_text.to_owned(), None),
            Err(error) => {
                warn!(
                    event_name = "affirmation.random.degraded",
                    collection = self.profile.key,
                    error = %error,
                    "random lookup failed; using fallback text"
                );
                (self.profile.fallback_text.to_owned(), None)
            }
        }
    }

    pub async fn total_shared(&self) -> i64 {
        self.share_log.count(self.profile.key).await.unwrap_or_else(|error| {
            warn!(
                event_name = "affirmation.share_count.degraded",
                collection = self.profile.key,
                error = %error,
                "share count failed; reporting zero"
            );
            0
        })
    }

    pub async fn stats_snapshot(&self) -> StatsSnapshot {
        let key = self.profile.key;
        let total_available = self.affirmations.count(key).await.unwrap_or_else(|error| {
            warn!(
                event_name = "affirmation.stats.degraded",
                part = "available",
                error = %error,
                "stats read failed"
            );
            0
        });
        let top_sharers =
            self.share_log.top_sharers(key, TOP_SHARERS_SHOWN).await.unwrap_or_else(|error| {
                warn!(
                    event_name = "affirmation.stats.degraded",
                    part = "top_sharers",
                    error = %error,
                    "stats read failed"
                );
                Vec::new()
            });
        let recent = self.affirmations.recent(key, RECENT_SHOWN).await.unwrap_or_else(|error| {
            warn!(
                event_name = "affirmation.stats.degraded",
                part = "recent",
                error = %error,
                "stats read failed"
            );
            Vec::new()
        });

        StatsSnapshot {
            total_shared: self.total_shared().await,
            total_available,
            top_sharers,
            recent,
        }
    }

    /// `false` when the text is already stored or the insert failed.
    pub async fn add_affirmation(&self, submission: &Submission, added_by_id: &str) -> bool {
        let affirmation = NewAffirmation {
            text: submission.quote.clone(),
            author: submission.author.clone(),
            added_by_id: added_by_id.to_owned(),
        };
        match self.affirmations.insert(self.profile.key, affirmation, Utc::now()).await {
            Ok(inserted) => {
                info!(
                    event_name = "affirmation.added",
                    collection = self.profile.key,
                    user_id = added_by_id,
                    inserted,
                    "add request processed"
                );
                inserted
            }
            Err(error) => {
                warn!(
                    event_name = "affirmation.add.failed",
                    collection = self.profile.key,
                    user_id = added_by_id,
                    error = %error,
                    "insert failed"
                );
                false
            }
        }
    }

    pub async fn record_share(&self, user_id: &str) {
        let event = ShareEvent { user_id: user_id.to_owned(), shared_at: Utc::now() };
        if let Err(error) = self.share_log.log_share(self.profile.key, event).await {
            warn!(
                event_name = "affirmation.share_log.failed",
                collection = self.profile.key,
                user_id,
                error = %error,
                "share was not logged"
            );
        }
    }
}

#[async_trait]
impl AffirmationCommandService for AffirmationService {
    async fn random(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError> {
        let (text, author) = self.random_affirmation().await;
        let total_shared = self.total_shared().await;
        Ok(blocks::affirmation_message(
            &self.profile,
            &text,
            author.as_deref(),
            &envelope.user_name,
            total_shared,
        ))
    }

    async fn stats(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError> {
        let stats = self.stats_snapshot().await;
        Ok(blocks::stats_message(&self.profile, &stats, &envelope.user_name))
    }

    async fn add(
        &self,
        submission: Submission,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError> {
        if self.add_affirmation(&submission, &envelope.user_id).await {
            Ok(blocks::added_message(&self.profile, &submission))
        } else {
            Ok(blocks::add_failed_message())
        }
    }
}

#[async_trait]
impl AffirmationInteractionService for AffirmationService {
    async fn shuffle(&self, actor: &Actor) -> Result<ResponseMessage, InteractionError> {
        let (text, author) = self.random_affirmation().await;
        let total_shared = self.total_shared().await;
        Ok(blocks::shuffled_message(
            &self.profile,
            &text,
            author.as_deref(),
            &actor.user_name,
            total_shared,
        ))
    }

    async fn share(&self, actor: &Actor, value: &str) -> Result<ResponseMessage, InteractionError> {
        self.record_share(&actor.user_id).await;
        Ok(blocks::shared_message(&self.profile, value, &actor.user_id, &actor.user_name))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use affirmbot_core::{Affirmation, ContributorCount, NewAffirmation, ShareEvent};
    use affirmbot_db::repositories::{AffirmationRepository, RepositoryError, ShareLogRepository};

    /// Every call fails, for exercising degraded paths.
    pub struct FailingStore;

    fn failure() -> RepositoryError {
        RepositoryError::Decode("store offline".to_owned())
    }

    #[async_trait]
    impl AffirmationRepository for FailingStore {
        async fn random(&self, _collection: &str) -> Result<Option<Affirmation>, RepositoryError> {
            Err(failure())
        }

        async fn count(&self, _collection: &str) -> Result<i64, RepositoryError> {
            Err(failure())
        }

        async fn recent(
            &self,
            _collection: &str,
            _limit: u32,
        ) -> Result<Vec<Affirmation>, RepositoryError> {
            Err(failure())
        }

        async fn insert(
            &self,
            _collection: &str,
            _affirmation: NewAffirmation,
            _added_at: DateTime<Utc>,
        ) -> Result<bool, RepositoryError> {
            Err(failure())
        }
    }

    #[async_trait]
    impl ShareLogRepository for FailingStore {
        async fn log_share(
            &self,
            _collection: &str,
            _event: ShareEvent,
        ) -> Result<(), RepositoryError> {
            Err(failure())
        }

        async fn count(&self, _collection: &str) -> Result<i64, RepositoryError> {
            Err(failure())
        }

        async fn top_sharers(
            &self,
            _collection: &str,
            _limit: u32,
        ) -> Result<Vec<ContributorCount>, RepositoryError> {
            Err(failure())
        }
    }
}
