//! Starter data so a fresh collection has something to shuffle through.

use chrono::Utc;

use affirmbot_core::domain::affirmation::{NewAffirmation, SYSTEM_USER_ID};

use crate::repositories::{AffirmationRepository, RepositoryError};

const CUSTOMER_AFFIRMATIONS: &[&str] = &[
    "I am grateful for your support.",
    "Your team made this launch painless.",
    "We could not have hit our deadline without you.",
    "Every time we reach out, you get back to us the same day.",
    "You made a complicated migration feel easy.",
];

const AFFIRMATIONS: &[&str] = &[
    "You are doing great work.",
    "We're gonna get through this!",
    "Progress over perfection.",
    "Your questions make the whole team sharper.",
    "Small steps still move the project forward.",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub collection: String,
    pub inserted: usize,
    pub skipped: usize,
}

pub fn starter_affirmations(collection: &str) -> &'static [&'static str] {
    match collection {
        "customer_affirm" => CUSTOMER_AFFIRMATIONS,
        "affirm" => AFFIRMATIONS,
        _ => &[],
    }
}

/// Inserts the starter set attributed to the system user. Texts that are
/// already present are counted as skipped, so re-running is harmless.
pub async fn seed_starter_affirmations(
    repository: &dyn AffirmationRepository,
    collection: &str,
) -> Result<SeedResult, RepositoryError> {
    let mut result = SeedResult { collection: collection.to_owned(), inserted: 0, skipped: 0 };

    for text in starter_affirmations(collection) {
        let inserted = repository
            .insert(
                collection,
                NewAffirmation {
                    text: (*text).to_owned(),
                    author: None,
                    added_by_id: SYSTEM_USER_ID.to_owned(),
                },
                Utc::now(),
            )
            .await?;
        if inserted {
            result.inserted += 1;
        } else {
            result.skipped += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use affirmbot_core::CommandProfile;

    use super::{seed_starter_affirmations, starter_affirmations};
    use crate::repositories::{AffirmationRepository, InMemoryAffirmationRepository};

    #[test]
    fn every_profile_has_starter_data_including_its_fallback() {
        for key in CommandProfile::KEYS {
            let profile = CommandProfile::by_key(key).expect("profile");
            let starters = starter_affirmations(key);
            assert!(!starters.is_empty());
            assert!(starters.contains(&profile.fallback_text));
        }
        assert!(starter_affirmations("unknown").is_empty());
    }

    #[tokio::test]
    async fn seeding_twice_skips_existing_rows() {
        let repo = InMemoryAffirmationRepository::default();

        let first = seed_starter_affirmations(&repo, "affirm").await.expect("first seed");
        assert_eq!(first.inserted, starter_affirmations("affirm").len());
        assert_eq!(first.skipped, 0);

        let second = seed_starter_affirmations(&repo, "affirm").await.expect("second seed");
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, first.inserted);

        let recent = repo.recent("affirm", 10).await.expect("recent");
        assert!(recent.iter().all(|row| row.added_by_system()));
    }
}
