use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Submitter id used for rows loaded by the operator rather than a Slack user.
pub const SYSTEM_USER_ID: &str = "system";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AffirmationId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affirmation {
    pub id: AffirmationId,
    pub text: String,
    pub author: Option<String>,
    pub added_by_id: String,
    pub added_at: DateTime<Utc>,
}

impl Affirmation {
    pub fn added_by_system(&self) -> bool {
        self.added_by_id == SYSTEM_USER_ID
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAffirmation {
    pub text: String,
    pub author: Option<String>,
    pub added_by_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorCount {
    pub user_id: String,
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEvent {
    pub user_id: String,
    pub shared_at: DateTime<Utc>,
}

/// Everything the stats panel shows, gathered in one place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_shared: i64,
    pub total_available: i64,
    pub top_sharers: Vec<ContributorCount>,
    pub recent: Vec<Affirmation>,
}
