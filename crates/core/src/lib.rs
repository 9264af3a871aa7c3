//! Core of the affirmation bot: argument parsing, command profiles,
//! domain records, configuration, and the error taxonomy shared by the
//! storage, Slack, and server crates.

pub mod args;
pub mod config;
pub mod domain;
pub mod errors;
pub mod profile;
pub mod submission;

pub use args::{parse_quoted_arguments, QuoteDelimiter};
pub use domain::affirmation::{
    Affirmation, AffirmationId, ContributorCount, NewAffirmation, ShareEvent, StatsSnapshot,
    SYSTEM_USER_ID,
};
pub use errors::{ApplicationError, InterfaceError};
pub use profile::CommandProfile;
pub use submission::{resolve_submission, Submission, SubmissionError, MAX_QUOTE_CHARS};
