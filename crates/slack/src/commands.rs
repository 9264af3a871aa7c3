use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use affirmbot_core::{resolve_submission, CommandProfile, Submission, SubmissionError};

use crate::blocks::{self, ResponseMessage};

pub const DEFAULT_USER_NAME: &str = "teammate";
pub const DEFAULT_USER_ID: &str = "unknown";

/// Form fields Slack posts for a slash command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub response_url: Option<String>,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub command: AffirmCommand,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub response_url: Option<String>,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AffirmCommand {
    Random,
    Help,
    New,
    Stats,
    Add { raw: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unsupported slash command: {0}")]
    UnsupportedCommand(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandRouteError {
    #[error("command service failed: {0}")]
    Service(String),
}

pub fn normalize_affirm_command(
    payload: SlashCommandPayload,
    profile: &CommandProfile,
) -> Result<CommandEnvelope, CommandParseError> {
    if !payload.command.trim().eq_ignore_ascii_case(profile.command) {
        return Err(CommandParseError::UnsupportedCommand(payload.command));
    }

    Ok(CommandEnvelope {
        command: parse_affirm_command(&payload.text),
        user_id: non_blank_or(payload.user_id, DEFAULT_USER_ID),
        user_name: non_blank_or(payload.user_name, DEFAULT_USER_NAME),
        channel_id: payload.channel_id,
        response_url: payload.response_url.filter(|url| !url.trim().is_empty()),
        request_id: payload.request_id,
    })
}

pub fn parse_affirm_command(text: &str) -> AffirmCommand {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();

    match lowered.as_str() {
        "help" => return AffirmCommand::Help,
        "new" | "add" => return AffirmCommand::New,
        "stats" => return AffirmCommand::Stats,
        _ => {}
    }

    match split_add_prefix(trimmed) {
        Some(rest) => AffirmCommand::Add { raw: rest.trim().to_owned() },
        None => AffirmCommand::Random,
    }
}

fn split_add_prefix(text: &str) -> Option<&str> {
    let keyword = text.get(..3)?;
    let rest = &text[3..];
    if keyword.eq_ignore_ascii_case("add") && rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        value
    }
}

pub struct CommandRouter<S> {
    profile: CommandProfile,
    service: S,
}

impl<S> CommandRouter<S>
where
    S: AffirmationCommandService,
{
    pub fn new(profile: CommandProfile, service: S) -> Self {
        Self { profile, service }
    }

    pub fn profile(&self) -> &CommandProfile {
        &self.profile
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn route(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError> {
        match &envelope.command {
            AffirmCommand::Help => Ok(blocks::help_message(&self.profile)),
            AffirmCommand::New => Ok(blocks::usage_message(&self.profile)),
            AffirmCommand::Stats => self.service.stats(&envelope).await,
            AffirmCommand::Random => self.service.random(&envelope).await,
            AffirmCommand::Add { raw } => match resolve_submission(raw) {
                Ok(submission) => self.service.add(submission, &envelope).await,
                Err(error) => {
                    debug!(
                        event_name = "slack.command.add_rejected",
                        correlation_id = %envelope.request_id,
                        user_id = %envelope.user_id,
                        reason = %error,
                        "submission rejected before storage"
                    );
                    Ok(match error {
                        SubmissionError::TooLong { .. } => blocks::too_long_message(),
                        SubmissionError::Empty => blocks::empty_submission_message(&self.profile),
                    })
                }
            },
        }
    }
}

#[async_trait]
pub trait AffirmationCommandService: Send + Sync {
    async fn random(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError>;

    async fn stats(&self, envelope: &CommandEnvelope)
        -> Result<ResponseMessage, CommandRouteError>;

    async fn add(
        &self,
        submission: Submission,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseMessage, CommandRouteError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use affirmbot_core::{CommandProfile, Submission};

    use super::{
        normalize_affirm_command, parse_affirm_command, AffirmCommand, AffirmationCommandService,
        CommandEnvelope, CommandParseError, CommandRouteError, CommandRouter, SlashCommandPayload,
    };
    use crate::blocks::{self, ResponseMessage};

    fn envelope(command: AffirmCommand) -> CommandEnvelope {
        CommandEnvelope {
            command,
            user_id: "U1".to_owned(),
            user_name: "jane".to_owned(),
            channel_id: "C1".to_owned(),
            response_url: None,
            request_id: "req-1".to_owned(),
        }
    }

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl AffirmationCommandService for RecordingService {
        async fn random(
            &self,
            _envelope: &CommandEnvelope,
        ) -> Result<ResponseMessage, CommandRouteError> {
            self.calls.lock().expect("lock").push("random".to_owned());
            Ok(blocks::add_failed_message())
        }

        async fn stats(
            &self,
            _envelope: &CommandEnvelope,
        ) -> Result<ResponseMessage, CommandRouteError> {
            self.calls.lock().expect("lock").push("stats".to_owned());
            Ok(blocks::add_failed_message())
        }

        async fn add(
            &self,
            submission: Submission,
            _envelope: &CommandEnvelope,
        ) -> Result<ResponseMessage, CommandRouteError> {
            self.calls.lock().expect("lock").push(format!(
                "add:{}|{}",
                submission.quote,
                submission.author.unwrap_or_default()
            ));
            Ok(blocks::add_failed_message())
        }
    }

    fn recording_router() -> CommandRouter<RecordingService> {
        CommandRouter::new(CommandProfile::customer_affirmations(), RecordingService::default())
    }

    #[test]
    fn parses_keywords_case_insensitively() {
        assert_eq!(parse_affirm_command(""), AffirmCommand::Random);
        assert_eq!(parse_affirm_command("   "), AffirmCommand::Random);
        assert_eq!(parse_affirm_command(" HELP "), AffirmCommand::Help);
        assert_eq!(parse_affirm_command("New"), AffirmCommand::New);
        assert_eq!(parse_affirm_command("stats"), AffirmCommand::Stats);
        assert_eq!(parse_affirm_command("add"), AffirmCommand::New);
        assert_eq!(parse_affirm_command("statistics"), AffirmCommand::Random);
        assert_eq!(parse_affirm_command("something else"), AffirmCommand::Random);
    }

    #[test]
    fn add_prefix_keeps_remainder() {
        assert_eq!(
            parse_affirm_command("ADD \"Keep going\" \"Jane\""),
            AffirmCommand::Add { raw: "\"Keep going\" \"Jane\"".to_owned() }
        );
        assert_eq!(parse_affirm_command("addendum"), AffirmCommand::Random);
        assert_eq!(parse_affirm_command("ad"), AffirmCommand::Random);
        assert_eq!(parse_affirm_command("añadir"), AffirmCommand::Random);
    }

    #[test]
    fn normalize_rejects_other_commands() {
        let profile = CommandProfile::customer_affirmations();
        let result = normalize_affirm_command(
            SlashCommandPayload { command: "/quote".to_owned(), ..SlashCommandPayload::default() },
            &profile,
        );
        assert_eq!(result, Err(CommandParseError::UnsupportedCommand("/quote".to_owned())));
    }

    #[test]
    fn normalize_fills_missing_user_fields() {
        let profile = CommandProfile::customer_affirmations();
        let envelope = normalize_affirm_command(
            SlashCommandPayload {
                command: "/customer_affirm".to_owned(),
                text: "stats".to_owned(),
                response_url: Some("  ".to_owned()),
                request_id: "req-9".to_owned(),
                ..SlashCommandPayload::default()
            },
            &profile,
        )
        .expect("normalized");

        assert_eq!(envelope.command, AffirmCommand::Stats);
        assert_eq!(envelope.user_name, "teammate");
        assert_eq!(envelope.user_id, "unknown");
        assert_eq!(envelope.response_url, None);
    }

    #[tokio::test]
    async fn static_commands_do_not_reach_the_service() {
        let router = recording_router();

        let help = router.route(envelope(AffirmCommand::Help)).await.expect("help");
        assert!(!help.blocks.is_empty());

        let usage = router.route(envelope(AffirmCommand::New)).await.expect("usage");
        assert!(usage.text.contains("/customer_affirm add"));

        assert!(router.service().calls.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn router_calls_service_entrypoints() {
        let router = recording_router();

        for command in [
            AffirmCommand::Random,
            AffirmCommand::Stats,
            AffirmCommand::Add { raw: "\"TG is amazing!\" \"Jane Doe\"".to_owned() },
        ] {
            router.route(envelope(command)).await.expect("route");
        }

        let calls = router.service().calls.lock().expect("lock");
        assert_eq!(&*calls, &["random", "stats", "add:TG is amazing!|Jane Doe"]);
    }

    #[tokio::test]
    async fn invalid_submissions_short_circuit() {
        let router = recording_router();

        let too_long = router
            .route(envelope(AffirmCommand::Add { raw: format!("\"{}\"", "x".repeat(501)) }))
            .await
            .expect("too long");
        assert!(too_long.text.contains("Quote is too long"));

        let empty = router
            .route(envelope(AffirmCommand::Add { raw: "\"\"".to_owned() }))
            .await
            .expect("empty");
        assert!(empty.text.contains("looks empty"));

        assert!(router.service().calls.lock().expect("lock").is_empty());
    }
}
