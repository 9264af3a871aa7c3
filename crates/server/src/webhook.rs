use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use affirmbot_core::{ApplicationError, CommandProfile};
use affirmbot_slack::blocks;
use affirmbot_slack::commands::{normalize_affirm_command, CommandRouter, SlashCommandPayload};
use affirmbot_slack::interactions::{parse_interaction, Interaction, InteractionRouter};

use crate::notifier::ResponseNotifier;
use crate::service::AffirmationService;

pub const SLACK_PATH: &str = "/slack/commands";

#[derive(Clone)]
pub struct WebhookState {
    profile: CommandProfile,
    commands: Arc<CommandRouter<AffirmationService>>,
    interactions: Arc<InteractionRouter<AffirmationService>>,
    notifier: Arc<dyn ResponseNotifier>,
}

impl WebhookState {
    pub fn new(service: AffirmationService, notifier: Arc<dyn ResponseNotifier>) -> Self {
        let profile = service.profile().clone();
        Self {
            commands: Arc::new(CommandRouter::new(profile.clone(), service.clone())),
            interactions: Arc::new(InteractionRouter::new(service)),
            profile,
            notifier,
        }
    }
}

/// Union of the slash-command and interaction form bodies.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SlackForm {
    pub payload: Option<String>,
    pub command: Option<String>,
    pub text: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub channel_id: Option<String>,
    pub response_url: Option<String>,
    pub challenge: Option<String>,
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route(SLACK_PATH, post(slack_webhook)).with_state(state)
}

pub async fn slack_webhook(
    State(state): State<WebhookState>,
    form: Result<Form<SlackForm>, FormRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(
                event_name = "slack.request.rejected",
                correlation_id = %correlation_id,
                reason = %rejection,
                "request body is not a Slack form"
            );
            return (StatusCode::BAD_REQUEST, "Invalid request format").into_response();
        }
    };

    if let Some(payload) = form.payload.as_deref() {
        return handle_interaction(&state, payload, &correlation_id).await;
    }
    if form.command.is_some() {
        return handle_slash_command(&state, form, correlation_id).await;
    }

    warn!(
        event_name = "slack.request.unrecognized",
        correlation_id = %correlation_id,
        "form carries neither payload nor command"
    );
    (StatusCode::BAD_REQUEST, "Unrecognized Slack request").into_response()
}

async fn handle_slash_command(
    state: &WebhookState,
    form: SlackForm,
    correlation_id: String,
) -> Response {
    if let Some(challenge) = form.challenge.filter(|challenge| !challenge.is_empty()) {
        return (StatusCode::OK, challenge).into_response();
    }

    let payload = SlashCommandPayload {
        command: form.command.unwrap_or_default(),
        text: form.text.unwrap_or_default(),
        user_id: form.user_id.unwrap_or_default(),
        user_name: form.user_name.unwrap_or_default(),
        channel_id: form.channel_id.unwrap_or_default(),
        response_url: form.response_url,
        request_id: correlation_id.clone(),
    };

    let envelope = match normalize_affirm_command(payload, &state.profile) {
        Ok(envelope) => envelope,
        Err(error) => {
            return failure_response(
                state,
                ApplicationError::Configuration(error.to_string()),
                &correlation_id,
            )
        }
    };

    info!(
        event_name = "slack.command.received",
        correlation_id = %correlation_id,
        user_id = %envelope.user_id,
        channel_id = %envelope.channel_id,
        command = ?envelope.command,
        "slash command received"
    );

    match state.commands.route(envelope).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(error) => failure_response(
            state,
            ApplicationError::Integration(error.to_string()),
            &correlation_id,
        ),
    }
}

async fn handle_interaction(state: &WebhookState, payload: &str, correlation_id: &str) -> Response {
    let interaction = match parse_interaction(payload, &state.profile) {
        Ok(interaction) => interaction,
        Err(error) => {
            return failure_response(
                state,
                ApplicationError::InvalidRequest(error.to_string()),
                correlation_id,
            )
        }
    };

    if let Interaction::UrlVerification { challenge } = &interaction {
        return (StatusCode::OK, challenge.clone()).into_response();
    }

    let follow_up = match state.interactions.route(interaction).await {
        Ok(follow_up) => follow_up,
        Err(error) => {
            return failure_response(
                state,
                ApplicationError::Integration(error.to_string()),
                correlation_id,
            )
        }
    };

    if let Some(follow_up) = follow_up {
        match state.notifier.notify(&follow_up.response_url, &follow_up.message).await {
            Ok(()) => info!(
                event_name = "slack.interaction.delivered",
                correlation_id = %correlation_id,
                "follow-up posted to response_url"
            ),
            Err(error) => warn!(
                event_name = "slack.interaction.delivery_failed",
                correlation_id = %correlation_id,
                error = %error,
                "follow-up could not be posted"
            ),
        }
    }

    (StatusCode::OK, "OK").into_response()
}

fn failure_response(
    state: &WebhookState,
    error: ApplicationError,
    correlation_id: &str,
) -> Response {
    let interface = error.into_interface(correlation_id);
    warn!(
        event_name = "slack.request.failed",
        correlation_id = %interface.correlation_id(),
        error = %interface,
        "request failed; replying with error message"
    );
    (StatusCode::OK, Json(blocks::error_message(&state.profile, interface.correlation_id())))
        .into_response()
}
