//! Button clicks delivered in the `payload` form field.
//!
//! Slack posts interactions as a JSON document nested inside a
//! form-encoded body. Only the first action of a `block_actions` or
//! `interactive_message` payload is considered; the follow-up message is
//! posted to `response_url` by the caller.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use affirmbot_core::CommandProfile;

use crate::blocks::ResponseMessage;
use crate::commands::{DEFAULT_USER_ID, DEFAULT_USER_NAME};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct InteractionPayload {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    #[serde(default)]
    pub user: Option<InteractionUser>,
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InteractionAction {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InteractionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    UrlVerification { challenge: String },
    Shuffle { actor: Actor, response_url: String },
    Share { actor: Actor, value: String, response_url: String },
    Ignored,
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("interaction payload is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("interaction `{action_id}` has no response_url")]
    MissingResponseUrl { action_id: String },
    #[error("interaction service failed: {0}")]
    Service(String),
}

pub fn parse_interaction(
    raw: &str,
    profile: &CommandProfile,
) -> Result<Interaction, InteractionError> {
    let payload: InteractionPayload = serde_json::from_str(raw)?;
    classify_interaction(payload, profile)
}

pub fn classify_interaction(
    payload: InteractionPayload,
    profile: &CommandProfile,
) -> Result<Interaction, InteractionError> {
    match payload.kind.as_str() {
        "url_verification" => {
            return Ok(Interaction::UrlVerification {
                challenge: payload.challenge.unwrap_or_default(),
            })
        }
        "block_actions" | "interactive_message" => {}
        _ => return Ok(Interaction::Ignored),
    }

    let Some(action) = payload.actions.into_iter().next() else {
        return Ok(Interaction::Ignored);
    };
    let is_shuffle = action.action_id == profile.shuffle_action_id;
    let is_share = action.action_id == profile.share_action_id;
    if !is_shuffle && !is_share {
        return Ok(Interaction::Ignored);
    }

    let response_url = payload
        .response_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| InteractionError::MissingResponseUrl { action_id: action.action_id })?;
    let actor = actor_from(payload.user);

    if is_shuffle {
        Ok(Interaction::Shuffle { actor, response_url })
    } else {
        Ok(Interaction::Share { actor, value: action.value.unwrap_or_default(), response_url })
    }
}

fn actor_from(user: Option<InteractionUser>) -> Actor {
    match user {
        Some(user) => {
            let user_name = user
                .name
                .or(user.username)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_owned());
            Actor { user_id: user.id, user_name }
        }
        None => {
            Actor { user_id: DEFAULT_USER_ID.to_owned(), user_name: DEFAULT_USER_NAME.to_owned() }
        }
    }
}

/// Produces the follow-up posted to `response_url` for each button.
#[async_trait]
pub trait AffirmationInteractionService: Send + Sync {
    async fn shuffle(&self, actor: &Actor) -> Result<ResponseMessage, InteractionError>;

    async fn share(&self, actor: &Actor, value: &str) -> Result<ResponseMessage, InteractionError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowUp {
    pub response_url: String,
    pub message: ResponseMessage,
}

pub struct InteractionRouter<S> {
    service: S,
}

impl<S> InteractionRouter<S>
where
    S: AffirmationInteractionService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// `None` for verification pings and actions this bot does not own.
    pub async fn route(
        &self,
        interaction: Interaction,
    ) -> Result<Option<FollowUp>, InteractionError> {
        match interaction {
            Interaction::Shuffle { actor, response_url } => {
                let message = self.service.shuffle(&actor).await?;
                Ok(Some(FollowUp { response_url, message }))
            }
            Interaction::Share { actor, value, response_url } => {
                let message = self.service.share(&actor, &value).await?;
                Ok(Some(FollowUp { response_url, message }))
            }
            Interaction::UrlVerification { .. } | Interaction::Ignored => Ok(None),
        }
    }
}
