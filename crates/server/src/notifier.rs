use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use affirmbot_slack::blocks::ResponseMessage;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("response_url request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response_url returned status {0}")]
    Status(u16),
}

/// Delivers follow-up messages to a Slack `response_url`.
#[async_trait]
pub trait ResponseNotifier: Send + Sync {
    async fn notify(
        &self,
        response_url: &str,
        message: &ResponseMessage,
    ) -> Result<(), NotifyError>;
}

pub struct HttpResponseNotifier {
    client: Client,
}

impl HttpResponseNotifier {
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResponseNotifier for HttpResponseNotifier {
    async fn notify(
        &self,
        response_url: &str,
        message: &ResponseMessage,
    ) -> Result<(), NotifyError> {
        let response = self.client.post(response_url).json(message).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{HttpResponseNotifier, NotifyError, ResponseNotifier};
    use affirmbot_slack::blocks::add_failed_message;

    #[tokio::test]
    async fn unreachable_response_url_is_a_transport_error() {
        let notifier = HttpResponseNotifier::new(Duration::from_secs(1)).expect("client");
        let result = notifier.notify("http://127.0.0.1:9/hooks", &add_failed_message()).await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
    }
}
