//! Turns one pipeline event into one webhook delivery

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::NotifierConfig;
use crate::error::{NotifierError, Result};
use crate::event::PipelineEvent;
use crate::payload::WebhookPayload;
use crate::transport::Transport;

pub const MISSING_CONFIG_MESSAGE: &str = "Missing environment variables.";
pub const MISSING_STATE_MESSAGE: &str = "Missing status in event body.";

/// Result of an invocation that did not fail outright
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Sent,
    Error { message: String },
}

impl Outcome {
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error {
            message: message.into(),
        }
    }
}

pub struct Notifier<T: Transport> {
    config: NotifierConfig,
    transport: T,
}

impl<T: Transport> Notifier<T> {
    pub fn new(config: NotifierConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Handle one event.
    ///
    /// Configuration and validation problems come back as `Ok(Outcome::Error)`
    /// without touching the network. A failed delivery is returned as `Err` so the
    /// caller marks the whole invocation as failed.
    pub async fn handle(&self, event: Value) -> Result<Outcome> {
        if !self.config.is_complete() {
            error!(
                "Pipeline name set: {}, Webhook URL set: {}",
                !self.config.pipeline_name.is_empty(),
                !self.config.webhook_url.is_empty()
            );
            return Ok(Outcome::error(MISSING_CONFIG_MESSAGE));
        }

        let event = match PipelineEvent::from_value(event) {
            Ok(event) => event,
            Err(e) => {
                error!("{}", e);
                return Ok(Outcome::error(e.to_string()));
            }
        };

        let Some(state) = event.state() else {
            error!("Missing status in event.");
            return Ok(Outcome::error(MISSING_STATE_MESSAGE));
        };

        let payload = WebhookPayload::build(&self.config, &event, state);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| NotifierError::Validation(format!("Unserializable payload: {}", e)))?;

        let response = match self.transport.post_json(&self.config.webhook_url, body).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error sending webhook: {}", e);
                return Err(e);
            }
        };

        if !response.is_success() {
            let err = NotifierError::Delivery {
                status: Some(response.status),
                message: response.body,
            };
            error!("Error sending webhook: {}", err);
            return Err(err);
        }

        info!(
            "Sent webhook for {} → {}",
            self.config.pipeline_name, state
        );
        Ok(Outcome::Sent)
    }
}
