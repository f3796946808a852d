// ABOUTME: Fire-and-forget signup notification webhook
// ABOUTME: Posts new-user details to an external URL without blocking or failing signup

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub user_id: String,
}

#[derive(Clone)]
pub struct SignupWebhook {
    client: Client,
    url: Option<String>,
}

impl SignupWebhook {
    /// `url = None` disables the webhook; `notify` becomes a no-op
    pub fn new(url: Option<String>, timeout: Duration) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Send in the background. Failures are logged and never reach the caller.
    pub fn notify(&self, payload: SignupPayload) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            debug!("Signup webhook not configured, skipping");
            return None;
        }

        let webhook = self.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = webhook.send(&payload).await {
                warn!(
                    "Signup webhook failed for user {}: {}",
                    payload.user_id, e
                );
            }
        }))
    }

    /// Post the payload and wait for the response
    pub async fn send(&self, payload: &SignupPayload) -> AuthResult<()> {
        let Some(url) = &self.url else {
            return Ok(());
        };

        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::WebhookStatus(response.status().as_u16()));
        }

        debug!("Signup webhook delivered for user {}", payload.user_id);
        Ok(())
    }
}
