use async_trait::async_trait;
use awaybot_core::StatusProfile;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::gateway::{SlackError, SlackGateway};

/// Slack's uniform response envelope. Endpoint-specific fields ride along;
/// the only one this client reads is `snooze_enabled` from `dnd.info`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    snooze_enabled: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ProfilePayload<'a> {
    status_text: &'a str,
    status_emoji: &'a str,
}

/// Failure detail for logging: HTTP status plus the envelope's error code.
/// Never spoken to the user.
pub(crate) fn envelope_detail(status: u16, envelope: &ApiEnvelope) -> Option<String> {
    if status == 200 && envelope.ok {
        return None;
    }

    let code = envelope.error.as_deref().unwrap_or("unknown_error");
    Some(format!("http status {status}, api error `{code}`"))
}

pub struct HttpSlackGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSlackGateway {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    async fn call_form(
        &self,
        endpoint: &'static str,
        form: &[(&str, &str)],
    ) -> Result<ApiEnvelope, String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        let status = response.status().as_u16();
        let envelope: ApiEnvelope =
            response.json().await.map_err(|err| format!("unreadable response body: {err}"))?;

        match envelope_detail(status, &envelope) {
            None => {
                debug!(event_name = "slack.api.ok", endpoint, "slack api call succeeded");
                Ok(envelope)
            }
            Some(detail) => {
                error!(
                    event_name = "slack.api.failed",
                    endpoint,
                    detail = %detail,
                    "slack api call failed"
                );
                Err(detail)
            }
        }
    }
}

#[async_trait]
impl SlackGateway for HttpSlackGateway {
    async fn set_presence(&self, token: &str, profile: &StatusProfile) -> Result<(), SlackError> {
        let payload = ProfilePayload { status_text: &profile.text, status_emoji: &profile.emoji };
        let profile_json = serde_json::to_string(&payload)
            .map_err(|err| SlackError::Presence { detail: err.to_string() })?;

        self.call_form("users.profile.set", &[("profile", &profile_json), ("token", token)])
            .await
            .map(|_| ())
            .map_err(|detail| SlackError::Presence { detail })
    }

    async fn set_snooze(&self, token: &str, minutes: i64) -> Result<(), SlackError> {
        let minutes = minutes.to_string();
        self.call_form("dnd.setSnooze", &[("num_minutes", minutes.as_str()), ("token", token)])
            .await
            .map(|_| ())
            .map_err(|detail| SlackError::SetSnooze { detail })
    }

    async fn end_snooze(&self, token: &str) -> Result<(), SlackError> {
        self.call_form("dnd.endSnooze", &[("token", token)])
            .await
            .map(|_| ())
            .map_err(|detail| SlackError::EndSnooze { detail })
    }

    async fn snooze_active(&self, token: &str) -> Result<bool, SlackError> {
        self.call_form("dnd.info", &[("token", token)])
            .await
            .map(|envelope| envelope.snooze_enabled.unwrap_or(false))
            .map_err(|detail| SlackError::SnoozeStatus { detail })
    }
}
