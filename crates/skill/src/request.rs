use std::collections::HashMap;

use serde::Deserialize;

/// The subset of the Alexa request envelope this skill reads.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<RequestContextBody>,
    pub request: Request,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RequestContextBody {
    #[serde(rename = "System", default)]
    pub system: Option<SystemContext>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub user: Option<SystemUser>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemUser {
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub consent_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "LaunchRequest", rename_all = "camelCase")]
    Launch {
        #[serde(default)]
        request_id: Option<String>,
    },
    #[serde(rename = "IntentRequest", rename_all = "camelCase")]
    Intent {
        #[serde(default)]
        request_id: Option<String>,
        intent: Intent,
    },
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl RequestEnvelope {
    /// The Slack access token issued through account linking, when present.
    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref()?.user.as_ref()?.access_token.as_deref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.context.as_ref()?.system.as_ref()?.device.as_ref()?.device_id.as_deref()
    }

    /// The token proving the user granted location-sharing permission.
    pub fn consent_token(&self) -> Option<&str> {
        self.context
            .as_ref()?
            .system
            .as_ref()?
            .user
            .as_ref()?
            .permissions
            .as_ref()?
            .consent_token
            .as_deref()
    }

    pub fn request_id(&self) -> &str {
        match &self.request {
            Request::Launch { request_id } | Request::Intent { request_id, .. } => {
                request_id.as_deref().unwrap_or("unknown")
            }
            Request::SessionEnded | Request::Unknown => "unknown",
        }
    }

    pub fn intent(&self) -> Option<&Intent> {
        match &self.request {
            Request::Intent { intent, .. } => Some(intent),
            _ => None,
        }
    }
}

impl Intent {
    /// A filled slot value; empty slots count as missing.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name)?.value.as_deref().filter(|value| !value.trim().is_empty())
    }
}
