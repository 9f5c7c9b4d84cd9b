use async_trait::async_trait;
use awaybot_core::{SkillFailure, StatusProfile};
use thiserror::Error;

/// One variant per write/read operation; transport failures fold into the
/// operation that was being attempted so each maps to a single spoken
/// sentence.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SlackError {
    #[error("presence update rejected: {detail}")]
    Presence { detail: String },
    #[error("snooze set rejected: {detail}")]
    SetSnooze { detail: String },
    #[error("snooze end rejected: {detail}")]
    EndSnooze { detail: String },
    #[error("snooze status check rejected: {detail}")]
    SnoozeStatus { detail: String },
}

impl From<SlackError> for SkillFailure {
    fn from(error: SlackError) -> Self {
        match error {
            SlackError::Presence { detail } => Self::Presence { detail },
            SlackError::SetSnooze { detail } => Self::SetSnooze { detail },
            SlackError::EndSnooze { detail } => Self::EndSnooze { detail },
            SlackError::SnoozeStatus { detail } => Self::SnoozeStatus { detail },
        }
    }
}

#[async_trait]
pub trait SlackGateway: Send + Sync {
    /// Sets (or, with an empty profile, clears) the user's status.
    async fn set_presence(&self, token: &str, profile: &StatusProfile) -> Result<(), SlackError>;

    /// Suppresses notifications for the next `minutes` minutes.
    async fn set_snooze(&self, token: &str, minutes: i64) -> Result<(), SlackError>;

    /// Ends an active snooze immediately.
    async fn end_snooze(&self, token: &str) -> Result<(), SlackError>;

    /// Whether a snooze window is currently active.
    async fn snooze_active(&self, token: &str) -> Result<bool, SlackError>;
}

/// Accepts every call and reports no active snooze. Placeholder wiring for
/// environments without Slack credentials, mirroring the scripted doubles
/// used in tests.
#[derive(Default)]
pub struct NoopSlackGateway;

#[async_trait]
impl SlackGateway for NoopSlackGateway {
    async fn set_presence(&self, _token: &str, _profile: &StatusProfile) -> Result<(), SlackError> {
        Ok(())
    }

    async fn set_snooze(&self, _token: &str, _minutes: i64) -> Result<(), SlackError> {
        Ok(())
    }

    async fn end_snooze(&self, _token: &str) -> Result<(), SlackError> {
        Ok(())
    }

    async fn snooze_active(&self, _token: &str) -> Result<bool, SlackError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use awaybot_core::SkillFailure;

    use super::SlackError;

    #[test]
    fn each_operation_maps_to_its_own_failure() {
        let presence = SkillFailure::from(SlackError::Presence { detail: "no".to_owned() });
        assert_eq!(presence.spoken_message(), "I couldn't set your Slack status.");

        let set = SkillFailure::from(SlackError::SetSnooze { detail: "no".to_owned() });
        assert_eq!(set.spoken_message(), "I couldn't snooze your Slack notifications.");

        let end = SkillFailure::from(SlackError::EndSnooze { detail: "no".to_owned() });
        assert_eq!(end.spoken_message(), "I couldn't end your Slack snooze.");

        let check = SkillFailure::from(SlackError::SnoozeStatus { detail: "no".to_owned() });
        assert_eq!(check.spoken_message(), "I couldn't check your Slack snooze.");
    }
}
